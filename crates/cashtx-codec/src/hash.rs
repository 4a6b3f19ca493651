use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub(crate) fn sha256d(b: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(b);
    let second = Sha256::digest(first);
    let mut r = [0u8; 32];
    r.copy_from_slice(&second);
    r
}

pub(crate) fn hash160(b: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(b);
    let rip = Ripemd160::digest(sha);
    let mut r = [0u8; 20];
    r.copy_from_slice(&rip);
    r
}
