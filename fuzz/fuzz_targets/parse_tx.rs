#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(tx) = cashtx_codec::Transaction::from_bytes(data) else {
        return;
    };
    // Accepted input must re-serialize byte-identically.
    let enc = tx.to_bytes();
    if enc != data {
        panic!("reserialization mismatch: got={enc:02x?} want={data:02x?}");
    }
});
