use secp256k1::PublicKey;

use crate::error::PsbtError;

/// Checks that `bytes` encode a point on the signing curve.
pub(crate) fn validate_pubkey(bytes: &[u8]) -> Result<(), PsbtError> {
    PublicKey::from_slice(bytes)
        .map(|_| ())
        .map_err(|_| PsbtError::InvalidPubkey)
}

/// Strips the type byte off a pubkey-carrying PSBT key and validates the
/// remainder as a 33- or 65-byte public key.
pub(crate) fn parse_pubkey_key(key: &[u8]) -> Result<Vec<u8>, PsbtError> {
    if key.len() != 34 && key.len() != 66 {
        return Err(PsbtError::PubkeyKeyLength);
    }
    let pubkey = key[1..].to_vec();
    validate_pubkey(&pubkey)?;
    Ok(pubkey)
}
