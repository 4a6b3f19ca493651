use thiserror::Error;

/// Every codec failure is a `SerializeError`. PSBT-specific violations are
/// nested under [`SerializeError::Psbt`] so callers can match on the family
/// or on the exact rule that was broken.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SerializeError {
    #[error("unexpected end of data reading {0}")]
    UnexpectedEnd(&'static str),

    #[error("non-minimal compact size")]
    NonMinimalCompactSize,

    #[error("{0} length {1} exceeds remaining buffer")]
    LengthOverflow(&'static str, u64),

    #[error("{0} has trailing bytes")]
    TrailingBytes(&'static str),

    #[error("identifier must be 64 hex characters")]
    InvalidIdentifier,

    #[error("unable to parse token data or token data is invalid")]
    InvalidTokenData,

    #[error("PSBT: {0}")]
    Psbt(#[from] PsbtError),
}

/// PSBT container violations. `BadMagic` is its own variant so callers can
/// tell "not a PSBT at all" apart from a malformed one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PsbtError {
    #[error("invalid magic bytes")]
    BadMagic,

    #[error("duplicate key, {0} already provided")]
    DuplicateKey(&'static str),

    #[error("{0} key is more than one byte type")]
    KeyLength(&'static str),

    #[error("{0} serialization has extra or unexpected bytes at the end")]
    TrailingBytes(&'static str),

    #[error("size of key was not the expected size for a pubkey-carrying type")]
    PubkeyKeyLength,

    #[error("invalid pubkey")]
    InvalidPubkey,

    #[error("invalid length for HD key path")]
    KeypathLength,

    #[error("no unsigned transaction was provided")]
    MissingUnsignedTx,

    #[error("unsigned tx has a non-empty unlocking script at input {0}")]
    NonEmptyUnlockingScript(usize),

    #[error("the number of PSBT inputs must equal the unsigned tx's input count")]
    InputCountMismatch,

    #[error("the number of PSBT outputs must equal the unsigned tx's output count")]
    OutputCountMismatch,

    #[error("expected string argument to be hex-encoded")]
    InvalidHex,

    #[error("expected string argument to be base64-encoded")]
    InvalidBase64,
}
