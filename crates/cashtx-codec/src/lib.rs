pub mod compactsize;
pub mod constants;
pub mod error;
mod hash;
pub mod psbt;
mod pubkey;
pub mod token;
pub mod tx;
pub mod wire;

pub use compactsize::{encode_compact_size, read_compact_size_bytes};
pub use error::{PsbtError, SerializeError};
pub use psbt::{KeyOriginInfo, PartialSig, Psbt, PsbtInput, PsbtOutput, PsbtSource};
pub use token::{unwrap_script, wrap_script, Capability, TokenData};
pub use tx::{OutPoint, Transaction, TxId, TxInput, TxOutput, Uint256};
pub use wire::{write_byte_vec, Reader};
