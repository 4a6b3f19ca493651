/// Sequence value marking a transaction input as final.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Reserved opcode prefixing a locking script that carries token data.
pub const TOKEN_PREFIX: u8 = 0xef;

/// Magic bytes opening every PSBT container ("psbt" followed by 0xff).
pub const PSBT_MAGIC_BYTES: [u8; 5] = [0x70, 0x73, 0x62, 0x74, 0xff];

/// A zero-length key ends a PSBT map.
pub const PSBT_SEPARATOR: &[u8] = &[];

// Global map key types.
pub const PSBT_GLOBAL_UNSIGNED_TX: u8 = 0x00;

// Input map key types.
pub const PSBT_IN_UTXO: u8 = 0x00;
pub const PSBT_IN_PARTIAL_SIG: u8 = 0x02;
pub const PSBT_IN_SIGHASH: u8 = 0x03;
pub const PSBT_IN_REDEEM_SCRIPT: u8 = 0x04;
pub const PSBT_IN_BIP32_DERIVATION: u8 = 0x06;
pub const PSBT_IN_FINAL_SCRIPT_SIG: u8 = 0x07;

// Output map key types.
pub const PSBT_OUT_REDEEM_SCRIPT: u8 = 0x00;
pub const PSBT_OUT_BIP32_DERIVATION: u8 = 0x02;

// Token bitfield layout: the top nibble describes which optional fields
// follow, the low nibble is the NFT capability.
pub const TOKEN_HAS_AMOUNT: u8 = 0x10;
pub const TOKEN_HAS_NFT: u8 = 0x20;
pub const TOKEN_HAS_COMMITMENT_LENGTH: u8 = 0x40;
pub const TOKEN_CAPABILITY_MASK: u8 = 0x0f;
pub const TOKEN_STRUCTURE_MASK: u8 = 0xf0;

/// Largest token amount representable on the wire.
pub const MAX_TOKEN_AMOUNT: u64 = i64::MAX as u64;
