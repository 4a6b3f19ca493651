use std::fmt;

use crate::compactsize::encode_compact_size;
use crate::constants::{
    MAX_TOKEN_AMOUNT, TOKEN_CAPABILITY_MASK, TOKEN_HAS_AMOUNT, TOKEN_HAS_COMMITMENT_LENGTH,
    TOKEN_HAS_NFT, TOKEN_PREFIX, TOKEN_STRUCTURE_MASK,
};
use crate::error::SerializeError;
use crate::tx::Uint256;
use crate::wire::Reader;

/// NFT capability carried in the low nibble of the token bitfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    NoCapability = 0x00,
    Mutable = 0x01,
    Minting = 0x02,
}

/// Token payload attachable to a transaction output. On the wire it lives
/// inside the output's locking script behind [`TOKEN_PREFIX`], never as a
/// field of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenData {
    pub category: Uint256,
    pub bitfield: u8,
    pub amount: u64,
    pub commitment: Vec<u8>,
}

impl Default for TokenData {
    fn default() -> Self {
        Self {
            category: Uint256::default(),
            bitfield: TOKEN_HAS_AMOUNT,
            amount: 1,
            commitment: Vec::new(),
        }
    }
}

impl TokenData {
    pub fn capability(&self) -> u8 {
        self.bitfield & TOKEN_CAPABILITY_MASK
    }

    pub fn has_commitment_length(&self) -> bool {
        self.bitfield & TOKEN_HAS_COMMITMENT_LENGTH != 0
    }

    pub fn has_amount(&self) -> bool {
        self.bitfield & TOKEN_HAS_AMOUNT != 0
    }

    pub fn has_nft(&self) -> bool {
        self.bitfield & TOKEN_HAS_NFT != 0
    }

    pub fn is_minting_nft(&self) -> bool {
        self.has_nft() && self.capability() == Capability::Minting as u8
    }

    pub fn is_mutable_nft(&self) -> bool {
        self.has_nft() && self.capability() == Capability::Mutable as u8
    }

    pub fn is_immutable_nft(&self) -> bool {
        self.has_nft() && self.capability() == Capability::NoCapability as u8
    }

    /// Structural validity of the bitfield alone: top nibble nonzero and
    /// below 0x80, capability at most 2, and fungible-only outputs may not
    /// carry a capability or a commitment length.
    pub fn is_valid_bitfield(&self) -> bool {
        let structure = self.bitfield & TOKEN_STRUCTURE_MASK;
        if structure >= 0x80 || structure == 0x00 {
            return false;
        }
        if self.capability() > Capability::Minting as u8 {
            return false;
        }
        if !self.has_nft() && !self.has_amount() {
            return false;
        }
        if !self.has_nft() && self.capability() != 0 {
            return false;
        }
        if !self.has_nft() && self.has_commitment_length() {
            return false;
        }
        true
    }

    /// The bitfield alone determines which optional fields follow it; the
    /// commitment length and amount are omitted entirely when their flag is
    /// unset.
    pub fn serialize(&self, out: &mut Vec<u8>) {
        self.category.serialize(out);
        out.push(self.bitfield);
        if self.has_commitment_length() {
            encode_compact_size(self.commitment.len() as u64, out);
            out.extend_from_slice(&self.commitment);
        }
        if self.has_amount() {
            debug_assert!(self.amount <= MAX_TOKEN_AMOUNT);
            encode_compact_size(self.amount, out);
        }
    }

    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let category = Uint256::deserialize(r)?;
        let bitfield = r.read_u8()?;

        let commitment = if bitfield & TOKEN_HAS_COMMITMENT_LENGTH != 0 {
            r.read_byte_vec("token commitment")?
        } else {
            Vec::new()
        };
        let amount = if bitfield & TOKEN_HAS_AMOUNT != 0 {
            r.read_compact_size(true)?
        } else {
            0
        };

        let data = Self {
            category,
            bitfield,
            amount,
            commitment,
        };
        if !data.is_valid_bitfield()
            || (data.has_amount() && data.amount == 0)
            || data.amount > MAX_TOKEN_AMOUNT
            || (data.has_commitment_length() && data.commitment.is_empty())
            || (data.amount == 0 && !data.has_nft())
        {
            return Err(SerializeError::InvalidTokenData);
        }
        Ok(data)
    }
}

impl fmt::Display for TokenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "category={} bitfield={:02x} amount={} commitment={}",
            self.category,
            self.bitfield,
            self.amount,
            hex::encode(&self.commitment),
        )
    }
}

/// Prepends `TOKEN_PREFIX || token_data` to the locking script; a no-op when
/// no token data is present.
pub fn wrap_script(token_data: Option<&TokenData>, locking_script: &[u8]) -> Vec<u8> {
    match token_data {
        None => locking_script.to_vec(),
        Some(td) => {
            let mut out =
                Vec::with_capacity(1 + 33 + td.commitment.len() + 9 + locking_script.len());
            out.push(TOKEN_PREFIX);
            td.serialize(&mut out);
            out.extend_from_slice(locking_script);
            out
        }
    }
}

/// Splits a wrapped locking script back into token data and plain script.
///
/// A parse or validation failure after the prefix byte is not an error: an
/// ordinary script may legitimately begin with the same byte, so the whole
/// input is returned unchanged as the locking script.
pub fn unwrap_script(wrapped: &[u8]) -> (Option<TokenData>, Vec<u8>) {
    if wrapped.first() != Some(&TOKEN_PREFIX) {
        return (None, wrapped.to_vec());
    }
    let mut r = Reader::new(&wrapped[1..]);
    match TokenData::deserialize(&mut r) {
        Ok(td) => {
            let script = wrapped[1 + r.offset()..].to_vec();
            (Some(td), script)
        }
        Err(_) => (None, wrapped.to_vec()),
    }
}
