use std::fmt;

use crate::constants::SEQUENCE_FINAL;
use crate::error::SerializeError;
use crate::hash::sha256d;
use crate::token::{unwrap_script, wrap_script, TokenData};
use crate::wire::{write_byte_vec, Reader};

/// 256-bit identifier held in hash (little-endian) byte order. Equality is
/// byte-exact; the textual form is the byte-reversed hex string, and the
/// reversal is only ever done through the two `display_hex` functions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uint256(pub [u8; 32]);

pub type TxId = Uint256;

impl Uint256 {
    /// Parses the conventional display form (byte-reversed hex).
    pub fn from_display_hex(s: &str) -> Result<Self, SerializeError> {
        let bytes = hex::decode(s).map_err(|_| SerializeError::InvalidIdentifier)?;
        let mut arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SerializeError::InvalidIdentifier)?;
        arr.reverse();
        Ok(Self(arr))
    }

    pub fn to_display_hex(&self) -> String {
        let mut rev = self.0;
        rev.reverse();
        hex::encode(rev)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }

    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let b = r.read_exact(32, "identifier")?;
        let mut id = [0u8; 32];
        id.copy_from_slice(b);
        Ok(Self(id))
    }
}

impl Default for Uint256 {
    fn default() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_hex())
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({})", self.to_display_hex())
    }
}

/// Reference to a specific output of a prior transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutPoint {
    pub txid: TxId,
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: TxId, vout: u32) -> Self {
        Self { txid, vout }
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        self.txid.serialize(out);
        out.extend_from_slice(&self.vout.to_le_bytes());
    }

    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let txid = TxId::deserialize(r)?;
        let vout = r.read_u32le()?;
        Ok(Self { txid, vout })
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    pub prevout: OutPoint,
    pub unlocking_script: Vec<u8>,
    pub sequence: u32,
}

impl Default for TxInput {
    fn default() -> Self {
        Self {
            prevout: OutPoint::default(),
            unlocking_script: Vec::new(),
            sequence: SEQUENCE_FINAL,
        }
    }
}

impl TxInput {
    pub fn serialize(&self, out: &mut Vec<u8>) {
        self.prevout.serialize(out);
        write_byte_vec(out, &self.unlocking_script);
        out.extend_from_slice(&self.sequence.to_le_bytes());
    }

    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let prevout = OutPoint::deserialize(r)?;
        let unlocking_script = r.read_byte_vec("unlocking script")?;
        let sequence = r.read_u32le()?;
        Ok(Self {
            prevout,
            unlocking_script,
            sequence,
        })
    }
}

/// A transaction output. `token_data` is not an independent wire field: it is
/// embedded in the serialized locking script behind the token prefix byte,
/// and recovered from it on read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxOutput {
    pub value: i64,
    pub locking_script: Vec<u8>,
    pub token_data: Option<TokenData>,
}

impl TxOutput {
    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value.to_le_bytes());
        let wrapped = wrap_script(self.token_data.as_ref(), &self.locking_script);
        write_byte_vec(out, &wrapped);
    }

    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let value = r.read_i64le()?;
        let wrapped = r.read_byte_vec("locking script")?;
        let (token_data, locking_script) = unwrap_script(&wrapped);
        Ok(Self {
            value,
            locking_script,
            token_data,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub locktime: u32,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            version: 2,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locktime: 0,
        }
    }
}

impl Transaction {
    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        crate::compactsize::encode_compact_size(self.inputs.len() as u64, out);
        for input in &self.inputs {
            input.serialize(out);
        }
        crate::compactsize::encode_compact_size(self.outputs.len() as u64, out);
        for output in &self.outputs {
            output.serialize(out);
        }
        out.extend_from_slice(&self.locktime.to_le_bytes());
    }

    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let version = r.read_i32le()?;

        let input_count = r.read_compact_size(true)?;
        // Every serialized input occupies at least one byte, so the remaining
        // buffer length bounds any honest count.
        if input_count > r.remaining() as u64 {
            return Err(SerializeError::LengthOverflow("input count", input_count));
        }
        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            inputs.push(TxInput::deserialize(r)?);
        }

        let output_count = r.read_compact_size(true)?;
        if output_count > r.remaining() as u64 {
            return Err(SerializeError::LengthOverflow("output count", output_count));
        }
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            outputs.push(TxOutput::deserialize(r)?);
        }

        let locktime = r.read_u32le()?;

        Ok(Self {
            version,
            inputs,
            outputs,
            locktime,
        })
    }

    /// Parses a complete transaction, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializeError> {
        let mut r = Reader::new(bytes);
        let tx = Self::deserialize(&mut r)?;
        if r.can_read_more() {
            return Err(SerializeError::TrailingBytes("transaction"));
        }
        Ok(tx)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.serialize(&mut out);
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The transaction identifier: the hash of the serialization. Derived on
    /// demand, never settable.
    pub fn txid(&self) -> TxId {
        Uint256(sha256d(&self.to_bytes()))
    }
}
