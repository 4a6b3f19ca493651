use crate::compactsize::{encode_compact_size, read_compact_size};
use crate::error::SerializeError;

/// Cursor over an in-memory byte buffer. Every higher layer parses through
/// one of these; there is no streaming mode.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// True while unconsumed bytes remain; drives every TLV map loop.
    pub fn can_read_more(&self) -> bool {
        self.remaining() > 0
    }

    pub fn read_exact(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], SerializeError> {
        if self.remaining() < len {
            return Err(SerializeError::UnexpectedEnd(what));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.bytes[start..start + len])
    }

    pub fn read_u8(&mut self) -> Result<u8, SerializeError> {
        Ok(self.read_exact(1, "u8")?[0])
    }

    pub fn read_u16le(&mut self) -> Result<u16, SerializeError> {
        let b = self.read_exact(2, "u16")?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32le(&mut self) -> Result<u32, SerializeError> {
        let b = self.read_exact(4, "u32")?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64le(&mut self) -> Result<u64, SerializeError> {
        let b = self.read_exact(8, "u64")?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_i32le(&mut self) -> Result<i32, SerializeError> {
        Ok(self.read_u32le()? as i32)
    }

    pub fn read_i64le(&mut self) -> Result<i64, SerializeError> {
        Ok(self.read_u64le()? as i64)
    }

    pub fn read_compact_size(&mut self, strict: bool) -> Result<u64, SerializeError> {
        read_compact_size(self, strict)
    }

    /// Reads `compact_size(length) || bytes`. The length is checked against
    /// the remaining buffer before any allocation happens, so a corrupt
    /// length fails deterministically instead of attempting a huge reserve.
    pub fn read_byte_vec(&mut self, what: &'static str) -> Result<Vec<u8>, SerializeError> {
        let len = self.read_compact_size(true)?;
        if len > self.remaining() as u64 {
            return Err(SerializeError::LengthOverflow(what, len));
        }
        Ok(self.read_exact(len as usize, what)?.to_vec())
    }
}

/// Appends `compact_size(bytes.len()) || bytes`.
pub fn write_byte_vec(out: &mut Vec<u8>, bytes: &[u8]) {
    encode_compact_size(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}
