use crate::error::SerializeError;
use crate::wire::Reader;

/// Reads a compact-size integer. With `strict`, non-minimal encodings are
/// rejected; every byte-vector and map read above this layer is strict.
pub fn read_compact_size(r: &mut Reader<'_>, strict: bool) -> Result<u64, SerializeError> {
    let tag = r.read_u8()?;

    let (v, minimal) = match tag {
        0x00..=0xfc => (tag as u64, true),
        0xfd => {
            let v = r.read_u16le()? as u64;
            (v, v >= 0xfd)
        }
        0xfe => {
            let v = r.read_u32le()? as u64;
            (v, v > 0xffff)
        }
        0xff => {
            let v = r.read_u64le()?;
            (v, v > 0xffff_ffff)
        }
    };

    if strict && !minimal {
        return Err(SerializeError::NonMinimalCompactSize);
    }

    Ok(v)
}

/// Strict decode from the front of a slice, returning `(value, consumed)`.
pub fn read_compact_size_bytes(b: &[u8]) -> Result<(u64, usize), SerializeError> {
    let mut r = Reader::new(b);
    let v = read_compact_size(&mut r, true)?;
    Ok((v, r.offset()))
}

pub fn encode_compact_size(n: u64, out: &mut Vec<u8>) {
    match n {
        0x00..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}
