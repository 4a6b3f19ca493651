//! PSBT container codec: one global TLV map carrying the unsigned
//! transaction, one map per transaction input and one per output, each a
//! sequence of byte-vector `(key, value)` pairs ended by an empty key.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;

use crate::constants::{
    PSBT_GLOBAL_UNSIGNED_TX, PSBT_IN_BIP32_DERIVATION, PSBT_IN_FINAL_SCRIPT_SIG,
    PSBT_IN_PARTIAL_SIG, PSBT_IN_REDEEM_SCRIPT, PSBT_IN_SIGHASH, PSBT_IN_UTXO, PSBT_MAGIC_BYTES,
    PSBT_OUT_BIP32_DERIVATION, PSBT_OUT_REDEEM_SCRIPT, PSBT_SEPARATOR,
};
use crate::error::{PsbtError, SerializeError};
use crate::hash::hash160;
use crate::pubkey::{parse_pubkey_key, validate_pubkey};
use crate::tx::{Transaction, TxOutput};
use crate::wire::{write_byte_vec, Reader};

/// Master-key fingerprint plus BIP-32 derivation path. The textual form is
/// `m/i'/j/...` with `'` marking indices whose high bit is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyOriginInfo {
    pub fingerprint: [u8; 4],
    pub path: Vec<u32>,
}

impl Default for KeyOriginInfo {
    fn default() -> Self {
        Self {
            fingerprint: [0u8; 4],
            path: Vec::new(),
        }
    }
}

impl fmt::Display for KeyOriginInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for &index in &self.path {
            if index & 0x8000_0000 != 0 {
                write!(f, "/{}'", index & !0x8000_0000)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

/// A partial signature as stored in an input map, keyed internally by
/// `hash160(pubkey)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialSig {
    pub pubkey: Vec<u8>,
    pub signature: Vec<u8>,
}

fn read_unknown(
    r: &mut Reader<'_>,
    key: Vec<u8>,
    unknown: &mut IndexMap<Vec<u8>, Vec<u8>>,
) -> Result<(), SerializeError> {
    if unknown.contains_key(&key) {
        return Err(PsbtError::DuplicateKey("key for unknown value").into());
    }
    let value = r.read_byte_vec("unknown value")?;
    unknown.insert(key, value);
    Ok(())
}

fn write_unknown(out: &mut Vec<u8>, unknown: &IndexMap<Vec<u8>, Vec<u8>>) {
    for (key, value) in unknown {
        write_byte_vec(out, key);
        write_byte_vec(out, value);
    }
}

fn read_hd_keypath(
    r: &mut Reader<'_>,
    key: &[u8],
    hd_keypaths: &mut IndexMap<Vec<u8>, KeyOriginInfo>,
) -> Result<(), SerializeError> {
    let pubkey = parse_pubkey_key(key)?;
    if hd_keypaths.contains_key(&pubkey) {
        return Err(PsbtError::DuplicateKey("pubkey derivation path").into());
    }
    let value = r.read_byte_vec("HD keypath")?;
    if value.is_empty() || value.len() % 4 != 0 {
        return Err(PsbtError::KeypathLength.into());
    }
    let mut vr = Reader::new(&value);
    let mut fingerprint = [0u8; 4];
    fingerprint.copy_from_slice(vr.read_exact(4, "fingerprint")?);
    let mut path = Vec::with_capacity(value.len() / 4 - 1);
    while vr.can_read_more() {
        path.push(vr.read_u32le()?);
    }
    hd_keypaths.insert(pubkey, KeyOriginInfo { fingerprint, path });
    Ok(())
}

fn write_hd_keypaths(
    out: &mut Vec<u8>,
    hd_keypaths: &IndexMap<Vec<u8>, KeyOriginInfo>,
    typ: u8,
) -> Result<(), SerializeError> {
    for (pubkey, origin) in hd_keypaths {
        validate_pubkey(pubkey)?;
        let mut key = Vec::with_capacity(1 + pubkey.len());
        key.push(typ);
        key.extend_from_slice(pubkey);
        write_byte_vec(out, &key);

        let mut value = Vec::with_capacity(4 + 4 * origin.path.len());
        value.extend_from_slice(&origin.fingerprint);
        for index in &origin.path {
            value.extend_from_slice(&index.to_le_bytes());
        }
        write_byte_vec(out, &value);
    }
    Ok(())
}

/// Per-input signing metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PsbtInput {
    pub utxo: Option<TxOutput>,
    pub final_unlocking_script: Vec<u8>,
    pub partial_sigs: IndexMap<[u8; 20], PartialSig>,
    pub sighash_type: u32,
    pub redeem_script: Vec<u8>,
    pub hd_keypaths: IndexMap<Vec<u8>, KeyOriginInfo>,
    pub unknown: IndexMap<Vec<u8>, Vec<u8>>,
}

impl PsbtInput {
    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let mut input = Self::default();
        while r.can_read_more() {
            let key = r.read_byte_vec("map key")?;
            if key.is_empty() {
                // Separator, end of this input.
                break;
            }
            match key[0] {
                PSBT_IN_UTXO => {
                    if input.utxo.is_some() {
                        return Err(PsbtError::DuplicateKey("input utxo").into());
                    }
                    if key.len() != 1 {
                        return Err(PsbtError::KeyLength("utxo").into());
                    }
                    let data = r.read_byte_vec("utxo")?;
                    let mut ur = Reader::new(&data);
                    let utxo = TxOutput::deserialize(&mut ur)?;
                    if ur.can_read_more() {
                        return Err(PsbtError::TrailingBytes("utxo").into());
                    }
                    input.utxo = Some(utxo);
                }
                PSBT_IN_PARTIAL_SIG => {
                    let pubkey = parse_pubkey_key(&key)?;
                    let key_id = hash160(&pubkey);
                    if input.partial_sigs.contains_key(&key_id) {
                        return Err(PsbtError::DuplicateKey(
                            "input partial signature for pubkey",
                        )
                        .into());
                    }
                    let signature = r.read_byte_vec("partial signature")?;
                    input
                        .partial_sigs
                        .insert(key_id, PartialSig { pubkey, signature });
                }
                PSBT_IN_SIGHASH => {
                    if input.sighash_type != 0 {
                        return Err(PsbtError::DuplicateKey("input sighash type").into());
                    }
                    if key.len() != 1 {
                        return Err(PsbtError::KeyLength("sighash type").into());
                    }
                    let data = r.read_byte_vec("sighash type")?;
                    let mut sr = Reader::new(&data);
                    input.sighash_type = sr.read_u32le()?;
                    if sr.can_read_more() {
                        return Err(PsbtError::TrailingBytes("sighash type").into());
                    }
                }
                PSBT_IN_REDEEM_SCRIPT => {
                    if !input.redeem_script.is_empty() {
                        return Err(PsbtError::DuplicateKey("input redeem script").into());
                    }
                    if key.len() != 1 {
                        return Err(PsbtError::KeyLength("input redeem script").into());
                    }
                    input.redeem_script = r.read_byte_vec("input redeem script")?;
                }
                PSBT_IN_BIP32_DERIVATION => {
                    read_hd_keypath(r, &key, &mut input.hd_keypaths)?;
                }
                PSBT_IN_FINAL_SCRIPT_SIG => {
                    if !input.final_unlocking_script.is_empty() {
                        return Err(
                            PsbtError::DuplicateKey("input final unlocking script").into()
                        );
                    }
                    if key.len() != 1 {
                        return Err(PsbtError::KeyLength("final unlocking script").into());
                    }
                    input.final_unlocking_script = r.read_byte_vec("final unlocking script")?;
                }
                _ => read_unknown(r, key, &mut input.unknown)?,
            }
        }
        Ok(input)
    }

    pub fn serialize(&self, out: &mut Vec<u8>) -> Result<(), SerializeError> {
        if let Some(utxo) = &self.utxo {
            write_byte_vec(out, &[PSBT_IN_UTXO]);
            let mut buf = Vec::new();
            utxo.serialize(&mut buf);
            write_byte_vec(out, &buf);
        }

        if self.final_unlocking_script.is_empty() {
            for sig in self.partial_sigs.values() {
                let mut key = Vec::with_capacity(1 + sig.pubkey.len());
                key.push(PSBT_IN_PARTIAL_SIG);
                key.extend_from_slice(&sig.pubkey);
                write_byte_vec(out, &key);
                write_byte_vec(out, &sig.signature);
            }

            if self.sighash_type != 0 {
                write_byte_vec(out, &[PSBT_IN_SIGHASH]);
                write_byte_vec(out, &self.sighash_type.to_le_bytes());
            }

            if !self.redeem_script.is_empty() {
                write_byte_vec(out, &[PSBT_IN_REDEEM_SCRIPT]);
                write_byte_vec(out, &self.redeem_script);
            }

            write_hd_keypaths(out, &self.hd_keypaths, PSBT_IN_BIP32_DERIVATION)?;
        } else {
            // Finalization supersedes the pre-signing fields on the wire.
            write_byte_vec(out, &[PSBT_IN_FINAL_SCRIPT_SIG]);
            write_byte_vec(out, &self.final_unlocking_script);
        }

        write_unknown(out, &self.unknown);
        write_byte_vec(out, PSBT_SEPARATOR);
        Ok(())
    }
}

/// Per-output metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PsbtOutput {
    pub redeem_script: Vec<u8>,
    pub hd_keypaths: IndexMap<Vec<u8>, KeyOriginInfo>,
    pub unknown: IndexMap<Vec<u8>, Vec<u8>>,
}

impl PsbtOutput {
    pub fn deserialize(r: &mut Reader<'_>) -> Result<Self, SerializeError> {
        let mut output = Self::default();
        while r.can_read_more() {
            let key = r.read_byte_vec("map key")?;
            if key.is_empty() {
                break;
            }
            match key[0] {
                PSBT_OUT_REDEEM_SCRIPT => {
                    if !output.redeem_script.is_empty() {
                        return Err(PsbtError::DuplicateKey("output redeem script").into());
                    }
                    if key.len() != 1 {
                        return Err(PsbtError::KeyLength("output redeem script").into());
                    }
                    output.redeem_script = r.read_byte_vec("output redeem script")?;
                }
                PSBT_OUT_BIP32_DERIVATION => {
                    read_hd_keypath(r, &key, &mut output.hd_keypaths)?;
                }
                _ => read_unknown(r, key, &mut output.unknown)?,
            }
        }
        Ok(output)
    }

    pub fn serialize(&self, out: &mut Vec<u8>) -> Result<(), SerializeError> {
        if !self.redeem_script.is_empty() {
            write_byte_vec(out, &[PSBT_OUT_REDEEM_SCRIPT]);
            write_byte_vec(out, &self.redeem_script);
        }
        write_hd_keypaths(out, &self.hd_keypaths, PSBT_OUT_BIP32_DERIVATION)?;
        write_unknown(out, &self.unknown);
        write_byte_vec(out, PSBT_SEPARATOR);
        Ok(())
    }
}

/// The byte-source shapes accepted by [`Psbt::deserialize`]. The caller
/// states the encoding explicitly; nothing is sniffed.
#[derive(Clone, Copy, Debug)]
pub enum PsbtSource<'a> {
    Bytes(&'a [u8]),
    Hex(&'a str),
    Base64(&'a str),
}

/// A partially signed transaction: the unsigned transaction plus one
/// metadata map per input and per output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Psbt {
    pub unsigned_tx: Option<Transaction>,
    pub inputs: Vec<PsbtInput>,
    pub outputs: Vec<PsbtOutput>,
    pub unknown: IndexMap<Vec<u8>, Vec<u8>>,
}

impl Psbt {
    /// Resolves the source to raw bytes once, then parses.
    pub fn deserialize(src: PsbtSource<'_>) -> Result<Self, SerializeError> {
        match src {
            PsbtSource::Bytes(bytes) => Self::from_bytes(bytes),
            PsbtSource::Hex(s) => {
                let bytes = hex::decode(s).map_err(|_| PsbtError::InvalidHex)?;
                Self::from_bytes(&bytes)
            }
            PsbtSource::Base64(s) => {
                let bytes = BASE64_STANDARD
                    .decode(s)
                    .map_err(|_| PsbtError::InvalidBase64)?;
                Self::from_bytes(&bytes)
            }
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializeError> {
        let mut r = Reader::new(bytes);

        // The magic check runs before any map parsing and reports its own
        // error class, even on short input.
        let magic = r
            .read_exact(5, "magic bytes")
            .map_err(|_| PsbtError::BadMagic)?;
        if magic != PSBT_MAGIC_BYTES {
            return Err(PsbtError::BadMagic.into());
        }

        let mut psbt = Self::default();

        while r.can_read_more() {
            let key = r.read_byte_vec("map key")?;
            if key.is_empty() {
                break;
            }
            match key[0] {
                PSBT_GLOBAL_UNSIGNED_TX => {
                    if key.len() != 1 {
                        return Err(PsbtError::KeyLength("global unsigned tx").into());
                    }
                    if psbt.unsigned_tx.is_some() {
                        return Err(PsbtError::DuplicateKey("unsigned tx").into());
                    }
                    let data = r.read_byte_vec("unsigned tx")?;
                    let mut tr = Reader::new(&data);
                    let tx = Transaction::deserialize(&mut tr)?;
                    if tr.can_read_more() {
                        return Err(PsbtError::TrailingBytes("transaction").into());
                    }
                    for (i, inp) in tx.inputs.iter().enumerate() {
                        if !inp.unlocking_script.is_empty() {
                            return Err(PsbtError::NonEmptyUnlockingScript(i).into());
                        }
                    }
                    psbt.unsigned_tx = Some(tx);
                }
                _ => read_unknown(&mut r, key, &mut psbt.unknown)?,
            }
        }

        let (input_count, output_count) = match &psbt.unsigned_tx {
            Some(tx) => (tx.inputs.len(), tx.outputs.len()),
            None => return Err(PsbtError::MissingUnsignedTx.into()),
        };

        for _ in 0..input_count {
            if !r.can_read_more() {
                return Err(PsbtError::InputCountMismatch.into());
            }
            psbt.inputs.push(PsbtInput::deserialize(&mut r)?);
        }

        for _ in 0..output_count {
            if !r.can_read_more() {
                return Err(PsbtError::OutputCountMismatch.into());
            }
            psbt.outputs.push(PsbtOutput::deserialize(&mut r)?);
        }

        Ok(psbt)
    }

    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let mut out = Vec::new();
        out.extend_from_slice(&PSBT_MAGIC_BYTES);

        // Write-time invariants: the transaction must be present and still
        // unsigned. A script mutated after parse is an error, not silently
        // re-cleared.
        let tx = match &self.unsigned_tx {
            Some(tx) => tx,
            None => return Err(PsbtError::MissingUnsignedTx.into()),
        };
        for (i, inp) in tx.inputs.iter().enumerate() {
            if !inp.unlocking_script.is_empty() {
                return Err(PsbtError::NonEmptyUnlockingScript(i).into());
            }
        }

        write_byte_vec(&mut out, &[PSBT_GLOBAL_UNSIGNED_TX]);
        let mut buf = Vec::new();
        tx.serialize(&mut buf);
        write_byte_vec(&mut out, &buf);

        write_unknown(&mut out, &self.unknown);
        write_byte_vec(&mut out, PSBT_SEPARATOR);

        if self.inputs.len() != tx.inputs.len() {
            return Err(PsbtError::InputCountMismatch.into());
        }
        for input in &self.inputs {
            input.serialize(&mut out)?;
        }

        if self.outputs.len() != tx.outputs.len() {
            return Err(PsbtError::OutputCountMismatch.into());
        }
        for output in &self.outputs {
            output.serialize(&mut out)?;
        }

        Ok(out)
    }

    pub fn to_hex(&self) -> Result<String, SerializeError> {
        Ok(hex::encode(self.serialize()?))
    }

    /// Standard-alphabet base64, no embedded newlines.
    pub fn to_base64(&self) -> Result<String, SerializeError> {
        Ok(BASE64_STANDARD.encode(self.serialize()?))
    }
}
