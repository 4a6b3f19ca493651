#![no_main]

use libfuzzer_sys::fuzz_target;

use cashtx_codec::Psbt;

fuzz_target!(|data: &[u8]| {
    let Ok(psbt) = Psbt::from_bytes(data) else {
        return;
    };
    // Byte-identity is not guaranteed for arbitrary accepted input (trailing
    // bytes after the final map are tolerated, finalized inputs drop their
    // pre-signing fields on write), but one serialize pass must normalize:
    // re-parsing its output and serializing again reproduces the same bytes.
    let enc = match psbt.serialize() {
        Ok(enc) => enc,
        Err(e) => panic!("parsed PSBT failed to serialize: {e}"),
    };
    let again = match Psbt::from_bytes(&enc) {
        Ok(again) => again,
        Err(e) => panic!("serialized PSBT failed to re-parse: {e}"),
    };
    assert_eq!(again.serialize().unwrap(), enc);
});
