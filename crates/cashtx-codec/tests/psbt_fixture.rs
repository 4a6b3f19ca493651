//! End-to-end checks against a known-good two-input two-output PSBT.

use cashtx_codec::{OutPoint, Psbt, PsbtSource, Uint256};

const RAW_PSBT_HEX: &str = concat!(
    "70736274ff0100a0020000000258e87a21b56daf0c23be8e7070456c336f7cbaa5c875",
    "7924f545887bb2abdd750000000000ffffffff6b04ec37326fbac8e468a73bf952c887",
    "7f84f96c3f9deadeab246455e34fe0cd0100000000ffffffff0270aaf0080000000019",
    "76a914d85c2b71d0060b09c9886aeb815e50991dda124d88ac00e1f505000000001976",
    "a91400aea9a2e5f0f876a588df5546e8742d1d87008f88ac000000000001002080f0fa",
    "020000000017a9140fb9463421696b82c833af241c78c17ddbde493487010447522102",
    "9583bf39ae0a609747ad199addd634fa6108559d6c5cd39b4c2183f1ab96e07f2102da",
    "b61ff49a14db6a7d02b0cd1fbb78fc4b18312b5b4e54dae4dba2fbfef536d752ae2206",
    "029583bf39ae0a609747ad199addd634fa6108559d6c5cd39b4c2183f1ab96e07f10d9",
    "0c6a4f000000800000008000000080220602dab61ff49a14db6a7d02b0cd1fbb78fc4b",
    "18312b5b4e54dae4dba2fbfef536d710d90c6a4f000000800000008001000080000100",
    "2000c2eb0b0000000017a914f6539307e3a48d1e0136d061f5d1fe19e1a24089870104",
    "47522103089dc10c7ac6db54f91329af617333db388cead0c231f723379d1b99030b02",
    "dc21023add904f3d6dcf59ddb906b0dee23529b7ffb9ed50e5e86151926860221f0e73",
    "52ae2206023add904f3d6dcf59ddb906b0dee23529b7ffb9ed50e5e86151926860221f",
    "0e7310d90c6a4f000000800000008003000080220603089dc10c7ac6db54f91329af61",
    "7333db388cead0c231f723379d1b99030b02dc10d90c6a4f0000008000000080020000",
    "8000220203a9a4c37f5996d3aa25dbac6b570af0650394492942460b354753ed9eeca5",
    "877110d90c6a4f000000800000008004000080002202027f6399757d2eff55a136ad02",
    "c684b1838b6556e5f1b6b34282a94b6b5005109610d90c6a4f00000080000000800500",
    "008000",
);

const OTHER_PSBT_B64: &str = concat!(
    "cHNidP8BAFUCAAAAAQYzCdm3wW2eMlfpXZWPJWHiKL0eTboVXoLR8UWVDRtMAQAAAAD+////AUHg9QUAAAAAGXapFFsLO",
    "OuZXnYrjT1B43DjKiMESP/RiKwAAAAAAAEAIgDh9QUAAAAAGXapFPNE2zFEjhpes6/Jz+a0qkpPF2AbiKwiBgNlj2uZsI",
    "HxYysuuf3RdIuaNPv+1Arr5GELK+jvU2J3xBDbPmF0AAAAgAAAAIAAAACAAAA=",
);

fn pubkey(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap()
}

#[test]
fn fixture_round_trips_byte_exact() {
    let psbt = Psbt::deserialize(PsbtSource::Hex(RAW_PSBT_HEX)).unwrap();
    assert_eq!(psbt.to_hex().unwrap(), RAW_PSBT_HEX);

    let again = Psbt::from_bytes(&psbt.serialize().unwrap()).unwrap();
    assert_eq!(again, psbt);
    assert_eq!(again.to_hex().unwrap(), RAW_PSBT_HEX);
}

#[test]
fn fixture_unsigned_tx_fields() {
    let psbt = Psbt::deserialize(PsbtSource::Hex(RAW_PSBT_HEX)).unwrap();
    let tx = psbt.unsigned_tx.as_ref().unwrap();

    assert_eq!(
        tx.txid().to_display_hex(),
        "6d22ead0a603fdf0aa643a0109d4051de19ec94cfe1bd1ea7c241990d8a02ad5"
    );
    assert_eq!(tx.to_bytes().len(), 160);
    assert_eq!(tx.version, 2);
    assert_eq!(tx.locktime, 0);
    assert_eq!(tx.inputs.len(), 2);
    assert_eq!(tx.outputs.len(), 2);

    let prevout0 = OutPoint::new(
        Uint256::from_display_hex(
            "75ddabb27b8845f5247975c8a5ba7c6f336c4570708ebe230caf6db5217ae858",
        )
        .unwrap(),
        0,
    );
    assert_eq!(tx.inputs[0].prevout, prevout0);
    assert_eq!(
        tx.inputs[0].prevout.to_string(),
        "75ddabb27b8845f5247975c8a5ba7c6f336c4570708ebe230caf6db5217ae858:0"
    );
    assert_eq!(
        tx.inputs[1].prevout.to_string(),
        "cde04fe3556424abdeea9d3f6cf9847f87c852f93ba768e4c8ba6f3237ec046b:1"
    );
    assert!(tx.inputs[0].unlocking_script.is_empty());
    assert!(tx.inputs[1].unlocking_script.is_empty());

    assert_eq!(
        hex::encode(&tx.outputs[0].locking_script),
        "76a914d85c2b71d0060b09c9886aeb815e50991dda124d88ac"
    );
    assert_eq!(tx.outputs[0].value, 149_990_000);
    assert_eq!(
        hex::encode(&tx.outputs[1].locking_script),
        "76a91400aea9a2e5f0f876a588df5546e8742d1d87008f88ac"
    );
    assert_eq!(tx.outputs[1].value, 100_000_000);
}

#[test]
fn fixture_input_metadata() {
    let psbt = Psbt::deserialize(PsbtSource::Hex(RAW_PSBT_HEX)).unwrap();
    assert_eq!(psbt.inputs.len(), 2);
    assert!(psbt.inputs.iter().all(|inp| inp.unknown.is_empty()));
    assert!(psbt
        .inputs
        .iter()
        .all(|inp| inp.final_unlocking_script.is_empty()));

    let utxo0 = psbt.inputs[0].utxo.as_ref().unwrap();
    let utxo1 = psbt.inputs[1].utxo.as_ref().unwrap();
    assert_eq!(
        hex::encode(&utxo0.locking_script),
        "a9140fb9463421696b82c833af241c78c17ddbde493487"
    );
    assert_eq!(
        hex::encode(&utxo1.locking_script),
        "a914f6539307e3a48d1e0136d061f5d1fe19e1a2408987"
    );
    assert_eq!(utxo0.value, 50_000_000);
    assert_eq!(utxo1.value, 200_000_000);
    assert!(utxo0.token_data.is_none());
    assert!(utxo1.token_data.is_none());

    assert_eq!(
        hex::encode(&psbt.inputs[0].redeem_script),
        "5221029583bf39ae0a609747ad199addd634fa6108559d6c5cd39b4c2183f1ab96e07f2102dab61ff49a14db6a7d02b0cd1fbb78fc4b18312b5b4e54dae4dba2fbfef536d752ae"
    );
    assert_eq!(
        hex::encode(&psbt.inputs[1].redeem_script),
        "522103089dc10c7ac6db54f91329af617333db388cead0c231f723379d1b99030b02dc21023add904f3d6dcf59ddb906b0dee23529b7ffb9ed50e5e86151926860221f0e7352ae"
    );

    let fingerprint = [0xd9, 0x0c, 0x6a, 0x4f];
    let cases = [
        (
            0usize,
            "029583bf39ae0a609747ad199addd634fa6108559d6c5cd39b4c2183f1ab96e07f",
            "m/0'/0'/0'",
        ),
        (
            0,
            "02dab61ff49a14db6a7d02b0cd1fbb78fc4b18312b5b4e54dae4dba2fbfef536d7",
            "m/0'/0'/1'",
        ),
        (
            1,
            "023add904f3d6dcf59ddb906b0dee23529b7ffb9ed50e5e86151926860221f0e73",
            "m/0'/0'/3'",
        ),
        (
            1,
            "03089dc10c7ac6db54f91329af617333db388cead0c231f723379d1b99030b02dc",
            "m/0'/0'/2'",
        ),
    ];
    for (idx, pk, path) in cases {
        let origin = psbt.inputs[idx].hd_keypaths.get(&pubkey(pk)).unwrap();
        assert_eq!(origin.fingerprint, fingerprint);
        assert_eq!(origin.to_string(), path, "input {idx} pubkey {pk}");
    }
}

#[test]
fn fixture_output_metadata_and_fee() {
    let psbt = Psbt::deserialize(PsbtSource::Hex(RAW_PSBT_HEX)).unwrap();
    let fingerprint = [0xd9, 0x0c, 0x6a, 0x4f];

    let origin0 = psbt.outputs[0]
        .hd_keypaths
        .get(&pubkey(
            "03a9a4c37f5996d3aa25dbac6b570af0650394492942460b354753ed9eeca58771",
        ))
        .unwrap();
    assert_eq!(origin0.fingerprint, fingerprint);
    assert_eq!(origin0.to_string(), "m/0'/0'/4'");

    let origin1 = psbt.outputs[1]
        .hd_keypaths
        .get(&pubkey(
            "027f6399757d2eff55a136ad02c684b1838b6556e5f1b6b34282a94b6b50051096",
        ))
        .unwrap();
    assert_eq!(origin1.fingerprint, fingerprint);
    assert_eq!(origin1.to_string(), "m/0'/0'/5'");

    assert!(psbt.unknown.is_empty());

    let tx = psbt.unsigned_tx.as_ref().unwrap();
    let in_value: i64 = psbt
        .inputs
        .iter()
        .map(|inp| inp.utxo.as_ref().unwrap().value)
        .sum();
    let out_value: i64 = tx.outputs.iter().map(|out| out.value).sum();
    assert_eq!(in_value - out_value, 10_000);
}

#[test]
fn base64_fixture_round_trips() {
    let psbt = Psbt::deserialize(PsbtSource::Base64(OTHER_PSBT_B64)).unwrap();
    assert_eq!(psbt.to_base64().unwrap(), OTHER_PSBT_B64);

    let hex_psbt = Psbt::deserialize(PsbtSource::Hex(RAW_PSBT_HEX)).unwrap();
    assert_ne!(psbt, hex_psbt);

    // Structural re-parse through the base64 transport.
    let b64 = hex_psbt.to_base64().unwrap();
    let reparsed = Psbt::deserialize(PsbtSource::Base64(&b64)).unwrap();
    assert_eq!(reparsed, hex_psbt);
    assert_ne!(reparsed.to_base64().unwrap(), OTHER_PSBT_B64);
}
