use cashtx_codec::{Psbt, PsbtSource, SerializeError, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct Request {
    op: String,

    #[serde(default)]
    tx_hex: String,

    #[serde(default)]
    psbt_hex: String,

    #[serde(default)]
    psbt_b64: String,
}

#[derive(Serialize)]
struct Response {
    ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    txid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    num_inputs: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    num_outputs: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    psbt_hex: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    psbt_b64: Option<String>,
}

impl Response {
    fn failure(err: String) -> Self {
        Response {
            ok: false,
            err: Some(err),
            txid: None,
            size: None,
            num_inputs: None,
            num_outputs: None,
            psbt_hex: None,
            psbt_b64: None,
        }
    }
}

fn emit(resp: &Response) {
    let _ = serde_json::to_writer(std::io::stdout(), resp);
}

/// The PSBT source is whichever transport field the request filled in;
/// hex wins when both are present.
fn psbt_source(req: &Request) -> Result<Psbt, SerializeError> {
    if !req.psbt_hex.is_empty() {
        Psbt::deserialize(PsbtSource::Hex(&req.psbt_hex))
    } else {
        Psbt::deserialize(PsbtSource::Base64(&req.psbt_b64))
    }
}

fn main() {
    let req: Request = match serde_json::from_reader(std::io::stdin()) {
        Ok(v) => v,
        Err(e) => {
            emit(&Response::failure(format!("bad request: {e}")));
            return;
        }
    };

    match req.op.as_str() {
        "parse_tx" => {
            let tx_bytes = match hex::decode(req.tx_hex) {
                Ok(v) => v,
                Err(_) => {
                    emit(&Response::failure("bad hex".to_string()));
                    return;
                }
            };
            match Transaction::from_bytes(&tx_bytes) {
                Ok(tx) => {
                    let resp = Response {
                        ok: true,
                        err: None,
                        txid: Some(tx.txid().to_display_hex()),
                        size: Some(tx_bytes.len()),
                        num_inputs: Some(tx.inputs.len()),
                        num_outputs: Some(tx.outputs.len()),
                        psbt_hex: None,
                        psbt_b64: None,
                    };
                    emit(&resp);
                }
                Err(e) => emit(&Response::failure(e.to_string())),
            }
        }
        "parse_psbt" => match psbt_source(&req) {
            Ok(psbt) => {
                // from_bytes guarantees the transaction is present.
                let tx = psbt.unsigned_tx.as_ref();
                let resp = Response {
                    ok: true,
                    err: None,
                    txid: tx.map(|tx| tx.txid().to_display_hex()),
                    size: None,
                    num_inputs: Some(psbt.inputs.len()),
                    num_outputs: Some(psbt.outputs.len()),
                    psbt_hex: None,
                    psbt_b64: None,
                };
                emit(&resp);
            }
            Err(e) => emit(&Response::failure(e.to_string())),
        },
        "convert_psbt" => match psbt_source(&req) {
            Ok(psbt) => match (psbt.to_hex(), psbt.to_base64()) {
                (Ok(hex_form), Ok(b64_form)) => {
                    let resp = Response {
                        ok: true,
                        err: None,
                        txid: None,
                        size: None,
                        num_inputs: None,
                        num_outputs: None,
                        psbt_hex: Some(hex_form),
                        psbt_b64: Some(b64_form),
                    };
                    emit(&resp);
                }
                (Err(e), _) | (_, Err(e)) => emit(&Response::failure(e.to_string())),
            },
            Err(e) => emit(&Response::failure(e.to_string())),
        },
        _ => emit(&Response::failure("unknown op".to_string())),
    }
}
