#![no_main]

use libfuzzer_sys::fuzz_target;

use cashtx_codec::{unwrap_script, wrap_script};

fuzz_target!(|data: &[u8]| {
    let (token_data, script) = unwrap_script(data);
    // Unwrapping never loses bytes: re-wrapping reproduces the input.
    let rewrapped = wrap_script(token_data.as_ref(), &script);
    assert_eq!(rewrapped, data);
});
