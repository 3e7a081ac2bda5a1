use base64::{engine::general_purpose, Engine as _};

use crate::{Error, Result};

/// Decodes standard (padded) Base64 into raw bytes.
///
/// Line breaks and other ASCII whitespace are ignored, and a leading
/// `data:<mime>;base64,` prefix is stripped, so payloads read straight from a
/// data URL or a wrapped MIME body decode as-is.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    let body = strip_data_url_prefix(input.trim());
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::DataInvalid(e.to_string()))
}

fn strip_data_url_prefix(input: &str) -> &str {
    if !input.starts_with("data:") {
        return input;
    }
    match input.split_once(";base64,") {
        Some((_, body)) => body,
        None => input,
    }
}
