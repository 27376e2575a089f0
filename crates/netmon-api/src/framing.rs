// Response framing
//
// The device prefixes its JSON with whatever status line and headers its
// firmware emits, with no reliable Content-Length. Everything from the
// first `{` byte to the end of the stream is taken as the JSON body.

use serde_json::Value;

use crate::error::Error;

/// Marker byte that starts the JSON payload.
pub const JSON_START: u8 = b'{';

/// How much of a bad body is kept in [`Error::Parse`] for logging.
const BODY_PREVIEW_BYTES: usize = 256;

/// Locate and parse the JSON payload in a raw device response.
///
/// A literal `{` inside a header value would be taken as the payload
/// start; the device's header set is treated as opaque.
pub fn extract_payload(raw: &[u8]) -> Result<Value, Error> {
    let start = raw
        .iter()
        .position(|&b| b == JSON_START)
        .ok_or(Error::Framing { bytes: raw.len() })?;
    let body = raw.get(start..).unwrap_or_default();

    serde_json::from_slice(body).map_err(|e| Error::Parse {
        message: e.to_string(),
        body: preview(body),
    })
}

fn preview(body: &[u8]) -> String {
    let end = body.len().min(BODY_PREVIEW_BYTES);
    String::from_utf8_lossy(body.get(..end).unwrap_or_default()).into_owned()
}
