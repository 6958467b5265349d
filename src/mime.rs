//! Plain-text body extraction from MIME payload trees

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use tracing::warn;

use crate::error::{MailError, Result};
use crate::models::{DecodedText, Payload};

/// base64url decoder that accepts bodies with or without `=` padding
const BASE64URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Collect every decodable `text/plain` body, depth-first, left to right.
///
/// Nodes are traversed regardless of depth. HTML alternates, attachments,
/// empty bodies and empty multiparts contribute nothing. A body that fails
/// to decode is logged and skipped; the rest of the tree is still visited.
pub fn extract_plain_text(payload: &Payload) -> Vec<DecodedText> {
    match payload {
        Payload::Node { children, .. } => children.iter().flat_map(extract_plain_text).collect(),
        Payload::Leaf {
            mime_type,
            body: Some(data),
        } if is_plain_text(mime_type) && !data.is_empty() => match decode_body(data) {
            Ok(text) => vec![text],
            Err(e) => {
                warn!("Skipping undecodable {} body: {}", mime_type, e);
                Vec::new()
            }
        },
        Payload::Leaf { .. } => Vec::new(),
    }
}

/// Decode a base64url body into UTF-8 text
pub fn decode_body(data: &str) -> Result<DecodedText> {
    let bytes = BASE64URL_LENIENT
        .decode(data.trim())
        .map_err(|e| MailError::DecodeError(format!("invalid base64url: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| MailError::DecodeError(format!("invalid UTF-8: {}", e)))
}

/// Encode text the way the provider encodes bodies (base64url, unpadded)
pub fn encode_body(bytes: impl AsRef<[u8]>) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare the MIME essence (type/subtype) against `text/plain`
fn is_plain_text(mime_type: &str) -> bool {
    mime_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("text/plain"))
}
