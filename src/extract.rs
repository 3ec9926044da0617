//! Plain-text extraction from message payload trees

use crate::types::MessagePayload;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

/// Walk a payload tree and produce its plain-text content.
///
/// Only `text/plain` leaves contribute; HTML and every other content kind
/// are ignored outright, so an HTML-only message yields the empty string.
/// Child texts are joined with single newlines, skipping children whose
/// text is whitespace. A childless payload decodes its own body, or yields
/// the empty string when it has none.
#[must_use]
pub fn extract_text(payload: &MessagePayload) -> String {
    if payload.parts.is_empty() {
        return payload.data().map(decode_base64url).unwrap_or_default();
    }

    let texts: Vec<String> = payload
        .parts
        .iter()
        .map(|part| {
            if part.is_plain_text() {
                part.data().map(decode_base64url).unwrap_or_default()
            } else if part.is_multipart() {
                extract_text(part)
            } else {
                String::new()
            }
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    texts.join("\n")
}

/// Decode unpadded URL-safe base64 into text.
///
/// The mailbox strips the padding, so the length is repaired first. Bytes
/// that are not valid UTF-8 are replaced rather than rejected, and corrupt
/// input yields the empty string; this function never fails.
#[must_use]
pub fn decode_base64url(data: &str) -> String {
    if data.is_empty() {
        return String::new();
    }

    let mut padded = data.to_owned();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    URL_SAFE.decode(padded).map_or_else(
        |_| String::new(),
        |bytes| String::from_utf8_lossy(&bytes).into_owned(),
    )
}
