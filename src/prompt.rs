//! Prompt assembly with reply-quote trimming

use crate::types::EmailRecord;

/// Hard cap on body characters forwarded to the model
pub const MAX_BODY_CHARS: usize = 1500;

/// Quoted-reply markers, checked in this order
const CUT_MARKERS: [&str; 4] = ["\nOn ", "\nFrom:", "\n-----Original Message-----", "\n> "];

/// A marker at or before this character offset is part of the body, not a
/// quoted reply, and must not truncate anything
const MARKER_FLOOR: usize = 200;

const SYSTEM_RULES: &str = "\
You are an email classifier.
Return ONLY valid JSON with keys:
- label: one of [\"urgent\",\"action_required\",\"informational\",\"spam\",\"personal\"]
- confidence: number from 0.0 to 1.0
- reason: short string (max 20 words)
No extra text.";

/// Cut quoted-reply noise and cap the body length.
///
/// Markers are tried in a fixed order; the first one whose earliest
/// occurrence lies strictly after character offset 200 truncates the text
/// there and ends the scan. A marker that first occurs at or before the
/// floor never truncates, even if it also appears later. The result is
/// whitespace-trimmed and capped at `max_chars` characters.
#[must_use]
pub fn trim_body(text: &str, max_chars: usize) -> String {
    let mut body = text;

    for marker in CUT_MARKERS {
        if let Some(idx) = body.find(marker)
            && body[..idx].chars().count() > MARKER_FLOOR
        {
            body = &body[..idx];
            break;
        }
    }

    body.trim().chars().take(max_chars).collect()
}

/// Assemble the classification prompt for one message
#[must_use]
pub fn build_prompt(record: &EmailRecord) -> String {
    format!(
        "{SYSTEM_RULES}\n\nEmail:\nFrom: {}\nSubject: {}\nBody:\n{}\n",
        record.from,
        record.subject,
        trim_body(&record.text, MAX_BODY_CHARS),
    )
}
