//! Core types for mailbox triage

use crate::extract::extract_text;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of a message body tree, in the mailbox provider's wire shape.
///
/// A leaf carries at most one body blob; a `multipart/*` container carries
/// an ordered sequence of child parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    /// Declared content kind, e.g. `text/plain` or `multipart/alternative`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Body of a leaf part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PayloadBody>,

    /// Child parts of a multipart container, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<MessagePayload>,
}

impl MessagePayload {
    /// Build a leaf part from a content kind and encoded body data
    #[must_use]
    pub fn leaf(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            body: Some(PayloadBody {
                data: Some(data.into()),
            }),
            parts: Vec::new(),
        }
    }

    /// Build a multipart container from child parts
    #[must_use]
    pub fn multipart(mime_type: impl Into<String>, parts: Vec<Self>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            body: None,
            parts,
        }
    }

    /// Whether the declared content kind is a multipart container
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("multipart/"))
    }

    /// Whether the declared content kind is exactly `text/plain`
    #[must_use]
    pub fn is_plain_text(&self) -> bool {
        self.mime_type.as_deref() == Some("text/plain")
    }

    /// Encoded body data, if this part carries any
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.data.as_deref())
    }
}

/// Body blob of a leaf part: unpadded URL-safe base64 data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadBody {
    /// Encoded content, absent for container parts and stub attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A single message header in the provider's wire shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

impl MessageHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Look up a header value by name, case-insensitively
#[must_use]
pub fn header_value<'a>(headers: &'a [MessageHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// A fetched message reduced to the fields the pipeline consumes.
///
/// Header fields default to the empty string when the message lacks them.
/// `text` holds the extracted plain-text body; empty means there is
/// nothing to classify and the message must be skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub text: String,
}

impl EmailRecord {
    /// Assemble a record from wire headers and a payload tree
    #[must_use]
    pub fn from_parts(
        id: impl Into<String>,
        headers: &[MessageHeader],
        payload: &MessagePayload,
    ) -> Self {
        let header = |name| header_value(headers, name).unwrap_or_default().to_string();

        Self {
            id: id.into(),
            subject: header("Subject"),
            from: header("From"),
            to: header("To"),
            date: header("Date"),
            text: extract_text(payload).trim().to_string(),
        }
    }

    /// `true` when there is no plain-text body to classify
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Classification outcome category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Urgent,
    ActionRequired,
    Informational,
    Spam,
    Personal,
}

impl Label {
    /// All permitted labels, in prompt order
    pub const ALL: [Self; 5] = [
        Self::Urgent,
        Self::ActionRequired,
        Self::Informational,
        Self::Spam,
        Self::Personal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::ActionRequired => "action_required",
            Self::Informational => "informational",
            Self::Spam => "spam",
            Self::Personal => "personal",
        }
    }

    /// Resolve a raw label string against the known set
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == s)
    }

    /// Labels worth saving a draft reply for
    #[must_use]
    pub const fn needs_reply(self) -> bool {
        matches!(self, Self::Urgent | Self::ActionRequired)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured verdict recovered from model output.
///
/// Fields are kept exactly as the model produced them: an unknown label or
/// an out-of-range confidence still parses. Resolving the label and
/// range-checking are the caller's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Raw label string as emitted by the model
    #[serde(default)]
    pub label: String,

    /// Model confidence, nominally in `[0.0, 1.0]`
    #[serde(default)]
    pub confidence: f64,

    /// Short free-text justification
    #[serde(default)]
    pub reason: String,
}

impl ClassificationResult {
    /// Resolve the raw label, `None` when the model invented one
    #[must_use]
    pub fn known_label(&self) -> Option<Label> {
        Label::parse(&self.label)
    }

    /// Whether the record satisfies the advertised contract
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.known_label().is_some() && (0.0..=1.0).contains(&self.confidence)
    }
}
