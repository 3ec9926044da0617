//! Mailbox collaborator interface and draft wire encoding

use crate::error::Result;
use crate::types::{MessageHeader, MessagePayload};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};

/// A fetched message, still in wire form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedMessage {
    pub id: String,

    /// Conversation the message belongs to, when the provider threads mail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    #[serde(default)]
    pub headers: Vec<MessageHeader>,

    #[serde(default)]
    pub payload: MessagePayload,
}

/// An unsent reply to be saved on the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftMessage {
    pub to: String,
    pub subject: String,
    pub body: String,

    /// Thread to attach the draft to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl DraftMessage {
    /// Render the draft as an RFC 2822-style text/plain message
    #[must_use]
    pub fn to_rfc822(&self) -> String {
        format!(
            "To: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=\"utf-8\"\r\n\r\n{}",
            self.to, self.subject, self.body,
        )
    }

    /// Encode the rendered message for the provider's raw-draft field
    /// (padded URL-safe base64)
    #[must_use]
    pub fn encode_raw(&self) -> String {
        URL_SAFE.encode(self.to_rfc822())
    }
}

/// External mailbox provider.
///
/// Implementations own transport, authentication, and retries; the
/// pipeline only depends on these three operations.
pub trait Mailbox {
    /// Message ids matching `query`, at most `max_results` of them
    fn list(&self, query: &str, max_results: u32) -> Result<Vec<String>>;

    /// The full message for one id
    fn fetch(&self, id: &str) -> Result<FetchedMessage>;

    /// Save a draft, returning the provider's draft id
    fn create_draft(&self, draft: &DraftMessage) -> Result<String>;
}
