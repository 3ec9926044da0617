// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Mailbox Triage
//!
//! A library for triaging a mailbox with a local text-generation model:
//! extract the plain-text body of each recent message, classify its
//! intent and urgency, and save a draft reply when the label warrants one.
//!
//! # Features
//!
//! - Strongly-typed message payloads with tolerant base64url body decoding
//! - Reply-quote trimming before prompting, resistant to injected markers
//! - Streaming generation client that stops on the backend's `done` sentinel
//! - Tolerant recovery of a JSON classification record from free-form output
//! - Batch runner with per-message fault isolation
//!
//! # Example
//!
//! ```rust
//! use mail_triage::{MessagePayload, extract_text};
//!
//! let payload = MessagePayload::leaf("text/plain", "aGVsbG8");
//! assert_eq!(extract_text(&payload), "hello");
//! ```

mod classify;
mod error;
mod extract;
mod generate;
mod mailbox;
mod pipeline;
mod prompt;
mod types;

pub use classify::{CLASSIFY_TEMPERATURE, classify, parse_result};
pub use error::{Result, TriageError};
pub use extract::{decode_base64url, extract_text};
pub use generate::{DEFAULT_BASE_URL, OllamaClient, TextGenerator, collect_stream};
pub use mailbox::{DraftMessage, FetchedMessage, Mailbox};
pub use pipeline::{Disposition, MessageOutcome, TriageConfig, run_triage};
pub use prompt::{MAX_BODY_CHARS, build_prompt, trim_body};
pub use types::{
    ClassificationResult, EmailRecord, Label, MessageHeader, MessagePayload, PayloadBody,
    header_value,
};
