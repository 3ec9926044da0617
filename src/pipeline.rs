//! Batch triage over a mailbox

use crate::classify::classify;
use crate::error::{Result, TriageError};
use crate::generate::TextGenerator;
use crate::mailbox::{DraftMessage, Mailbox};
use crate::types::{ClassificationResult, EmailRecord, Label};
use tracing::debug;

const DEFAULT_QUERY: &str = "newer_than:7d";
const DEFAULT_MAX_RESULTS: u32 = 5;

const DEFAULT_REPLY_BODY: &str = "Hi,\n\n\
Thanks for your email — I’ve seen this and I’m on it.\n\
Quick clarifying question: what’s your ideal deadline?\n\n\
Best,\n";

/// Configuration for one triage run
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Generation model name
    pub model: String,

    /// Mailbox search query
    pub query: String,

    /// Upper bound on messages per run
    pub max_results: u32,

    /// Plain-text body used when drafting replies
    pub reply_body: String,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            model: "phi3".to_owned(),
            query: DEFAULT_QUERY.to_owned(),
            max_results: DEFAULT_MAX_RESULTS,
            reply_body: DEFAULT_REPLY_BODY.to_owned(),
        }
    }
}

/// How a single message fared during a run
#[derive(Debug)]
pub enum Disposition {
    /// No plain-text body; the generator was never invoked
    Skipped,

    /// Classified; the draft id is present when a reply was saved
    Classified {
        result: ClassificationResult,
        draft_id: Option<String>,
    },

    /// This message failed; the rest of the batch is unaffected
    Failed(TriageError),
}

/// Outcome for one listed message id
#[derive(Debug)]
pub struct MessageOutcome {
    pub id: String,
    pub subject: String,
    pub disposition: Disposition,
}

/// Run one triage pass: list matching messages, classify each one, and
/// save a draft reply where the label warrants it.
///
/// Failures are per-message: one message erroring is recorded in its
/// outcome and never aborts the siblings. Outcomes come back in list
/// order. The listing call itself is the only whole-batch failure mode.
pub fn run_triage(
    mailbox: &impl Mailbox,
    generator: &impl TextGenerator,
    config: &TriageConfig,
) -> Result<Vec<MessageOutcome>> {
    let ids = mailbox.list(&config.query, config.max_results)?;
    debug!("triaging {} messages for query {}", ids.len(), config.query);

    Ok(ids
        .iter()
        .map(|id| triage_one(mailbox, generator, config, id))
        .collect())
}

fn triage_one(
    mailbox: &impl Mailbox,
    generator: &impl TextGenerator,
    config: &TriageConfig,
    id: &str,
) -> MessageOutcome {
    let fetched = match mailbox.fetch(id) {
        Ok(fetched) => fetched,
        Err(err) => {
            return MessageOutcome {
                id: id.to_owned(),
                subject: String::new(),
                disposition: Disposition::Failed(err),
            };
        }
    };

    let record = EmailRecord::from_parts(id, &fetched.headers, &fetched.payload);

    if record.is_empty() {
        debug!("skipping {id}: no plain-text body");
        return MessageOutcome {
            id: record.id,
            subject: record.subject,
            disposition: Disposition::Skipped,
        };
    }

    let result = match classify(generator, &config.model, &record) {
        Ok(result) => result,
        Err(err) => {
            return MessageOutcome {
                id: record.id,
                subject: record.subject,
                disposition: Disposition::Failed(err),
            };
        }
    };

    let draft_id = if result.known_label().is_some_and(Label::needs_reply) {
        let draft = DraftMessage {
            to: record.from.clone(),
            subject: format!("Re: {}", record.subject).trim().to_owned(),
            body: config.reply_body.clone(),
            thread_id: fetched.thread_id.clone(),
        };

        match mailbox.create_draft(&draft) {
            Ok(draft_id) => Some(draft_id),
            Err(err) => {
                return MessageOutcome {
                    id: record.id,
                    subject: record.subject,
                    disposition: Disposition::Failed(err),
                };
            }
        }
    } else {
        None
    };

    MessageOutcome {
        id: record.id,
        subject: record.subject,
        disposition: Disposition::Classified { result, draft_id },
    }
}
