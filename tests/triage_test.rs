use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use mail_triage::{
    Disposition, DraftMessage, FetchedMessage, Mailbox, MessageHeader, MessagePayload, Result,
    TextGenerator, TriageConfig, TriageError, run_triage,
};
use std::cell::RefCell;
use std::collections::VecDeque;

fn b64(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text)
}

fn plain_message(id: &str, from: &str, subject: &str, body: &str) -> FetchedMessage {
    FetchedMessage {
        id: id.to_owned(),
        thread_id: Some(format!("thread-{id}")),
        headers: vec![
            MessageHeader::new("From", from),
            MessageHeader::new("Subject", subject),
        ],
        payload: MessagePayload::leaf("text/plain", b64(body)),
    }
}

fn html_only_message(id: &str, subject: &str) -> FetchedMessage {
    FetchedMessage {
        id: id.to_owned(),
        thread_id: None,
        headers: vec![MessageHeader::new("Subject", subject)],
        payload: MessagePayload::multipart(
            "multipart/alternative",
            vec![MessagePayload::leaf("text/html", b64("<p>promo</p>"))],
        ),
    }
}

/// In-memory mailbox: serves canned messages, records created drafts
struct FakeMailbox {
    messages: Vec<FetchedMessage>,
    drafts: RefCell<Vec<DraftMessage>>,
}

impl FakeMailbox {
    fn new(messages: Vec<FetchedMessage>) -> Self {
        Self {
            messages,
            drafts: RefCell::new(Vec::new()),
        }
    }
}

impl Mailbox for FakeMailbox {
    fn list(&self, _query: &str, max_results: u32) -> Result<Vec<String>> {
        Ok(self
            .messages
            .iter()
            .take(max_results as usize)
            .map(|m| m.id.clone())
            .collect())
    }

    fn fetch(&self, id: &str) -> Result<FetchedMessage> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| TriageError::Mailbox(format!("no such message: {id}")))
    }

    fn create_draft(&self, draft: &DraftMessage) -> Result<String> {
        let mut drafts = self.drafts.borrow_mut();
        drafts.push(draft.clone());
        Ok(format!("draft-{}", drafts.len()))
    }
}

/// Hands out scripted responses in order; panics if called when the
/// script is exhausted
struct ScriptedGenerator {
    responses: RefCell<VecDeque<String>>,
}

impl ScriptedGenerator {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: RefCell::new(responses.iter().map(|r| (*r).to_owned()).collect()),
        }
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, _model: &str, _prompt: &str, _temperature: f32) -> Result<String> {
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .expect("generator called more times than scripted"))
    }
}

/// Proves the skip contract: classification must never be requested
struct UnreachableGenerator;

impl TextGenerator for UnreachableGenerator {
    fn generate(&self, _model: &str, _prompt: &str, _temperature: f32) -> Result<String> {
        panic!("generator must not be called for messages without text");
    }
}

#[test]
fn test_empty_body_never_reaches_generator() {
    let mailbox = FakeMailbox::new(vec![html_only_message("m1", "Big sale")]);

    let outcomes = run_triage(&mailbox, &UnreachableGenerator, &TriageConfig::default()).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].subject, "Big sale");
    assert!(matches!(outcomes[0].disposition, Disposition::Skipped));
    assert!(mailbox.drafts.borrow().is_empty());
}

#[test]
fn test_reply_drafted_for_action_required() {
    let mailbox = FakeMailbox::new(vec![plain_message(
        "m1",
        "boss@example.com",
        "Report needed",
        "Send the report today please.",
    )]);
    let generator = ScriptedGenerator::new(&[
        "{\"label\":\"action_required\",\"confidence\":0.8,\"reason\":\"direct request\"}",
    ]);

    let outcomes = run_triage(&mailbox, &generator, &TriageConfig::default()).unwrap();

    match &outcomes[0].disposition {
        Disposition::Classified { result, draft_id } => {
            assert_eq!(result.label, "action_required");
            assert_eq!(draft_id.as_deref(), Some("draft-1"));
        }
        other => panic!("expected Classified, got {other:?}"),
    }

    let drafts = mailbox.drafts.borrow();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].to, "boss@example.com");
    assert_eq!(drafts[0].subject, "Re: Report needed");
    assert_eq!(drafts[0].thread_id.as_deref(), Some("thread-m1"));
}

#[test]
fn test_informational_gets_no_draft() {
    let mailbox = FakeMailbox::new(vec![plain_message(
        "m1",
        "news@example.com",
        "Weekly digest",
        "Here is what happened this week.",
    )]);
    let generator = ScriptedGenerator::new(&[
        "{\"label\":\"informational\",\"confidence\":0.9,\"reason\":\"newsletter\"}",
    ]);

    let outcomes = run_triage(&mailbox, &generator, &TriageConfig::default()).unwrap();

    match &outcomes[0].disposition {
        Disposition::Classified { draft_id, .. } => assert!(draft_id.is_none()),
        other => panic!("expected Classified, got {other:?}"),
    }
    assert!(mailbox.drafts.borrow().is_empty());
}

#[test]
fn test_one_failure_does_not_abort_batch() {
    let mailbox = FakeMailbox::new(vec![
        plain_message("m1", "a@x", "One", "first body"),
        plain_message("m2", "b@x", "Two", "second body"),
        plain_message("m3", "c@x", "Three", "third body"),
    ]);
    let generator = ScriptedGenerator::new(&[
        "{\"label\":\"personal\",\"confidence\":0.6,\"reason\":\"friend\"}",
        "the model rambled and produced nothing structured",
        "{\"label\":\"spam\",\"confidence\":0.95,\"reason\":\"promo\"}",
    ]);

    let outcomes = run_triage(&mailbox, &generator, &TriageConfig::default()).unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0].disposition, Disposition::Classified { .. }));
    assert!(matches!(
        outcomes[1].disposition,
        Disposition::Failed(TriageError::ResultParse(_))
    ));
    assert!(matches!(outcomes[2].disposition, Disposition::Classified { .. }));
}

#[test]
fn test_max_results_bounds_the_run() {
    let mailbox = FakeMailbox::new(vec![
        plain_message("m1", "a@x", "One", "body one"),
        plain_message("m2", "b@x", "Two", "body two"),
        plain_message("m3", "c@x", "Three", "body three"),
    ]);
    let generator = ScriptedGenerator::new(&[
        "{\"label\":\"personal\",\"confidence\":0.5,\"reason\":\"chat\"}",
        "{\"label\":\"personal\",\"confidence\":0.5,\"reason\":\"chat\"}",
    ]);
    let config = TriageConfig {
        max_results: 2,
        ..TriageConfig::default()
    };

    let outcomes = run_triage(&mailbox, &generator, &config).unwrap();

    assert_eq!(outcomes.len(), 2);
}

#[test]
fn test_fetch_failure_recorded_per_message() {
    let mailbox = FakeMailbox::new(vec![plain_message("m1", "a@x", "One", "body")]);

    // List by hand with an id the mailbox cannot fetch.
    struct MissingMailbox(FakeMailbox);

    impl Mailbox for MissingMailbox {
        fn list(&self, _query: &str, _max_results: u32) -> Result<Vec<String>> {
            Ok(vec!["m1".to_owned(), "ghost".to_owned()])
        }
        fn fetch(&self, id: &str) -> Result<FetchedMessage> {
            self.0.fetch(id)
        }
        fn create_draft(&self, draft: &DraftMessage) -> Result<String> {
            self.0.create_draft(draft)
        }
    }

    let mailbox = MissingMailbox(mailbox);
    let generator = ScriptedGenerator::new(&[
        "{\"label\":\"informational\",\"confidence\":0.7,\"reason\":\"fyi\"}",
    ]);

    let outcomes = run_triage(&mailbox, &generator, &TriageConfig::default()).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0].disposition, Disposition::Classified { .. }));
    assert!(matches!(
        outcomes[1].disposition,
        Disposition::Failed(TriageError::Mailbox(_))
    ));
}

#[test]
fn test_draft_raw_encoding_round_trips() {
    let draft = DraftMessage {
        to: "boss@example.com".to_owned(),
        subject: "Re: Report needed".to_owned(),
        body: "On it.\n".to_owned(),
        thread_id: None,
    };

    let decoded = URL_SAFE.decode(draft.encode_raw()).unwrap();
    let decoded = String::from_utf8(decoded).unwrap();

    assert!(decoded.starts_with("To: boss@example.com\r\n"));
    assert!(decoded.contains("Subject: Re: Report needed\r\n"));
    assert!(decoded.contains("Content-Type: text/plain"));
    assert!(decoded.ends_with("\r\n\r\nOn it.\n"));
}
