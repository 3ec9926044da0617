//! Streaming client for the text-generation backend

use crate::error::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::time::Duration;
use tracing::debug;

/// Default endpoint of a locally running backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A blocking text-generation backend
pub trait TextGenerator {
    /// Run one prompt to completion and return the full response text
    fn generate(&self, model: &str, prompt: &str, temperature: f32) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// One newline-delimited fragment of a streamed response
#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,

    #[serde(default)]
    done: bool,
}

/// Blocking client for an Ollama-style `/api/generate` endpoint
pub struct OllamaClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl OllamaClient {
    /// Build a client for the given base URL.
    ///
    /// The connect timeout is bounded; the read timeout is disabled because
    /// the backend streams fragments for as long as generation runs.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: true,
            options: GenerateOptions { temperature },
        };

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()?
            .error_for_status()?;

        debug!("streaming generation with model {model}");

        collect_stream(BufReader::new(response))
    }
}

/// Accumulate streamed `response` fragments until a chunk reports `done`.
///
/// Blank lines are skipped; a non-blank line that is not valid JSON is
/// fatal. Termination is driven by the `done` sentinel, not end of input:
/// the backend may keep the connection open after logically finishing, so
/// nothing past the sentinel is read. Fragments are concatenated in
/// arrival order and the result is whitespace-trimmed.
pub fn collect_stream(reader: impl BufRead) -> Result<String> {
    let mut accumulated = String::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let chunk: GenerateChunk =
            serde_json::from_str(&line).map_err(TriageError::StreamParse)?;

        if let Some(fragment) = chunk.response {
            accumulated.push_str(&fragment);
        }
        if chunk.done {
            break;
        }
    }

    Ok(accumulated.trim().to_owned())
}
