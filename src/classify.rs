//! Single-message classification pipeline

use crate::error::{Result, TriageError};
use crate::generate::TextGenerator;
use crate::prompt::build_prompt;
use crate::types::{ClassificationResult, EmailRecord};
use tracing::debug;

/// Sampling temperature for classification; kept low because this is
/// structured extraction, not creative generation
pub const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// Classify one message: build the prompt, run the streamed generation,
/// parse the output. Single attempt, no retry.
pub fn classify(
    generator: &impl TextGenerator,
    model: &str,
    record: &EmailRecord,
) -> Result<ClassificationResult> {
    debug!("classifying message {}", record.id);

    let prompt = build_prompt(record);
    let raw = generator.generate(model, &prompt, CLASSIFY_TEMPERATURE)?;

    parse_result(&raw)
}

/// Recover a classification record from free-form model output.
///
/// Models sometimes wrap the JSON in commentary, so after a failed
/// whole-string parse the slice between the first `{` and the last `}` is
/// tried once. Nothing further is attempted: truncated JSON, or two
/// separate objects in the same output, fail.
pub fn parse_result(raw: &str) -> Result<ClassificationResult> {
    match serde_json::from_str(raw) {
        Ok(result) => Ok(result),
        Err(err) => {
            if let Some(start) = raw.find('{')
                && let Some(end) = raw.rfind('}')
                && end > start
            {
                return serde_json::from_str(&raw[start..=end]).map_err(TriageError::ResultParse);
            }
            Err(TriageError::ResultParse(err))
        }
    }
}
