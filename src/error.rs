//! Structured error types for the furigana engine.
//!
//! Layout itself never fails: malformed markup, overflowing spans, and
//! infeasible label placement all degrade gracefully. Errors only come from
//! the document surface (JSON in and out, embedded fonts).

use thiserror::Error;

/// The unified error type returned by the public document API.
#[derive(Debug, Error)]
pub enum FuriganaError {
    /// JSON input failed to parse as a valid document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// A font could not be decoded or parsed.
    #[error("Font error: {0}")]
    Font(String),
    /// The layout could not be written as JSON.
    #[error("Failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FuriganaError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FuriganaError::ParseError { source: e, hint }
    }
}
