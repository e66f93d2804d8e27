//! # JSON Formatter
//!
//! Parses the input and re-serializes it either indented by two spaces or
//! fully minified. Object keys keep their input order.

use crate::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Compact sample loaded by [`JsonFormatter::load_sample`]
pub const JSON_SAMPLE: &str = r#"{"project":"Developer Toolbox","version":1,"features":["HTML preview","JSON formatter"],"active":true,"metadata":{"created":"2024-05-20","author":"User"}}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    #[default]
    Pretty,
    Minified,
}

/// Format `input` in the requested style
pub fn format_json(input: &str, style: JsonStyle) -> Result<String, ToolError> {
    let value: Value = serde_json::from_str(input)?;

    let formatted = match style {
        JsonStyle::Pretty => serde_json::to_string_pretty(&value)?,
        JsonStyle::Minified => serde_json::to_string(&value)?,
    };

    Ok(formatted)
}

/// Formatter tool state: input, output and the inline error message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonFormatter {
    pub input: String,
    pub output: String,
    pub error: Option<String>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Format the current input.
    ///
    /// Blank input clears output and error. Invalid input sets the error and
    /// clears the output; it is never fatal.
    pub fn format(&mut self, style: JsonStyle) {
        if self.input.trim().is_empty() {
            self.output.clear();
            self.error = None;
            return;
        }

        match format_json(&self.input, style) {
            Ok(output) => {
                self.output = output;
                self.error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "json input rejected");
                self.output.clear();
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn load_sample(&mut self) {
        self.input = JSON_SAMPLE.to_string();
        self.output.clear();
        self.error = None;
    }

    /// Reset everything, but only after the user confirmed
    pub fn clear(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        *self = Self::default();
        true
    }

    /// Text to put on the clipboard, if there is any
    pub fn copy_output(&self) -> Option<&str> {
        if self.output.is_empty() {
            None
        } else {
            Some(&self.output)
        }
    }
}
