//! # Generation Control
//!
//! Gate around the external code-generation call. Only one request may be
//! outstanding; the control stays disabled until it resolves either way.
//! In-flight requests are never cancelled.

use crate::renderer::RenderFrame;
use crate::PreviewError;
use serde::{Deserialize, Serialize};

/// Identifies one outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationTicket(pub u64);

/// Everything the generator needs, captured when the request starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ticket: GenerationTicket,
    pub prompt: String,
    pub current_code: String,
}

/// What happened to the source when a request resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Source replaced; carries the frame if the replacement committed at once
    Applied { frame: Option<RenderFrame> },

    /// Source untouched; `notice` is shown to the user
    Failed { notice: String },
}

#[derive(Debug, Clone, Default)]
pub struct GenerationControl {
    outstanding: Option<GenerationTicket>,
    issued: u64,
}

impl GenerationControl {
    /// Whether a new request may be started
    pub fn is_enabled(&self) -> bool {
        self.outstanding.is_none()
    }

    pub fn begin(&mut self, prompt: &str, current_code: &str) -> Result<GenerationRequest, PreviewError> {
        if self.outstanding.is_some() {
            return Err(PreviewError::GenerationInFlight);
        }
        if prompt.trim().is_empty() {
            return Err(PreviewError::EmptyPrompt);
        }

        self.issued += 1;
        let ticket = GenerationTicket(self.issued);
        self.outstanding = Some(ticket);

        Ok(GenerationRequest {
            ticket,
            prompt: prompt.to_string(),
            current_code: current_code.to_string(),
        })
    }

    /// Release the gate for `ticket`
    pub fn finish(&mut self, ticket: GenerationTicket) -> Result<(), PreviewError> {
        match self.outstanding {
            Some(current) if current == ticket => {
                self.outstanding = None;
                Ok(())
            }
            _ => Err(PreviewError::StaleGeneration(ticket.0)),
        }
    }
}
