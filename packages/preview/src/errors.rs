//! Error types for the preview engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    #[error("Sandbox unavailable: {0}")]
    SandboxUnavailable(String),

    #[error("Render target rejected frame: {0}")]
    Target(String),

    #[error("Selection {start}..{end} is outside the text ({len} characters)")]
    SelectionOutOfRange { start: usize, end: usize, len: usize },

    #[error("A generation request is already in progress")]
    GenerationInFlight,

    #[error("Generation prompt is empty")]
    EmptyPrompt,

    #[error("Generation ticket {0} does not match the outstanding request")]
    StaleGeneration(u64),

    #[error("Unknown view mode: {0}")]
    UnknownViewMode(String),

    #[error("Unknown refresh policy: {0}")]
    UnknownPolicy(String),
}
