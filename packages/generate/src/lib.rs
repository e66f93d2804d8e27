//! # Devbox Generate
//!
//! Client for the AI code-generation endpoint.
//!
//! A request carries the user's prompt and the current code; the model is told
//! to answer with one raw HTML document. Whatever comes back is stripped of
//! markdown code fences before it reaches the editor.
//!
//! Requests are plain request/response: no retries, no timeout, no
//! cancellation. Gating (one request at a time) is the caller's job.

mod client;
mod config;
mod errors;
mod prompt;

pub use client::{CodeGenerator, GeminiClient};
pub use config::GenerationConfig;
pub use errors::GenerateError;
pub use prompt::{strip_code_fences, system_instruction};
