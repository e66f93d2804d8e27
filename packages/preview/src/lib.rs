//! # Devbox Preview
//!
//! Live preview engine for the Devbox toolbox.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ surface: textarea edits, Tab indentation    │
//! └─────────────────────────────────────────────┘
//!                     ↓ set()
//! ┌─────────────────────────────────────────────┐
//! │ source: single source of truth + revision   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ scheduler: auto (debounced) / manual (run)  │
//! └─────────────────────────────────────────────┘
//!                     ↓ commit
//! ┌─────────────────────────────────────────────┐
//! │ renderer: sandboxed frame → render targets  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The [`ViewCoordinator`] sits beside the pipeline: it decides which panes
//! are visible and never touches the source or forces a commit.
//!
//! ## Core Principles
//!
//! 1. **Source is the single source of truth**: frames are derived views
//! 2. **Isolation, not filtering**: committed markup is never sanitized
//! 3. **Caller-supplied time**: the scheduler is a pure state machine, any
//!    event loop can drive it through `next_deadline()` / `tick()`
//!
//! ## Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use devbox_preview::{PreviewSession, PreviewSettings};
//!
//! let mut session = PreviewSession::new(PreviewSettings::default());
//! let start = Instant::now();
//!
//! session.edit("<h1>Hi</h1>", start);
//! assert!(session.tick(start + Duration::from_millis(100)).is_none());
//!
//! let frame = session.tick(start + Duration::from_millis(800)).unwrap();
//! assert_eq!(frame.document, "<h1>Hi</h1>");
//! ```

mod errors;
mod files;
mod generation;
mod renderer;
mod scheduler;
mod session;
mod settings;
mod source;
mod surface;
mod view;

pub use errors::PreviewError;
pub use files::{Download, FilePicker, Upload, DOWNLOAD_FILE_NAME, DOWNLOAD_MIME};
pub use generation::{GenerationControl, GenerationOutcome, GenerationRequest, GenerationTicket};
pub use renderer::{
    RenderFrame, RenderTarget, SandboxPermission, SandboxRenderer, PREVIEW_PERMISSIONS,
};
pub use scheduler::{
    Commit, CommitTrigger, DebounceScheduler, MutationOrigin, RefreshPolicy, QUIESCENCE_WINDOW,
};
pub use session::{PreviewSession, SessionSnapshot, DEFAULT_DOCUMENT};
pub use settings::PreviewSettings;
pub use source::{SourceBuffer, SourceChange};
pub use surface::{insert_indent, Insertion, Selection, TAB_INDENT};
pub use view::{PaneLayout, PaneState, ViewCoordinator, ViewMode};
