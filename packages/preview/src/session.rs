//! # Preview Session
//!
//! Wires the source, scheduler, renderer and view coordinator together for one
//! user session. Every method is one discrete UI event and runs to completion;
//! callers serialize events (the server keeps the session behind a mutex).
//!
//! ```text
//! edit / replace ──► SourceBuffer::set ──► DebounceScheduler ──► SandboxRenderer
//!                                              ▲                      │
//!                          tick(now) / run() ──┘                 RenderFrame
//! ```

use crate::files::{Download, FilePicker, Upload};
use crate::generation::{GenerationControl, GenerationOutcome, GenerationRequest, GenerationTicket};
use crate::renderer::{RenderFrame, RenderTarget, SandboxRenderer};
use crate::scheduler::{Commit, DebounceScheduler, MutationOrigin, RefreshPolicy};
use crate::settings::PreviewSettings;
use crate::source::{SourceBuffer, SourceChange};
use crate::surface::{insert_indent, Selection};
use crate::view::{PaneLayout, ViewCoordinator, ViewMode};
use crate::PreviewError;
use serde::Serialize;
use std::fmt::Display;
use std::time::Instant;

/// Document every session starts with
pub const DEFAULT_DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Devbox</title>
  <style>
    body { font-family: system-ui, sans-serif; display: grid; place-items: center; min-height: 90vh; background: #f8fafc; }
    h1 { color: #4f46e5; }
    button { padding: 0.5rem 1rem; border: none; border-radius: 6px; background: #4f46e5; color: white; cursor: pointer; }
  </style>
</head>
<body>
  <main>
    <h1>Hello, world</h1>
    <p>Edit the code on the left to see changes here.</p>
    <button id="greet">Click me</button>
  </main>
  <script>
    document.getElementById('greet').addEventListener('click', () => alert('Hello from the sandbox!'));
  </script>
</body>
</html>
"#;

/// Serializable view of the session for hosts
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub source: String,
    pub revision: u64,
    pub layout: PaneLayout,
    pub policy: RefreshPolicy,
    pub pending_commit: bool,
    pub generation_enabled: bool,
    pub frame: Option<RenderFrame>,
}

#[derive(Debug)]
pub struct PreviewSession {
    settings: PreviewSettings,
    source: SourceBuffer,
    scheduler: DebounceScheduler,
    renderer: SandboxRenderer,
    view: ViewCoordinator,
    generation: GenerationControl,
    picker: FilePicker,
}

impl PreviewSession {
    /// Session seeded with [`DEFAULT_DOCUMENT`]
    pub fn new(settings: PreviewSettings) -> Self {
        Self::with_source(settings, DEFAULT_DOCUMENT)
    }

    /// Session seeded with `initial`. The seed is rendered right away so the
    /// preview is never blank at start.
    pub fn with_source(settings: PreviewSettings, initial: impl Into<String>) -> Self {
        let source = SourceBuffer::new(initial);
        let mut scheduler = DebounceScheduler::new(settings.policy, settings.quiescence_window);
        let mut renderer = SandboxRenderer::new();
        renderer.render(&scheduler.run(&source));

        Self {
            settings,
            source,
            scheduler,
            renderer,
            view: ViewCoordinator::new(settings.view_mode),
            generation: GenerationControl::default(),
            picker: FilePicker::default(),
        }
    }

    pub fn settings(&self) -> PreviewSettings {
        self.settings
    }

    pub fn source(&self) -> &str {
        self.source.value()
    }

    pub fn revision(&self) -> u64 {
        self.source.revision()
    }

    pub fn layout(&self) -> PaneLayout {
        self.view.layout()
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.renderer.last_frame()
    }

    pub fn file_picker(&self) -> &FilePicker {
        &self.picker
    }

    pub fn generation_enabled(&self) -> bool {
        self.generation.is_enabled()
    }

    /// Listen to every source mutation (editor mirrors, logs)
    pub fn on_source_change<F>(&mut self, listener: F)
    where
        F: FnMut(&SourceChange) + Send + 'static,
    {
        self.source.subscribe(listener);
    }

    pub fn attach_target(&mut self, target: Box<dyn RenderTarget>) -> Result<(), PreviewError> {
        self.renderer.attach(target)
    }

    /// Keystroke-level edit from the editable surface
    pub fn edit(&mut self, value: impl Into<String>, now: Instant) -> Option<RenderFrame> {
        self.mutate(value.into(), MutationOrigin::Edit, now)
    }

    /// Whole-document assignment (upload, generation, reload)
    pub fn replace(&mut self, value: impl Into<String>, now: Instant) -> Option<RenderFrame> {
        self.mutate(value.into(), MutationOrigin::Replace, now)
    }

    /// Tab key on the editable surface. Returns the new cursor position.
    pub fn press_tab(&mut self, selection: Selection, now: Instant) -> Result<usize, PreviewError> {
        let insertion = insert_indent(self.source.value(), selection)?;
        self.edit(insertion.value, now);
        Ok(insertion.cursor)
    }

    /// Explicit run signal: render the current source now, whatever the policy
    pub fn run(&mut self) -> Option<RenderFrame> {
        let commit = self.scheduler.run(&self.source);
        self.render(commit)
    }

    /// Advance time; fires the debounced commit when due
    pub fn tick(&mut self, now: Instant) -> Option<RenderFrame> {
        let commit = self.scheduler.poll(now)?;
        self.render(commit)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Switch refresh policy. Never commits by itself.
    pub fn set_policy(&mut self, policy: RefreshPolicy) {
        self.settings = self.settings.with_policy(policy);
        if self.scheduler.set_policy(policy) {
            tracing::info!(policy = policy.as_str(), "pending preview update dropped by policy switch");
        }
    }

    /// Switch view mode. Never mutates the source or forces a commit.
    pub fn select_view(&mut self, mode: ViewMode) -> PaneLayout {
        self.settings = self.settings.with_view_mode(mode);
        self.view.select(mode)
    }

    /// Load an uploaded file into the source, then reset the picker
    pub fn upload(&mut self, upload: Upload, now: Instant) -> Option<RenderFrame> {
        self.picker.select(&upload.file_name);
        tracing::info!(file = %upload.file_name, bytes = upload.bytes.len(), "file uploaded");

        let frame = self.replace(upload.text(), now);
        self.picker.reset();
        frame
    }

    pub fn download(&self) -> Download {
        Download::of(self.source.value())
    }

    /// Clear the source. Declining leaves everything untouched.
    pub fn clear(&mut self, confirmed: bool, now: Instant) -> bool {
        if !confirmed {
            return false;
        }
        self.replace(String::new(), now);
        true
    }

    /// Start a generation request with the current code as context
    pub fn begin_generation(&mut self, prompt: &str) -> Result<GenerationRequest, PreviewError> {
        let request = self.generation.begin(prompt, self.source.value())?;
        tracing::info!(ticket = request.ticket.0, "generation started");
        Ok(request)
    }

    /// Resolve a generation request. Failures leave the source untouched and
    /// re-enable the control.
    pub fn finish_generation<E: Display>(
        &mut self,
        ticket: GenerationTicket,
        result: Result<String, E>,
        now: Instant,
    ) -> Result<GenerationOutcome, PreviewError> {
        self.generation.finish(ticket)?;

        match result {
            Ok(code) => {
                tracing::info!(ticket = ticket.0, bytes = code.len(), "generation applied");
                let frame = self.replace(code, now);
                Ok(GenerationOutcome::Applied { frame })
            }
            Err(e) => {
                tracing::error!(ticket = ticket.0, error = %e, "generation failed");
                Ok(GenerationOutcome::Failed {
                    notice: format!("Code generation failed: {}", e),
                })
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            source: self.source.value().to_string(),
            revision: self.source.revision(),
            layout: self.view.layout(),
            policy: self.scheduler.policy(),
            pending_commit: self.scheduler.has_pending(),
            generation_enabled: self.generation.is_enabled(),
            frame: self.renderer.last_frame().cloned(),
        }
    }

    fn mutate(&mut self, value: String, origin: MutationOrigin, now: Instant) -> Option<RenderFrame> {
        let change = self.source.set(value);
        let commit = self.scheduler.on_mutation(&change, origin, now)?;
        self.render(commit)
    }

    fn render(&mut self, commit: Commit) -> Option<RenderFrame> {
        self.renderer.render(&commit)
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(PreviewSettings::default())
    }
}
