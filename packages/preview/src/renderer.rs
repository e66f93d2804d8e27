//! # Sandbox Renderer
//!
//! Turns commits into [`RenderFrame`]s and mounts them on render targets.
//!
//! A frame is a complete document plus the fixed sandbox grant. Hosts embed it
//! as `<iframe sandbox=... srcdoc=...>`, so each frame materializes a fresh
//! isolated browsing context: script state from the previous frame is gone.
//!
//! The document is never sanitized. Safety comes from the isolation boundary,
//! so a target that cannot isolate is refused with
//! [`PreviewError::SandboxUnavailable`] instead of being fed filtered markup.

use crate::scheduler::{Commit, CommitTrigger};
use crate::PreviewError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capabilities granted to the sandboxed preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SandboxPermission {
    Scripts,
    Modals,
    Forms,
    Popups,
    SameOrigin,
}

impl SandboxPermission {
    /// Token used in the iframe `sandbox` attribute
    pub fn token(&self) -> &'static str {
        match self {
            SandboxPermission::Scripts => "allow-scripts",
            SandboxPermission::Modals => "allow-modals",
            SandboxPermission::Forms => "allow-forms",
            SandboxPermission::Popups => "allow-popups",
            SandboxPermission::SameOrigin => "allow-same-origin",
        }
    }
}

/// The fixed grant for every preview frame. Anything not listed (top-level
/// navigation, downloads, pointer lock, ...) stays denied.
pub const PREVIEW_PERMISSIONS: [SandboxPermission; 5] = [
    SandboxPermission::Scripts,
    SandboxPermission::Modals,
    SandboxPermission::Forms,
    SandboxPermission::Popups,
    SandboxPermission::SameOrigin,
];

/// One materialization of the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Strictly increasing per renderer; a new generation means a new context
    pub generation: u64,

    /// Source revision this frame was built from
    pub revision: u64,

    /// The committed document, verbatim
    pub document: String,

    /// Value of the iframe `sandbox` attribute
    pub sandbox: String,

    pub trigger: CommitTrigger,
}

impl RenderFrame {
    /// Document escaped for a double-quoted `srcdoc` attribute.
    ///
    /// This is attribute encoding, not sanitization: the browser decodes it
    /// back to the exact committed text.
    pub fn srcdoc(&self) -> String {
        escape_attribute(&self.document)
    }

    /// Full iframe element for hosts that render markup server-side
    pub fn to_iframe(&self, title: &str) -> String {
        format!(
            r#"<iframe title="{}" data-generation="{}" sandbox="{}" srcdoc="{}"></iframe>"#,
            escape_attribute(title),
            self.generation,
            self.sandbox,
            self.srcdoc()
        )
    }
}

/// Something that can host a sandboxed frame
pub trait RenderTarget: Send {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Whether the target provides a real isolated execution context
    fn is_isolated(&self) -> bool {
        true
    }

    /// Replace whatever the target shows with `frame`
    fn mount(&mut self, frame: &RenderFrame) -> Result<(), PreviewError>;
}

/// Builds frames and fans them out to targets
pub struct SandboxRenderer {
    targets: Vec<Box<dyn RenderTarget>>,
    generation: u64,
    last_frame: Option<RenderFrame>,
}

impl SandboxRenderer {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            generation: 0,
            last_frame: None,
        }
    }

    /// The `sandbox` attribute value for [`PREVIEW_PERMISSIONS`]
    pub fn sandbox_attribute() -> String {
        PREVIEW_PERMISSIONS
            .iter()
            .map(SandboxPermission::token)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Attach a target. The current frame, if any, is mounted right away.
    pub fn attach(&mut self, mut target: Box<dyn RenderTarget>) -> Result<(), PreviewError> {
        if !target.is_isolated() {
            return Err(PreviewError::SandboxUnavailable(format!(
                "render target '{}' cannot provide an isolated context",
                target.name()
            )));
        }

        if let Some(frame) = &self.last_frame {
            target.mount(frame)?;
        }

        tracing::debug!(target_name = target.name(), "render target attached");
        self.targets.push(target);
        Ok(())
    }

    /// Render a commit, replacing the previous frame wholesale.
    ///
    /// Returns `None` for a commit older than the frame already shown, so
    /// targets only ever observe increasing revisions. A failing target is
    /// logged and detached; it never fails the render.
    pub fn render(&mut self, commit: &Commit) -> Option<RenderFrame> {
        if let Some(last) = &self.last_frame {
            if commit.revision < last.revision {
                tracing::warn!(
                    revision = commit.revision,
                    shown = last.revision,
                    "dropping stale commit"
                );
                return None;
            }
        }

        self.generation += 1;
        let frame = RenderFrame {
            generation: self.generation,
            revision: commit.revision,
            document: commit.value.clone(),
            sandbox: Self::sandbox_attribute(),
            trigger: commit.trigger,
        };

        self.targets.retain_mut(|target| match target.mount(&frame) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(target_name = target.name(), error = %e, "detaching render target");
                false
            }
        });

        tracing::info!(
            generation = frame.generation,
            revision = frame.revision,
            bytes = frame.document.len(),
            "preview rendered"
        );

        self.last_frame = Some(frame.clone());
        Some(frame)
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl Default for SandboxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SandboxRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxRenderer")
            .field("generation", &self.generation)
            .field("targets", &self.targets.len())
            .finish()
    }
}

fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        frames: Arc<Mutex<Vec<RenderFrame>>>,
        isolated: bool,
        fail: bool,
    }

    impl RenderTarget for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn is_isolated(&self) -> bool {
            self.isolated
        }

        fn mount(&mut self, frame: &RenderFrame) -> Result<(), PreviewError> {
            if self.fail {
                return Err(PreviewError::Target("closed".to_string()));
            }
            self.frames.lock().unwrap().push(frame.clone());
            Ok(())
        }
    }

    fn commit(revision: u64, value: &str) -> Commit {
        Commit {
            revision,
            value: value.to_string(),
            trigger: CommitTrigger::Quiescence,
        }
    }

    #[test]
    fn test_sandbox_attribute_is_fixed_grant() {
        assert_eq!(
            SandboxRenderer::sandbox_attribute(),
            "allow-scripts allow-modals allow-forms allow-popups allow-same-origin"
        );
        assert!(!SandboxRenderer::sandbox_attribute().contains("allow-top-navigation"));
    }

    #[test]
    fn test_render_passes_markup_through_unfiltered() {
        let mut renderer = SandboxRenderer::new();
        let script = "<script>alert(document.cookie)</script><div><b>broken";
        let frame = renderer.render(&commit(1, script)).unwrap();

        assert_eq!(frame.document, script);
        assert_eq!(frame.generation, 1);
    }

    #[test]
    fn test_each_render_is_a_new_generation() {
        let mut renderer = SandboxRenderer::new();
        let a = renderer.render(&commit(1, "a")).unwrap();
        let b = renderer.render(&commit(1, "a")).unwrap();
        assert!(b.generation > a.generation);
    }

    #[test]
    fn test_stale_commit_is_dropped() {
        let mut renderer = SandboxRenderer::new();
        renderer.render(&commit(5, "new"));
        assert!(renderer.render(&commit(3, "old")).is_none());
        assert_eq!(renderer.last_frame().unwrap().document, "new");
    }

    #[test]
    fn test_non_isolated_target_refused() {
        let mut renderer = SandboxRenderer::new();
        let result = renderer.attach(Box::new(Recorder {
            frames: Arc::default(),
            isolated: false,
            fail: false,
        }));
        assert!(matches!(result, Err(PreviewError::SandboxUnavailable(_))));
        assert_eq!(renderer.target_count(), 0);
    }

    #[test]
    fn test_failing_target_is_detached_not_fatal() {
        let mut renderer = SandboxRenderer::new();
        let frames = Arc::new(Mutex::new(Vec::new()));
        renderer
            .attach(Box::new(Recorder { frames: frames.clone(), isolated: true, fail: false }))
            .unwrap();
        renderer
            .attach(Box::new(Recorder { frames: Arc::default(), isolated: true, fail: true }))
            .unwrap();

        assert!(renderer.render(&commit(1, "<p>x</p>")).is_some());
        assert_eq!(renderer.target_count(), 1);
        assert_eq!(frames.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_late_target_receives_current_frame() {
        let mut renderer = SandboxRenderer::new();
        renderer.render(&commit(1, "<p>now</p>"));

        let frames = Arc::new(Mutex::new(Vec::new()));
        renderer
            .attach(Box::new(Recorder { frames: frames.clone(), isolated: true, fail: false }))
            .unwrap();
        assert_eq!(frames.lock().unwrap()[0].document, "<p>now</p>");
    }

    #[test]
    fn test_iframe_markup_escapes_srcdoc() {
        let mut renderer = SandboxRenderer::new();
        let frame = renderer.render(&commit(1, r#"<a href="x">&</a>"#)).unwrap();
        let iframe = frame.to_iframe("Live Preview");

        assert!(iframe.contains(r#"srcdoc="&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;""#));
        assert!(iframe.contains(r#"sandbox="allow-scripts allow-modals"#));
    }
}
