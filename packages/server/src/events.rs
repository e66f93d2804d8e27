//! Events pushed to connected browsers

use devbox_preview::{CommitTrigger, PreviewError, RenderFrame, RenderTarget, SourceChange};
use serde::Serialize;
use tokio::sync::broadcast;

const PREVIEW_TITLE: &str = "Live Preview";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A committed frame; the page recreates its sandboxed iframe from it
    #[serde(rename_all = "camelCase")]
    Frame {
        generation: u64,
        revision: u64,
        document: String,
        sandbox: String,
        trigger: CommitTrigger,
        /// Ready-to-mount `<iframe>` with the document escaped into `srcdoc`
        iframe: String,
        timestamp: i64,
    },

    /// The source changed outside the page's own editor (upload, reload, generation)
    #[serde(rename_all = "camelCase")]
    Source {
        revision: u64,
        value: String,
        timestamp: i64,
    },
}

impl ServerEvent {
    pub fn frame(frame: &RenderFrame) -> Self {
        ServerEvent::Frame {
            generation: frame.generation,
            revision: frame.revision,
            document: frame.document.clone(),
            sandbox: frame.sandbox.clone(),
            trigger: frame.trigger,
            iframe: frame.to_iframe(PREVIEW_TITLE),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn source(change: &SourceChange) -> Self {
        ServerEvent::Source {
            revision: change.revision,
            value: change.value.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Frame { .. } => "frame",
            ServerEvent::Source { .. } => "source",
        }
    }
}

/// Render target that fans frames out to every SSE subscriber.
///
/// Isolation is provided by the iframe sandbox on the page, which applies the
/// frame's `sandbox` grant.
pub struct BroadcastTarget {
    tx: broadcast::Sender<ServerEvent>,
}

impl BroadcastTarget {
    pub fn new(tx: broadcast::Sender<ServerEvent>) -> Self {
        Self { tx }
    }
}

impl RenderTarget for BroadcastTarget {
    fn name(&self) -> &str {
        "sse-broadcast"
    }

    fn mount(&mut self, frame: &RenderFrame) -> Result<(), PreviewError> {
        // No subscribers is fine: the next page load starts from the last frame
        let _ = self.tx.send(ServerEvent::frame(frame));
        Ok(())
    }
}
