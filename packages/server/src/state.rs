use crate::events::{BroadcastTarget, ServerEvent};
use crate::ServerError;
use devbox_generate::CodeGenerator;
use devbox_preview::{PreviewSession, RenderFrame};
use devbox_tools::{JsonFormatter, MarkdownPreview};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::{broadcast, Notify};

const EVENT_CAPACITY: usize = 100;

/// Shared server state.
///
/// The session mutex is the event loop: each request handles one UI event to
/// completion while holding it. It is never held across an `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

/// Formatter and Markdown tool state
#[derive(Debug, Default)]
pub struct ToolState {
    pub json: JsonFormatter,
    pub markdown: MarkdownPreview,
}

struct Shared {
    session: Mutex<PreviewSession>,
    tools: Mutex<ToolState>,
    events: broadcast::Sender<ServerEvent>,
    wake: Notify,
    generator: Arc<dyn CodeGenerator>,
}

impl AppState {
    pub fn new(
        mut session: PreviewSession,
        generator: Arc<dyn CodeGenerator>,
    ) -> Result<Self, ServerError> {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);

        session.attach_target(Box::new(BroadcastTarget::new(events.clone())))?;

        let source_events = events.clone();
        session.on_source_change(move |change| {
            let _ = source_events.send(ServerEvent::source(change));
        });

        Ok(Self {
            inner: Arc::new(Shared {
                session: Mutex::new(session),
                tools: Mutex::new(ToolState::default()),
                events,
                wake: Notify::new(),
                generator,
            }),
        })
    }

    /// Handle one event against the session, then wake the scheduler driver
    /// in case the pending deadline moved.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut PreviewSession) -> R) -> R {
        let result = {
            let mut session = self.lock();
            f(&mut *session)
        };
        self.inner.wake.notify_one();
        result
    }

    /// Read-only access; does not wake the driver
    pub fn read_session<R>(&self, f: impl FnOnce(&PreviewSession) -> R) -> R {
        let session = self.lock();
        f(&*session)
    }

    /// Tool actions never touch the preview, so the driver is not woken
    pub fn with_tools<R>(&self, f: impl FnOnce(&mut ToolState) -> R) -> R {
        let mut tools = self
            .inner
            .tools
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut *tools)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock().next_deadline()
    }

    /// Fire a due commit, if any
    pub fn tick(&self, now: Instant) -> Option<RenderFrame> {
        self.lock().tick(now)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.inner.events.subscribe()
    }

    pub fn generator(&self) -> Arc<dyn CodeGenerator> {
        self.inner.generator.clone()
    }

    pub(crate) async fn woken(&self) {
        self.inner.wake.notified().await
    }

    fn lock(&self) -> MutexGuard<'_, PreviewSession> {
        // Handlers never leave the session half-updated, so poison is ignored
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
