//! # Devbox Server
//!
//! Hosts the toolbox in a browser. The page is a thin shell: every edit is
//! posted here, the [`PreviewSession`] decides when to commit, and committed
//! frames are streamed back over Server-Sent Events into a sandboxed iframe.
//!
//! [`PreviewSession`]: devbox_preview::PreviewSession

pub mod driver;
pub mod errors;
pub mod events;
pub mod page;
pub mod routes;
pub mod state;
pub mod watch;

pub use driver::spawn_scheduler_driver;
pub use errors::ServerError;
pub use events::{BroadcastTarget, ServerEvent};
pub use routes::router;
pub use state::{AppState, ToolState};
pub use watch::spawn_file_watch;

use devbox_generate::CodeGenerator;
use devbox_preview::{PreviewSession, PreviewSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything needed to start a server
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub addr: SocketAddr,
    pub settings: PreviewSettings,
    /// File whose contents feed the source on every save
    pub watch: Option<PathBuf>,
}

/// Run the server until the listener fails
pub async fn serve(
    options: ServeOptions,
    generator: Arc<dyn CodeGenerator>,
) -> Result<(), ServerError> {
    let session = PreviewSession::new(options.settings);
    let state = AppState::new(session, generator)?;

    let _driver = spawn_scheduler_driver(state.clone());
    let _watch = match &options.watch {
        Some(path) => Some(spawn_file_watch(state.clone(), path.clone())?),
        None => None,
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(options.addr).await?;
    let local = listener.local_addr()?;

    tracing::info!(addr = %local, "devbox listening");
    axum::serve(listener, app).await?;

    Ok(())
}
