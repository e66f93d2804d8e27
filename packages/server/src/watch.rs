//! Feed the source from a file on disk.
//!
//! The file is read once at start, then every modification replaces the
//! source, exactly like an upload would. The parent directory is watched
//! rather than the file so saves that write a new file and rename it over the
//! old one are still seen.

use crate::{AppState, ServerError};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::JoinHandle;

pub fn spawn_file_watch(state: AppState, path: PathBuf) -> Result<JoinHandle<()>, ServerError> {
    let initial = std::fs::read_to_string(&path)?;
    state.with_session(|session| session.replace(initial, Instant::now()));

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default(),
    )?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    tracing::info!(path = %path.display(), "watching source file");

    Ok(tokio::spawn(async move {
        // The watcher stops when dropped
        let _watcher = watcher;

        while let Some(event) = rx.recv().await {
            if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                continue;
            }
            if !event.paths.iter().any(|p| same_file_name(p, &path)) {
                continue;
            }

            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => {
                    let changed = state.with_session(|session| {
                        if session.source() == contents {
                            return false;
                        }
                        session.replace(contents, Instant::now());
                        true
                    });
                    if changed {
                        tracing::info!(path = %path.display(), "source reloaded from file");
                    }
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to read watched file"),
            }
        }
    }))
}

fn same_file_name(candidate: &Path, watched: &Path) -> bool {
    candidate.file_name().is_some() && candidate.file_name() == watched.file_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_file_name() {
        let watched = Path::new("site/index.html");
        assert!(same_file_name(Path::new("/abs/site/index.html"), watched));
        assert!(!same_file_name(Path::new("/abs/site/.index.html.swp"), watched));
        assert!(!same_file_name(Path::new("/"), watched));
    }
}
