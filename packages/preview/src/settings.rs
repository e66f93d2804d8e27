use crate::scheduler::{RefreshPolicy, QUIESCENCE_WINDOW};
use crate::view::ViewMode;
use std::time::Duration;

/// Immutable UI configuration handed down to the session.
///
/// Changing a setting produces a new value; the session swaps it in and
/// forwards the difference to the component that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    pub view_mode: ViewMode,
    pub policy: RefreshPolicy,
    pub quiescence_window: Duration,
}

impl PreviewSettings {
    pub fn with_view_mode(self, view_mode: ViewMode) -> Self {
        Self { view_mode, ..self }
    }

    pub fn with_policy(self, policy: RefreshPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn with_quiescence_window(self, quiescence_window: Duration) -> Self {
        Self {
            quiescence_window,
            ..self
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Split,
            policy: RefreshPolicy::Auto,
            quiescence_window: QUIESCENCE_WINDOW,
        }
    }
}
