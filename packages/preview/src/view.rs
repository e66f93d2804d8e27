//! # View Coordinator
//!
//! Three layouts, switched only by explicit selection:
//!
//! ```text
//! SPLIT    [ editor | preview ]
//! CODE     [ editor ]            preview mounted, hidden
//! PREVIEW  [ preview ]           editor mounted, hidden
//! ```
//!
//! Both panes stay mounted in every mode so switching never rebuilds the
//! sandbox or touches the source.

use crate::PreviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewMode {
    #[default]
    Split,
    Code,
    Preview,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Split, ViewMode::Code, ViewMode::Preview];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Split => "SPLIT",
            ViewMode::Code => "CODE",
            ViewMode::Preview => "PREVIEW",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPLIT" => Ok(ViewMode::Split),
            "CODE" => Ok(ViewMode::Code),
            "PREVIEW" => Ok(ViewMode::Preview),
            _ => Err(PreviewError::UnknownViewMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneState {
    Visible,
    /// Mounted and kept in sync, but not shown
    Hidden,
}

impl PaneState {
    pub fn is_visible(&self) -> bool {
        matches!(self, PaneState::Visible)
    }
}

/// Pane visibility for one view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneLayout {
    pub mode: ViewMode,
    pub editor: PaneState,
    pub preview: PaneState,
}

impl PaneLayout {
    pub fn for_mode(mode: ViewMode) -> Self {
        let (editor, preview) = match mode {
            ViewMode::Split => (PaneState::Visible, PaneState::Visible),
            ViewMode::Code => (PaneState::Visible, PaneState::Hidden),
            ViewMode::Preview => (PaneState::Hidden, PaneState::Visible),
        };

        Self {
            mode,
            editor,
            preview,
        }
    }
}

/// Holds the selected view mode
#[derive(Debug, Clone, Default)]
pub struct ViewCoordinator {
    mode: ViewMode,
}

impl ViewCoordinator {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn layout(&self) -> PaneLayout {
        PaneLayout::for_mode(self.mode)
    }

    /// Switch to `mode`. Selecting the current mode is a no-op.
    pub fn select(&mut self, mode: ViewMode) -> PaneLayout {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "view mode selected");
            self.mode = mode;
        }
        self.layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_is_split() {
        let coordinator = ViewCoordinator::default();
        let layout = coordinator.layout();
        assert_eq!(layout.mode, ViewMode::Split);
        assert!(layout.editor.is_visible());
        assert!(layout.preview.is_visible());
    }

    #[test]
    fn test_layouts() {
        let code = PaneLayout::for_mode(ViewMode::Code);
        assert_eq!(code.editor, PaneState::Visible);
        assert_eq!(code.preview, PaneState::Hidden);

        let preview = PaneLayout::for_mode(ViewMode::Preview);
        assert_eq!(preview.editor, PaneState::Hidden);
        assert_eq!(preview.preview, PaneState::Visible);
    }

    #[test]
    fn test_every_mode_reachable_from_every_mode() {
        for from in ViewMode::ALL {
            for to in ViewMode::ALL {
                let mut coordinator = ViewCoordinator::new(from);
                assert_eq!(coordinator.select(to).mode, to);
            }
        }
    }

    #[test]
    fn test_parse_and_serialize() {
        assert_eq!("preview".parse::<ViewMode>().unwrap(), ViewMode::Preview);
        assert!("grid".parse::<ViewMode>().is_err());
        assert_eq!(serde_json::to_string(&ViewMode::Code).unwrap(), "\"CODE\"");
    }
}
