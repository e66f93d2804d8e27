//! Editable surface helpers.
//!
//! Positions are character offsets, not byte offsets, so a cursor after a
//! multi-byte character still lands where the user sees it.

use crate::PreviewError;

/// What the Tab key inserts
pub const TAB_INDENT: &str = "  ";

/// Cursor or selection in character offsets (`start == end` is a caret)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }
}

/// Text and cursor after an insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub value: String,
    pub cursor: usize,
}

/// Tab handling: replace the selection with [`TAB_INDENT`] and put the caret
/// right after it instead of moving focus.
pub fn insert_indent(text: &str, selection: Selection) -> Result<Insertion, PreviewError> {
    let len = text.chars().count();
    let Selection { start, end } = Selection::range(selection.start, selection.end);

    if end > len {
        return Err(PreviewError::SelectionOutOfRange { start, end, len });
    }

    let byte_start = byte_offset(text, start);
    let byte_end = byte_offset(text, end);

    let mut value = String::with_capacity(text.len() + TAB_INDENT.len());
    value.push_str(&text[..byte_start]);
    value.push_str(TAB_INDENT);
    value.push_str(&text[byte_end..]);

    Ok(Insertion {
        value,
        cursor: start + TAB_INDENT.chars().count(),
    })
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
