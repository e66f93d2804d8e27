//! # Source Buffer
//!
//! Holds the text being edited. Every mutation goes through [`SourceBuffer::set`],
//! which bumps the revision and notifies listeners synchronously.

use std::fmt;

/// Notification emitted for every `set`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChange {
    /// Revision after the change (starts at 0 for the seed value)
    pub revision: u64,

    /// Full new value
    pub value: String,
}

type Listener = Box<dyn FnMut(&SourceChange) + Send>;

/// The single source of truth for the previewed document
pub struct SourceBuffer {
    value: String,
    revision: u64,
    listeners: Vec<Listener>,
}

impl SourceBuffer {
    /// Create a buffer seeded with `initial` at revision 0
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: initial.into(),
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Replace the value unconditionally.
    ///
    /// No validation: malformed markup is stored verbatim. Setting the same
    /// value again still counts as a mutation.
    pub fn set(&mut self, value: impl Into<String>) -> SourceChange {
        self.value = value.into();
        self.revision += 1;

        let change = SourceChange {
            revision: self.revision,
            value: self.value.clone(),
        };

        for listener in self.listeners.iter_mut() {
            listener(&change);
        }

        change
    }

    /// Register a listener called after every `set`
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SourceChange) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for SourceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceBuffer")
            .field("revision", &self.revision)
            .field("len", &self.value.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
