//! Download/upload of the previewed document

use serde::{Deserialize, Serialize};

pub const DOWNLOAD_FILE_NAME: &str = "index.html";
pub const DOWNLOAD_MIME: &str = "text/html";

/// A file handed to the browser for saving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Serialize the source byte-for-byte
    pub fn of(source: &str) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            mime: DOWNLOAD_MIME.to_string(),
            bytes: source.as_bytes().to_vec(),
        }
    }
}

/// A user-selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Contents as text. Invalid UTF-8 sequences become U+FFFD, the same way a
    /// browser text reader decodes them.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// The file input control. Holds the last selection until reset so the same
/// file can be picked again afterwards.
#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    value: Option<String>,
}

impl FilePicker {
    pub fn select(&mut self, file_name: &str) {
        self.value = Some(file_name.to_string());
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
