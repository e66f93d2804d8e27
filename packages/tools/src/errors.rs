use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
