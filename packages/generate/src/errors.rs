use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("API key missing: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Endpoint returned no content")]
    EmptyResponse,
}
