use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an `{error}` body.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Local storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Corrupt local data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Refused(String),
}

impl ClientError {
    pub fn is_username_taken(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status: 400, message } if message == "Username already exists"
        )
    }
}
