use crate::domain_port::*;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server refused the credential. The session has already been
    /// dropped by the time the caller sees this.
    #[error("not authorized")]
    Unauthorized,
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        ApiError::Transport(error.0)
    }
}

/// Authenticated access to the remote API for everything outside the session core.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn call(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}
