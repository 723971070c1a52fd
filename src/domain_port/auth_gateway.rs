use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The remote authentication endpoints.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    async fn obtain_pair(&self, input: &LoginInput) -> Result<CredentialPair, GatewayError>;
    async fn refresh_access(&self, refresh: &RefreshToken) -> Result<AccessToken, GatewayError>;
    async fn google_login(&self, input: &GoogleLoginInput)
    -> Result<CredentialPair, GatewayError>;
    async fn register(&self, input: &RegisterInput) -> Result<RegisteredAccount, GatewayError>;
}
