use crate::domain_model::*;
use crate::domain_port::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("issued token was not usable")]
    SessionNotEstablished,
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<GatewayError> for AccountError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected { status: 401, .. } => AccountError::InvalidCredentials,
            GatewayError::Rejected { status, body } => AccountError::Rejected { status, body },
            GatewayError::Transport(e) => AccountError::Transport(e),
            GatewayError::InvalidResponse(e) => AccountError::InternalError(e),
        }
    }
}

/// The two places where a user changes session explicitly, plus sign-up.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Returns the view the user should land on.
    async fn sign_in(&self, input: LoginInput) -> Result<Route, AccountError>;
    async fn sign_in_with_google(&self, input: GoogleLoginInput) -> Result<Route, AccountError>;
    async fn register(&self, input: RegisterInput) -> Result<RegisteredAccount, AccountError>;
    fn sign_out(&self) -> Route;
}
