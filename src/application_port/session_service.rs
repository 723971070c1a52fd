use crate::domain_model::*;
use tokio::sync::watch;

/// The process-wide session. Constructed once and shared by `Arc`.
///
/// None of the lifecycle operations return errors: every failure inside them
/// settles the session to `Unauthorized` with an empty token store.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    fn state(&self) -> SessionState;
    fn subscribe(&self) -> watch::Receiver<SessionState>;

    /// Recovers the session from the token store at start-up.
    async fn bootstrap(&self) -> SessionState;
    /// Trades the stored refresh token for a new access token. Never retried.
    async fn refresh(&self) -> SessionState;
    fn login(&self, pair: CredentialPair) -> SessionState;
    fn logout(&self);
}
