use crate::application_impl::TokenStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

pub struct RealSessionService {
    token_store: TokenStore,
    token_codec: Arc<dyn TokenCodec>,
    auth_gateway: Arc<dyn AuthGateway>,
    state_tx: watch::Sender<SessionState>,
    // Bumped by login and logout. A refresh that started under an older
    // value must not touch the store or the state.
    generation: Mutex<u64>,
}

impl RealSessionService {
    pub fn new(
        token_store: TokenStore,
        token_codec: Arc<dyn TokenCodec>,
        auth_gateway: Arc<dyn AuthGateway>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unknown);
        Self {
            token_store,
            token_codec,
            auth_gateway,
            state_tx,
            generation: Mutex::new(0),
        }
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Store writes for a transition must happen before this is called.
    fn publish(&self, state: SessionState) -> SessionState {
        match &state {
            SessionState::Authorized(claims) => info!(
                user = %claims.username,
                role = %claims.role,
                expires_at = %claims.expires_at,
                "session authorized"
            ),
            SessionState::Unauthorized => info!("session unauthorized"),
            SessionState::Unknown => debug!("session unknown"),
        }
        // Subscribers that went away simply miss the update.
        self.state_tx.send_replace(state.clone());
        state
    }

    fn fail_closed(&self, reason: &str, error: &dyn std::fmt::Display) -> SessionState {
        warn!(%error, "{}, signing out", reason);
        if let Err(e) = self.token_store.clear() {
            error!(error = %e, "failed to clear token store");
        }
        self.publish(SessionState::Unauthorized)
    }

    fn authorize(&self, access: &AccessToken) -> SessionState {
        match self.token_codec.decode(access) {
            Ok(claims) => self.publish(SessionState::Authorized(claims)),
            Err(e) => self.fail_closed("access token could not be decoded", &e),
        }
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    async fn bootstrap(&self) -> SessionState {
        let access = match self.token_store.access_token() {
            Ok(Some(access)) => access,
            Ok(None) => {
                debug!("no stored session");
                return self.publish(SessionState::Unauthorized);
            }
            Err(e) => return self.fail_closed("token store unreadable", &e),
        };

        let claims = match self.token_codec.decode(&access) {
            Ok(claims) => claims,
            Err(e) => return self.fail_closed("stored access token is corrupt", &e),
        };

        if claims.is_expired_at(Utc::now()) {
            info!(expired_at = %claims.expires_at, "stored access token expired");
            return self.refresh().await;
        }

        self.publish(SessionState::Authorized(claims))
    }

    async fn refresh(&self) -> SessionState {
        let started = *self.generation();
        let refresh = match self.token_store.read() {
            Ok(StoredCredentials {
                refresh: Some(refresh),
                ..
            }) => refresh,
            Ok(_) => return self.fail_closed("refresh requested", &"no refresh token stored"),
            Err(e) => return self.fail_closed("token store unreadable", &e),
        };

        let outcome = self.auth_gateway.refresh_access(&refresh).await;

        let generation = self.generation();
        if *generation != started {
            debug!("session changed while refreshing, discarding result");
            return self.state();
        }
        let access = match outcome {
            Ok(access) => access,
            Err(e) => return self.fail_closed("token refresh failed", &e),
        };

        if let Err(e) = self.token_store.save_access(&access) {
            return self.fail_closed("could not store refreshed token", &e);
        }
        self.authorize(&access)
    }

    fn login(&self, pair: CredentialPair) -> SessionState {
        let mut generation = self.generation();
        *generation += 1;
        if let Err(e) = self.token_store.save(&pair) {
            return self.fail_closed("could not store credentials", &e);
        }
        self.authorize(&pair.access)
    }

    fn logout(&self) {
        let mut generation = self.generation();
        *generation += 1;
        if let Err(e) = self.token_store.clear() {
            error!(error = %e, "failed to clear token store");
        }
        self.publish(SessionState::Unauthorized);
    }
}
