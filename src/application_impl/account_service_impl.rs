use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealAccountService {
    auth_gateway: Arc<dyn AuthGateway>,
    session_service: Arc<dyn SessionService>,
    navigator: Arc<dyn Navigator>,
}

impl RealAccountService {
    pub fn new(
        auth_gateway: Arc<dyn AuthGateway>,
        session_service: Arc<dyn SessionService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            auth_gateway,
            session_service,
            navigator,
        }
    }

    fn establish(&self, pair: CredentialPair) -> Result<Route, AccountError> {
        match self.session_service.login(pair) {
            SessionState::Authorized(claims) => {
                let landing = Route::landing_for(claims.role);
                self.navigator.navigate(landing);
                Ok(landing)
            }
            _ => Err(AccountError::SessionNotEstablished),
        }
    }
}

#[async_trait::async_trait]
impl AccountService for RealAccountService {
    async fn sign_in(&self, input: LoginInput) -> Result<Route, AccountError> {
        let pair = self.auth_gateway.obtain_pair(&input).await.map_err(|e| {
            warn!(username = %input.username, error = %e, "sign-in failed");
            AccountError::from(e)
        })?;
        self.establish(pair)
    }

    async fn sign_in_with_google(&self, input: GoogleLoginInput) -> Result<Route, AccountError> {
        let pair = self.auth_gateway.google_login(&input).await.map_err(|e| {
            warn!(error = %e, "google sign-in failed");
            AccountError::from(e)
        })?;
        self.establish(pair)
    }

    async fn register(&self, input: RegisterInput) -> Result<RegisteredAccount, AccountError> {
        // Signing up always starts from a signed-out client.
        self.session_service.logout();

        let account = self.auth_gateway.register(&input).await.map_err(|e| {
            warn!(username = %input.username, error = %e, "registration failed");
            match e {
                // Registration is anonymous, a 401 here is not about credentials.
                GatewayError::Rejected { status, body } => AccountError::Rejected { status, body },
                other => AccountError::from(other),
            }
        })?;
        info!(username = %account.username, "account registered");
        self.navigator.navigate(Route::SIGN_IN);
        Ok(account)
    }

    fn sign_out(&self) -> Route {
        self.session_service.logout();
        self.navigator.navigate(Route::SIGN_IN);
        Route::SIGN_IN
    }
}
