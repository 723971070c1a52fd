use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_fake::*;
use crate::infra_fs::*;
use crate::infra_http::*;
use crate::infra_memory::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

/// All session collaborators, wired once per process.
pub struct Client {
    pub session_service: Arc<dyn SessionService>,
    pub account_service: Arc<dyn AccountService>,
    pub api: Arc<RequestPipeline>,
    pub navigator: Arc<HistoryNavigator>,
}

impl Client {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match settings.storage.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "file" => Arc::new(FileStore::new(&settings.storage.path)),
            other => return Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        };
        let token_store = TokenStore::new(storage);

        let (transport, auth_gateway): (Arc<dyn HttpTransport>, Arc<dyn AuthGateway>) =
            match settings.api.backend.as_str() {
                "fake" => {
                    let gateway = Arc::new(FakeAuthGateway::seeded());
                    (Arc::new(FakeTransport::with_verifier(gateway.clone())), gateway)
                }
                "real" => {
                    let timeout = settings.api.timeout_secs.map(Duration::from_secs);
                    let transport: Arc<dyn HttpTransport> =
                        Arc::new(ReqwestTransport::new(&settings.api.base_url, timeout)?);
                    let gateway = Arc::new(HttpAuthGateway::new(
                        transport.clone(),
                        settings.api.login_path.clone(),
                    ));
                    (transport, gateway)
                }
                other => return Err(anyhow::anyhow!("Unknown api backend: {}", other)),
            };

        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtClaimsCodec::new());
        let session_service: Arc<dyn SessionService> = Arc::new(RealSessionService::new(
            token_store.clone(),
            token_codec,
            auth_gateway.clone(),
        ));
        let navigator = Arc::new(HistoryNavigator::new(Route::Landing));
        let account_service: Arc<dyn AccountService> = Arc::new(RealAccountService::new(
            auth_gateway,
            session_service.clone(),
            navigator.clone(),
        ));
        let api = Arc::new(RequestPipeline::new(
            transport,
            token_store,
            session_service.clone(),
            navigator.clone(),
        ));

        info!(
            api = %settings.api.backend,
            storage = %settings.storage.backend,
            "client assembled"
        );

        Ok(Self {
            session_service,
            account_service,
            api,
            navigator,
        })
    }

    /// Entering a route: drops the session where the route demands it, then
    /// asks the guard.
    pub fn visit(&self, path: &str) -> (Route, GuardOutcome) {
        let route = Route::from_path(path);
        if route.ends_session() {
            self.session_service.logout();
        }
        let (route, outcome) = resolve_route(path, &self.session_service.state());
        match outcome {
            GuardOutcome::Redirect(target) => self.navigator.navigate(target),
            _ => self.navigator.navigate(route),
        }
        (route, outcome)
    }
}
