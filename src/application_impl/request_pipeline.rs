use crate::application_impl::TokenStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use nanoid::nanoid;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const UNAUTHORIZED: u16 = 401;

/// Every call to the remote API passes through here.
///
/// Outgoing requests pick up the access token straight from storage, not
/// from the session state. A 401 on the way back ends the session and sends
/// the UI to sign-in; the caller still receives the failure.
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    token_store: TokenStore,
    session_service: Arc<dyn SessionService>,
    navigator: Arc<dyn Navigator>,
}

impl RequestPipeline {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: TokenStore,
        session_service: Arc<dyn SessionService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            token_store,
            session_service,
            navigator,
        }
    }

    fn attach_credentials(&self, mut request: HttpRequest) -> HttpRequest {
        match self.token_store.access_token() {
            Ok(Some(access)) => request.bearer = Some(access.0),
            Ok(None) => request.bearer = None,
            Err(e) => {
                warn!(error = %e, "token store unreadable, sending without credentials");
                request.bearer = None;
            }
        }
        request
    }

    fn on_authorization_rejected(&self) {
        warn!("credential rejected by the server, signing out");
        self.session_service.logout();
        self.navigator.navigate(Route::SIGN_IN);
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.call(HttpRequest::get(path)).await?;
        Ok(response.json()?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = HttpRequest::post(path).json(body)?;
        Ok(self.call(request).await?.json()?)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(HttpMethod::Patch, path).json(body)?;
        Ok(self.call(request).await?.json()?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call(HttpRequest::new(HttpMethod::Delete, path))
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl ApiClient for RequestPipeline {
    async fn call(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request_id = nanoid!(8);
        let request = self.attach_credentials(request);
        let (method, path) = (request.method, request.path.clone());
        debug!(%request_id, %method, %path, authenticated = request.bearer.is_some(), "api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%request_id, %method, %path, error = %e, "api request failed");
                return Err(e.into());
            }
        };
        debug!(%request_id, status = response.status, "api response");

        if response.status == UNAUTHORIZED {
            self.on_authorization_rejected();
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            return Err(ApiError::Rejected {
                status: response.status,
                body: response.text(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{HistoryNavigator, JwtClaimsCodec, RealSessionService};
    use crate::infra_fake::{FakeAuthGateway, FakeTransport};
    use crate::infra_memory::MemoryStore;

    struct Harness {
        pipeline: RequestPipeline,
        transport: Arc<FakeTransport>,
        session: Arc<RealSessionService>,
        navigator: Arc<HistoryNavigator>,
        gateway: Arc<FakeAuthGateway>,
    }

    fn harness() -> Harness {
        let token_store = TokenStore::new(Arc::new(MemoryStore::new()));
        let gateway = Arc::new(FakeAuthGateway::seeded());
        let session = Arc::new(RealSessionService::new(
            token_store.clone(),
            Arc::new(JwtClaimsCodec::new()),
            gateway.clone(),
        ));
        let transport = Arc::new(FakeTransport::new());
        let navigator = Arc::new(HistoryNavigator::new(Route::Dashboard));
        let pipeline = RequestPipeline::new(
            transport.clone(),
            token_store,
            session.clone(),
            navigator.clone(),
        );
        Harness {
            pipeline,
            transport,
            session,
            navigator,
            gateway,
        }
    }

    #[tokio::test]
    async fn attaches_stored_access_token() {
        let h = harness();
        let pair = h.gateway.issue_pair("demo").unwrap();
        h.session.login(pair.clone());

        h.pipeline.call(HttpRequest::get("/profile/")).await.unwrap();

        let sent = h.transport.requests();
        assert_eq!(sent[0].bearer.as_deref(), Some(pair.access.as_str()));
    }

    #[tokio::test]
    async fn sends_without_credentials_when_signed_out() {
        let h = harness();
        h.transport.respond(HttpMethod::Get, "/about/", 200, "{}");

        h.pipeline.call(HttpRequest::get("/about/")).await.unwrap();
        assert_eq!(h.transport.requests()[0].bearer, None);
    }

    #[tokio::test]
    async fn unauthorized_response_ends_session() {
        let h = harness();
        h.session.login(h.gateway.issue_pair("demo").unwrap());
        h.transport.respond(HttpMethod::Get, "/education/", 401, "{}");

        let err = h.pipeline.call(HttpRequest::get("/education/")).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(h.session.state(), SessionState::Unauthorized);
        assert!(h.session.token_store().read().unwrap().is_empty());
        assert_eq!(h.navigator.current(), Route::Login);
    }

    #[tokio::test]
    async fn validation_errors_pass_through_untouched() {
        let h = harness();
        h.session.login(h.gateway.issue_pair("demo").unwrap());
        h.transport.respond(
            HttpMethod::Post,
            "/skills/",
            400,
            r#"{"name":["This field is required."]}"#,
        );

        let err = h
            .pipeline
            .post::<_, serde_json::Value>("/skills/", &serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            ApiError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("This field is required."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(h.session.state().is_authorized().unwrap());
        assert_eq!(h.navigator.current(), Route::Dashboard);
    }

    #[tokio::test]
    async fn transport_failure_keeps_session() {
        let h = harness();
        h.session.login(h.gateway.issue_pair("demo").unwrap());
        h.transport.set_unreachable(true);

        let err = h.pipeline.delete("/education/3/").await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(h.session.state().user().is_some());
    }

    #[tokio::test]
    async fn typed_get_decodes_body() {
        let h = harness();
        h.session.login(h.gateway.issue_pair("demo").unwrap());
        h.transport.respond(
            HttpMethod::Get,
            "/profile/",
            200,
            r#"{"username":"demo","skills":["rust"]}"#,
        );

        let profile: serde_json::Value = h.pipeline.get("/profile/").await.unwrap();
        assert_eq!(profile["skills"][0], "rust");
    }
}
