use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const DEFAULT_LOGIN_PATH: &str = "/login/";
pub const REFRESH_PATH: &str = "/token/refresh/";
pub const REGISTER_PATH: &str = "/register/";
pub const GOOGLE_LOGIN_PATH: &str = "/google-login/";

#[derive(Debug, Deserialize)]
struct PairResponse {
    access: String,
    refresh: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    access: String,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Talks to the remote auth endpoints directly on the transport. These
/// calls carry no bearer credential and never trigger the 401 handling of
/// the request pipeline.
pub struct HttpAuthGateway {
    transport: Arc<dyn HttpTransport>,
    login_path: String,
}

impl HttpAuthGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, login_path: impl Into<String>) -> Self {
        Self {
            transport,
            login_path: login_path.into(),
        }
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = HttpRequest::post(path)
            .json(body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GatewayError::Transport(e.0))?;
        debug!(%path, status = response.status, "auth endpoint answered");
        if !response.is_success() {
            return Err(GatewayError::Rejected {
                status: response.status,
                body: response.text(),
            });
        }
        response
            .json()
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn obtain_pair(&self, input: &LoginInput) -> Result<CredentialPair, GatewayError> {
        let pair: PairResponse = self.post(&self.login_path, input).await?;
        Ok(CredentialPair::new(pair.access, pair.refresh))
    }

    async fn refresh_access(&self, refresh: &RefreshToken) -> Result<AccessToken, GatewayError> {
        let body = RefreshRequest {
            refresh: refresh.as_str(),
        };
        let response: AccessResponse = self.post(REFRESH_PATH, &body).await?;
        Ok(AccessToken(response.access))
    }

    async fn google_login(
        &self,
        input: &GoogleLoginInput,
    ) -> Result<CredentialPair, GatewayError> {
        let pair: PairResponse = self.post(GOOGLE_LOGIN_PATH, input).await?;
        Ok(CredentialPair::new(pair.access, pair.refresh))
    }

    async fn register(&self, input: &RegisterInput) -> Result<RegisteredAccount, GatewayError> {
        self.post(REGISTER_PATH, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_fake::FakeTransport;

    #[tokio::test]
    async fn refresh_posts_refresh_token() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(HttpMethod::Post, REFRESH_PATH, 200, r#"{"access":"new"}"#);
        let gateway = HttpAuthGateway::new(transport.clone(), DEFAULT_LOGIN_PATH);

        let access = gateway
            .refresh_access(&RefreshToken("r1".into()))
            .await
            .unwrap();
        assert_eq!(access, AccessToken("new".into()));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, REFRESH_PATH);
        assert_eq!(sent[0].bearer, None);
        assert_eq!(sent[0].body, Some(serde_json::json!({ "refresh": "r1" })));
    }

    #[tokio::test]
    async fn login_uses_configured_path() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            HttpMethod::Post,
            "/token/",
            200,
            r#"{"access":"a","refresh":"r","role":"user"}"#,
        );
        let gateway = HttpAuthGateway::new(transport.clone(), "/token/");

        let pair = gateway
            .obtain_pair(&LoginInput {
                username: "sam".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(pair, CredentialPair::new("a", "r"));
    }

    #[tokio::test]
    async fn rejection_keeps_status_and_body() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(HttpMethod::Post, REFRESH_PATH, 401, r#"{"code":"token_not_valid"}"#);
        let gateway = HttpAuthGateway::new(transport, DEFAULT_LOGIN_PATH);

        let err = gateway
            .refresh_access(&RefreshToken("r1".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn unparsable_success_is_invalid_response() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(HttpMethod::Post, REFRESH_PATH, 200, "<html>");
        let gateway = HttpAuthGateway::new(transport, DEFAULT_LOGIN_PATH);

        let err = gateway
            .refresh_access(&RefreshToken("r1".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_is_transport_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.set_unreachable(true);
        let gateway = HttpAuthGateway::new(transport, DEFAULT_LOGIN_PATH);

        let err = gateway
            .google_login(&GoogleLoginInput {
                token: "id-token".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
