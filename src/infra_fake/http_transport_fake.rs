use crate::domain_port::*;
use crate::infra_fake::FakeAuthGateway;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scriptable transport that records every request it sees.
///
/// Without a scripted response it answers like the remote API would: 401
/// when no bearer is attached (or, with a verifier, when the bearer does not
/// verify), 200 with an empty JSON object otherwise.
#[derive(Default)]
pub struct FakeTransport {
    scripted: Mutex<HashMap<(HttpMethod, String), HttpResponse>>,
    unreachable: Mutex<bool>,
    requests: Mutex<Vec<HttpRequest>>,
    verifier: Option<Arc<FakeAuthGateway>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verifier(verifier: Arc<FakeAuthGateway>) -> Self {
        Self {
            verifier: Some(verifier),
            ..Self::default()
        }
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.insert(
                (method, path.to_string()),
                HttpResponse::new(status, body.as_bytes()),
            );
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        if let Ok(mut flag) = self.unreachable.lock() {
            *flag = unreachable;
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn default_response(&self, request: &HttpRequest) -> HttpResponse {
        let authorized = match (&request.bearer, &self.verifier) {
            (None, _) => false,
            (Some(token), Some(verifier)) => verifier.verify_access(token),
            (Some(_), None) => true,
        };
        if authorized {
            HttpResponse::new(200, "{}")
        } else {
            HttpResponse::new(
                401,
                r#"{"detail":"Authentication credentials were not provided."}"#,
            )
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if self.unreachable.lock().map(|u| *u).unwrap_or(false) {
            return Err(TransportError("connection refused".into()));
        }
        let scripted = self
            .scripted
            .lock()
            .ok()
            .and_then(|s| s.get(&(request.method, request.path.clone())).cloned());
        Ok(scripted.unwrap_or_else(|| self.default_response(&request)))
    }
}
