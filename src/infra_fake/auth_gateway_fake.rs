use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const SIGNING_KEY: &[u8] = b"careermatch-fake-signing-key";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RefreshOutcome {
    /// Verify the refresh token and issue a new access token if it holds up.
    Issue,
    /// Answer 401 regardless of the token.
    Reject,
    /// Fail below HTTP.
    Unreachable,
}

#[derive(Debug, Serialize, Deserialize)]
struct FakeClaims {
    token_type: String,
    exp: i64,
    iat: i64,
    jti: String,
    user_id: i64,
    username: String,
    email: String,
    role: Role,
    first_name: String,
    last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_flagged: Option<bool>,
}

#[derive(Debug, Clone)]
struct FakeAccount {
    id: i64,
    password: String,
    email: String,
    role: Role,
    first_name: String,
    last_name: String,
    is_flagged: bool,
}

struct Knobs {
    refresh_outcome: RefreshOutcome,
    access_ttl: Duration,
    refresh_ttl: Duration,
    latency: std::time::Duration,
}

/// In-process stand-in for the remote auth endpoints. Issues real HS256
/// tokens shaped like the backend's, signed with a local key.
pub struct FakeAuthGateway {
    accounts: Mutex<HashMap<String, FakeAccount>>,
    knobs: Mutex<Knobs>,
    login_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl FakeAuthGateway {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            knobs: Mutex::new(Knobs {
                refresh_outcome: RefreshOutcome::Issue,
                access_ttl: Duration::minutes(5),
                refresh_ttl: Duration::days(1),
                latency: std::time::Duration::ZERO,
            }),
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Two ready-made accounts: `admin`/`admin` and `demo`/`demo`.
    pub fn seeded() -> Self {
        let gateway = Self::new();
        gateway.add_account("admin", "admin", Role::Admin);
        gateway.add_account("demo", "demo", Role::User);
        gateway
    }

    pub fn add_account(&self, username: &str, password: &str, role: Role) {
        if let Ok(mut accounts) = self.accounts.lock() {
            let id = accounts.len() as i64 + 1;
            accounts.insert(
                username.to_string(),
                FakeAccount {
                    id,
                    password: password.to_string(),
                    email: format!("{}@example.com", username),
                    role,
                    first_name: String::new(),
                    last_name: String::new(),
                    is_flagged: false,
                },
            );
        }
    }

    pub fn flag_account(&self, username: &str) {
        if let Ok(mut accounts) = self.accounts.lock() {
            if let Some(account) = accounts.get_mut(username) {
                account.is_flagged = true;
            }
        }
    }

    pub fn set_refresh_outcome(&self, outcome: RefreshOutcome) {
        if let Ok(mut knobs) = self.knobs.lock() {
            knobs.refresh_outcome = outcome;
        }
    }

    /// Lifetime of issued access tokens. Negative values issue expired tokens.
    pub fn set_access_ttl(&self, ttl: Duration) {
        if let Ok(mut knobs) = self.knobs.lock() {
            knobs.access_ttl = ttl;
        }
    }

    pub fn set_latency(&self, latency: std::time::Duration) {
        if let Ok(mut knobs) = self.knobs.lock() {
            knobs.latency = latency;
        }
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Issues a pair for a known account without going through sign-in.
    pub fn issue_pair(&self, username: &str) -> Result<CredentialPair, GatewayError> {
        let account = self.account(username)?;
        let (access_ttl, refresh_ttl) = self
            .knobs
            .lock()
            .map(|k| (k.access_ttl, k.refresh_ttl))
            .map_err(|_| GatewayError::Transport("fake gateway poisoned".into()))?;
        Ok(CredentialPair {
            access: AccessToken(self.mint("access", username, &account, access_ttl)?),
            refresh: RefreshToken(self.mint("refresh", username, &account, refresh_ttl)?),
        })
    }

    /// True if `token` is an unexpired access token signed by this gateway.
    pub fn verify_access(&self, token: &str) -> bool {
        matches!(self.verify(token), Ok(claims) if claims.token_type == "access")
    }

    fn account(&self, username: &str) -> Result<FakeAccount, GatewayError> {
        self.accounts
            .lock()
            .map_err(|_| GatewayError::Transport("fake gateway poisoned".into()))?
            .get(username)
            .cloned()
            .ok_or_else(Self::no_active_account)
    }

    fn mint(
        &self,
        token_type: &str,
        username: &str,
        account: &FakeAccount,
        ttl: Duration,
    ) -> Result<String, GatewayError> {
        let now = Utc::now();
        let claims = FakeClaims {
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: nanoid!(),
            user_id: account.id,
            username: username.to_string(),
            email: account.email.clone(),
            role: account.role,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            is_flagged: account.is_flagged.then_some(true),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SIGNING_KEY),
        )
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<FakeClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<FakeClaims>(token, &DecodingKey::from_secret(SIGNING_KEY), &validation)
            .map(|data| data.claims)
    }

    async fn simulate_latency(&self) {
        let latency = self
            .knobs
            .lock()
            .map(|k| k.latency)
            .unwrap_or(std::time::Duration::ZERO);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn no_active_account() -> GatewayError {
        GatewayError::Rejected {
            status: 401,
            body: r#"{"detail":"No active account found with the given credentials"}"#.into(),
        }
    }

    fn token_not_valid() -> GatewayError {
        GatewayError::Rejected {
            status: 401,
            body: r#"{"detail":"Token is invalid or expired","code":"token_not_valid"}"#.into(),
        }
    }
}

impl Default for FakeAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthGateway for FakeAuthGateway {
    async fn obtain_pair(&self, input: &LoginInput) -> Result<CredentialPair, GatewayError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let account = self.account(&input.username)?;
        if account.password != input.password {
            return Err(Self::no_active_account());
        }
        self.issue_pair(&input.username)
    }

    async fn refresh_access(&self, refresh: &RefreshToken) -> Result<AccessToken, GatewayError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let outcome = self
            .knobs
            .lock()
            .map(|k| k.refresh_outcome)
            .unwrap_or(RefreshOutcome::Reject);
        match outcome {
            RefreshOutcome::Unreachable => {
                Err(GatewayError::Transport("connection refused".into()))
            }
            RefreshOutcome::Reject => Err(Self::token_not_valid()),
            RefreshOutcome::Issue => {
                let claims = self
                    .verify(refresh.as_str())
                    .map_err(|_| Self::token_not_valid())?;
                if claims.token_type != "refresh" {
                    return Err(Self::token_not_valid());
                }
                let pair = self.issue_pair(&claims.username)?;
                Ok(pair.access)
            }
        }
    }

    async fn google_login(
        &self,
        input: &GoogleLoginInput,
    ) -> Result<CredentialPair, GatewayError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let username = input
            .token
            .strip_prefix("google:")
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GatewayError::Rejected {
                status: 400,
                body: r#"{"error":"Invalid Google token"}"#.into(),
            })?;
        if self.account(username).is_err() {
            self.add_account(username, &nanoid!(), Role::User);
        }
        self.issue_pair(username)
    }

    async fn register(&self, input: &RegisterInput) -> Result<RegisteredAccount, GatewayError> {
        self.simulate_latency().await;
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| GatewayError::Transport("fake gateway poisoned".into()))?;
        if accounts.contains_key(&input.username) {
            return Err(GatewayError::Rejected {
                status: 400,
                body: r#"{"username":["A user with that username already exists."]}"#.into(),
            });
        }
        let id = accounts.len() as i64 + 1;
        let role = input.role.unwrap_or_default();
        accounts.insert(
            input.username.clone(),
            FakeAccount {
                id,
                password: input.password.clone(),
                email: input.email.clone(),
                role,
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                is_flagged: false,
            },
        );
        Ok(RegisteredAccount {
            id: Some(serde_json::Value::from(id)),
            username: input.username.clone(),
            email: input.email.clone(),
            role,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
        })
    }
}
