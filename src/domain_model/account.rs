use super::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleLoginInput {
    /// ID token handed out by the Google sign-in widget.
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Account record echoed back by `/register/`. The password is write-only on
/// the server, so it never appears here.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct RegisteredAccount {
    pub id: Option<serde_json::Value>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}
