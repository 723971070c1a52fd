use super::DecodedClaims;
use serde::Serialize;

/// Authorization state of the running client.
///
/// Claims exist only in the `Authorized` variant, so an unauthorized session
/// can never carry a stale user.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unknown,
    Authorized(DecodedClaims),
    Unauthorized,
}

impl SessionState {
    /// Tri-state flag as consumed by views: `None` while bootstrap is pending.
    pub fn is_authorized(&self) -> Option<bool> {
        match self {
            SessionState::Unknown => None,
            SessionState::Authorized(_) => Some(true),
            SessionState::Unauthorized => Some(false),
        }
    }

    pub fn user(&self) -> Option<&DecodedClaims> {
        match self {
            SessionState::Authorized(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, SessionState::Unknown)
    }
}
