use crate::application_port::*;
use crate::domain_model::*;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSubject {
    Number(i64),
    Text(String),
}

impl From<RawSubject> for SubjectId {
    fn from(raw: RawSubject) -> Self {
        match raw {
            RawSubject::Number(n) => SubjectId(n.to_string()),
            RawSubject::Text(s) => SubjectId(s),
        }
    }
}

// Shape of the payload issued by the backend's token endpoint.
#[derive(Debug, Deserialize)]
struct RawClaims {
    exp: Option<i64>,
    iat: Option<i64>,
    user_id: Option<RawSubject>,
    sub: Option<RawSubject>,
    username: Option<String>,
    role: Option<String>,
    is_flagged: Option<bool>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

/// Reads the payload segment of a compact JWS. The header and signature are
/// never looked at, so any `alg` (including `none`) is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtClaimsCodec;

impl JwtClaimsCodec {
    pub fn new() -> Self {
        Self
    }

    fn payload(token: &str) -> Result<RawClaims, DecodeError> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => {
                return Err(DecodeError::Malformed(
                    "expected three dot-separated segments".to_string(),
                ));
            }
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| DecodeError::Malformed(format!("payload is not base64url: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DecodeError::Malformed(format!("payload is not a claims object: {}", e)))
    }

    fn timestamp(claim: &'static str, secs: i64) -> Result<DateTime<Utc>, DecodeError> {
        DateTime::from_timestamp(secs, 0).ok_or_else(|| DecodeError::InvalidClaim {
            claim,
            reason: format!("{} is out of range", secs),
        })
    }
}

impl TokenCodec for JwtClaimsCodec {
    fn decode(&self, token: &AccessToken) -> Result<DecodedClaims, DecodeError> {
        let raw = Self::payload(token.as_str())?;

        let exp = raw.exp.ok_or(DecodeError::MissingClaim("exp"))?;
        let expires_at = Self::timestamp("exp", exp)?;
        let issued_at = raw
            .iat
            .map(|iat| Self::timestamp("iat", iat))
            .transpose()?;

        let subject_id: SubjectId = raw
            .user_id
            .or(raw.sub)
            .ok_or(DecodeError::MissingClaim("user_id"))?
            .into();

        let role = match raw.role {
            Some(role) => role
                .parse::<Role>()
                .map_err(|reason| DecodeError::InvalidClaim {
                    claim: "role",
                    reason,
                })?,
            None => Role::default(),
        };

        Ok(DecodedClaims {
            subject_id,
            username: raw.username.unwrap_or_default(),
            role,
            issued_at,
            expires_at,
            is_flagged: raw.is_flagged,
            email: raw.email,
            first_name: raw.first_name,
            last_name: raw.last_name,
        })
    }
}
