use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("missing claim: {0}")]
    MissingClaim(&'static str),
    #[error("invalid claim {claim}: {reason}")]
    InvalidClaim { claim: &'static str, reason: String },
}

/// Reads the claims out of an access token.
///
/// Decoding is advisory: the signature is never checked here, the remote API
/// does that on every request it serves.
pub trait TokenCodec: Send + Sync {
    fn decode(&self, token: &AccessToken) -> Result<DecodedClaims, DecodeError>;
}
