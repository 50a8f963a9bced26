use thiserror::Error;

/// Error type for token signing and verification.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("signing key rejected: {0}")]
    InvalidKey(String),

    #[error("failed to sign token: {0}")]
    SigningFailed(String),

    /// Bad signature, malformed structure, wrong key, or missing claim.
    #[error("token is invalid: {0}")]
    TokenInvalid(String),

    /// Structurally valid and correctly signed, but past its expiry.
    #[error("token is expired")]
    TokenExpired,
}
