use thiserror::Error;

/// Error raised when the hashing primitive cannot complete.
///
/// Only `hash` can fail. Verification never raises: a stored hash that does
/// not parse is reported as a mismatch.
#[derive(Debug, Clone, Error)]
#[error("password hashing failed: {0}")]
pub struct HashingFailure(pub String);
