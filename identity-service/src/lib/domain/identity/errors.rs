use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct RoleError(pub String);

/// Failures surfaced by a credential store implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Unique-key violation on the email column.
    #[error("email already taken: {0}")]
    EmailTaken(String),

    #[error("no record for {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),
}

/// A best-effort side mutation that failed and was deliberately swallowed.
///
/// Swallowed failures are logged where they happen and reported here so they
/// never mask the primary outcome of the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthWarning {
    /// The last-login timestamp could not be persisted after a successful
    /// password login.
    LastLoginUpdateFailed { detail: String },

    /// The compensating delete after an aborted registration did not
    /// complete; an orphaned record may remain.
    RollbackDeleteFailed { email: String, detail: String },
}

/// Tagged outcome for every engine operation. None of these are retried.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Grant type not valid for the requested operation. Terminal.
    #[error("unsupported grant type: {0}")]
    UnsupportedGrant(String),

    /// No matching credential record for a login, or (on refresh) a refresh
    /// token that failed verification for any reason.
    #[error("user not found")]
    UserNotFound { email: Option<String> },

    /// Password mismatch for an existing account.
    #[error("invalid credentials for {email}")]
    InvalidCredentials { email: String },

    /// Registration attempted for an email already on file.
    #[error("user already exists: {email}")]
    UserAlreadyExists { email: String },

    /// Crypto or storage failure. `warnings` lists any best-effort cleanup
    /// that also failed while this error was being handled.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        warnings: Vec<AuthWarning>,
    },
}

impl AuthError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            warnings: Vec::new(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::internal(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::internal(err.to_string())
    }
}
