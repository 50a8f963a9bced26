use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::IssuedTokens;
use crate::domain::identity::models::LoginRequest;
use crate::domain::identity::models::NewUser;
use crate::domain::identity::models::RefreshRequest;
use crate::domain::identity::models::RegisterRequest;
use crate::domain::identity::models::RegisteredUser;
use crate::domain::identity::models::TokenPair;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::identity::errors::AuthError;
use crate::identity::errors::StoreError;

/// Port for the authentication engine.
///
/// Every operation is an independent unit of work: no state is held between
/// calls beyond what the credential store persists.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate a password grant and issue a fresh token pair.
    ///
    /// # Errors
    /// * `UnsupportedGrant` - grant type is not the password grant
    /// * `UserNotFound` - no account for this email
    /// * `InvalidCredentials` - password mismatch
    /// * `Internal` - storage or signing failure
    async fn login(&self, request: LoginRequest) -> Result<IssuedTokens, AuthError>;

    /// Create an account and return its public projection.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - email already on file; nothing is written
    /// * `Internal` - hashing or storage failure; if the account row had
    ///   already been created it is deleted again best-effort
    async fn register(&self, request: RegisterRequest) -> Result<RegisteredUser, AuthError>;

    /// Rotate a refresh grant into a fresh token pair.
    ///
    /// The previously issued refresh token is not revoked; it stays valid
    /// until its own expiry.
    ///
    /// # Errors
    /// * `UnsupportedGrant` - grant type is not the refresh grant
    /// * `UserNotFound` - the presented token failed verification in any way
    /// * `Internal` - signing failure
    async fn refresh(&self, request: RefreshRequest) -> Result<TokenPair, AuthError>;
}

/// Persistence port for credential records.
///
/// Implementations provide atomic create/update semantics; the engine does
/// no locking or transactions of its own.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Look up a user by exact (case-sensitive) email.
    ///
    /// # Errors
    /// * `Database` - operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailTaken` - unique email constraint violated
    /// * `Database` - operation failed
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Record the moment of a successful password login.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `Database` - operation failed
    async fn update_last_login(&self, id: &UserId, at: DateTime<Utc>)
        -> Result<User, StoreError>;

    /// Remove a user by exact email. The compensating action for a
    /// registration that failed after its row was created.
    ///
    /// # Errors
    /// * `NotFound` - no row for this email
    /// * `Database` - operation failed
    async fn delete_by_email(&self, email: &str) -> Result<(), StoreError>;
}
