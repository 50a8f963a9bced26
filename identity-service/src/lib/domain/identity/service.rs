use std::sync::Arc;

use async_trait::async_trait;
use auth_core::JwtError;
use auth_core::KeyPurpose;
use auth_core::PasswordHasher;
use auth_core::TokenCodec;
use auth_core::TokenSubject;
use chrono::Utc;

use crate::domain::identity::models::GrantType;
use crate::domain::identity::models::IssuedTokens;
use crate::domain::identity::models::LoginRequest;
use crate::domain::identity::models::NewUser;
use crate::domain::identity::models::RefreshRequest;
use crate::domain::identity::models::RegisterRequest;
use crate::domain::identity::models::RegisteredUser;
use crate::domain::identity::models::TokenLifetimes;
use crate::domain::identity::models::TokenPair;
use crate::domain::identity::models::User;
use crate::identity::errors::AuthError;
use crate::identity::errors::AuthWarning;
use crate::identity::errors::StoreError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::CredentialStore;

/// Authentication engine.
///
/// Orchestrates the credential store, the password hasher and the token
/// codec for login, registration and refresh. Tokens are never persisted;
/// they are validated purely by signature and expiry.
pub struct AuthService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    lifetimes: TokenLifetimes,
}

impl<CS> AuthService<CS>
where
    CS: CredentialStore,
{
    /// Create the engine with its injected collaborators.
    ///
    /// Codec and lifetimes come from the startup configuration; nothing is
    /// read from the environment past this point.
    pub fn new(store: Arc<CS>, token_codec: TokenCodec, lifetimes: TokenLifetimes) -> Self {
        Self {
            store,
            password_hasher: PasswordHasher::new(),
            token_codec,
            lifetimes,
        }
    }

    fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, AuthError> {
        let access_token = self
            .token_codec
            .sign(subject, KeyPurpose::Access, self.lifetimes.access)
            .map_err(|e| AuthError::internal(format!("failed to sign access token: {e}")))?;
        let refresh_token = self
            .token_codec
            .sign(subject, KeyPurpose::Refresh, self.lifetimes.refresh)
            .map_err(|e| AuthError::internal(format!("failed to sign refresh token: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Invariants a freshly persisted registration must satisfy before the
    /// account is confirmed to the caller.
    fn check_created_record(request_email: &str, created: &User) -> Result<(), String> {
        if created.password_hash.is_empty() {
            return Err("persisted user has an empty password hash".to_string());
        }
        if created.email.as_str() != request_email {
            return Err(format!(
                "store returned a record for {} while registering {}",
                created.email, request_email
            ));
        }
        Ok(())
    }

    /// Compensating action: delete the partially registered account, then
    /// surface the original error. The delete itself is best-effort.
    async fn rollback_registration(&self, email: &str, cause: String) -> AuthError {
        let mut warnings = Vec::new();

        if let Err(e) = self.store.delete_by_email(email).await {
            tracing::warn!(
                email,
                error = %e,
                "compensating delete failed after aborted registration"
            );
            warnings.push(AuthWarning::RollbackDeleteFailed {
                email: email.to_string(),
                detail: e.to_string(),
            });
        }

        AuthError::Internal {
            message: cause,
            warnings,
        }
    }
}

#[async_trait]
impl<CS> AuthServicePort for AuthService<CS>
where
    CS: CredentialStore,
{
    async fn login(&self, request: LoginRequest) -> Result<IssuedTokens, AuthError> {
        if request.grant_type != GrantType::Password {
            return Err(AuthError::UnsupportedGrant(request.grant_type.to_string()));
        }

        let user = self
            .store
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AuthError::UserNotFound {
                email: Some(request.email.clone()),
            })?;

        if !self
            .password_hasher
            .verify(&request.password, &user.password_hash)
        {
            return Err(AuthError::InvalidCredentials {
                email: request.email,
            });
        }

        // Telemetry, not a security gate: a failed timestamp update must not
        // block token issuance.
        let mut warnings = Vec::new();
        if let Err(e) = self.store.update_last_login(&user.id, Utc::now()).await {
            tracing::warn!(user_id = %user.id, error = %e, "failed to record last login");
            warnings.push(AuthWarning::LastLoginUpdateFailed {
                detail: e.to_string(),
            });
        }

        let subject = TokenSubject {
            username: user.email.as_str().to_string(),
            user_id: user.id.to_string(),
        };
        let tokens = self.issue_pair(&subject)?;

        Ok(IssuedTokens {
            tokens,
            role: user.role,
            warnings,
        })
    }

    async fn register(&self, request: RegisterRequest) -> Result<RegisteredUser, AuthError> {
        let email = request.email.as_str().to_string();

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists { email });
        }

        let password_hash = self
            .password_hasher
            .hash(&request.password)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;

        let new_user = NewUser {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role.unwrap_or_default(),
        };

        let created = match self.store.create(new_user).await {
            Ok(user) => user,
            // Lost the race against a concurrent registration for the same
            // email.
            Err(StoreError::EmailTaken(email)) => {
                return Err(AuthError::UserAlreadyExists { email });
            }
            Err(e) => return Err(AuthError::internal(e.to_string())),
        };

        if let Err(cause) = Self::check_created_record(&email, &created) {
            return Err(self.rollback_registration(&email, cause).await);
        }

        Ok(RegisteredUser::from(&created))
    }

    async fn refresh(&self, request: RefreshRequest) -> Result<TokenPair, AuthError> {
        if request.grant_type != GrantType::Refresh {
            return Err(AuthError::UnsupportedGrant(request.grant_type.to_string()));
        }

        // Expired, forged and malformed tokens all collapse into the same
        // generic denial for the caller; the distinction survives only in
        // the logs.
        let subject = match self
            .token_codec
            .extract_subject(&request.refresh_token, KeyPurpose::Refresh)
        {
            Ok(subject) => subject,
            Err(JwtError::TokenExpired) => {
                tracing::debug!("refresh token expired");
                return Err(AuthError::UserNotFound { email: None });
            }
            Err(e) => {
                tracing::debug!(error = %e, "refresh token rejected");
                return Err(AuthError::UserNotFound { email: None });
            }
        };

        // Rotation without revocation: the presented token stays valid until
        // its own expiry.
        self.issue_pair(&subject)
    }
}
