use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::identity::errors::AuthWarning;
use crate::identity::errors::EmailError;
use crate::identity::errors::RoleError;
use crate::identity::errors::UserIdError;

/// Persistent account record.
///
/// `password_hash` is never empty for an account whose registration
/// completed; it is set once at creation and not updatable here.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Touched by every successful password login; None until the first one.
    pub last_login: Option<DateTime<Utc>>,
}

/// Creation payload handed to the credential store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format using an RFC 5322 compliant parser. The address is
/// stored exactly as given; lookups against it are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role, carried opaquely into the login response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(RoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of credential presented to obtain tokens.
///
/// A closed two-way switch: each operation accepts exactly one member and
/// hard-rejects the other. Unknown literals never reach the engine; they
/// fail at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Password,
    Refresh,
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantType::Password => f.write_str("password"),
            GrantType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Password-grant login request.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub grant_type: GrantType,
    pub email: String,
    pub password: String,
}

/// Registration request; `role` defaults to `USER` when unspecified.
#[derive(Debug)]
pub struct RegisterRequest {
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<Role>,
}

/// Refresh-grant request. The transport layer extracts the bearer refresh
/// token from wherever its convention places it before calling the engine.
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub grant_type: GrantType,
    pub refresh_token: String,
}

/// Access/refresh token pair minted for one authentication event.
///
/// Both tokens carry the same subject but are signed with distinct key pairs
/// and expire independently. Opaque to callers.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Successful password login: the fresh token pair plus the account role,
/// with any warnings about swallowed side mutations.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokens {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub role: Role,
    #[serde(skip)]
    pub warnings: Vec<AuthWarning>,
}

/// Public projection of a newly registered account.
///
/// Deliberately omits the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Configured lifetimes for the two token categories.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_address_rejects_invalid_input() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new("".to_string()).is_err());
    }

    #[test]
    fn test_email_address_preserves_case() {
        let email = EmailAddress::new("Alice@Example.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "Alice@Example.com");
    }

    #[test]
    fn test_role_defaults_to_user_and_round_trips() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("OWNER".parse::<Role>().is_err());
    }

    #[test]
    fn test_grant_type_wire_literals() {
        assert_eq!(
            serde_json::from_str::<GrantType>("\"password\"").unwrap(),
            GrantType::Password
        );
        assert_eq!(
            serde_json::from_str::<GrantType>("\"refresh\"").unwrap(),
            GrantType::Refresh
        );
        // Any third value is a hard rejection, not a default.
        assert!(serde_json::from_str::<GrantType>("\"client_credentials\"").is_err());
    }
}
