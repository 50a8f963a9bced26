use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// Login name (the account email).
    pub username: String,
    /// Stable account identifier.
    pub user_id: String,
}

/// Claims embedded in every access and refresh token.
///
/// All four fields are required: a token missing any of them fails
/// verification outright.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: stable account identifier.
    pub sub: String,
    /// Login name (the account email).
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` expiring `ttl` from now.
    ///
    /// A zero or negative `ttl` yields claims that are already expired.
    pub fn issue(subject: &TokenSubject, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.user_id.clone(),
            username: subject.username.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Decompose back into the subject the token was issued for.
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            username: self.username.clone(),
            user_id: self.sub.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject {
            username: "alice@example.com".to_string(),
            user_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_issue_sets_lifetime_relative_to_issuance() {
        let claims = Claims::issue(&subject(), Duration::minutes(15));

        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice@example.com");
    }

    #[test]
    fn test_subject_round_trips() {
        let claims = Claims::issue(&subject(), Duration::hours(1));
        assert_eq!(claims.subject(), subject());
    }

    #[test]
    fn test_non_positive_ttl_is_already_expired() {
        let claims = Claims::issue(&subject(), Duration::seconds(-30));
        assert!(claims.exp < Utc::now().timestamp());
    }
}
