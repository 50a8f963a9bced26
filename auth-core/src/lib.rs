//! Authentication primitives.
//!
//! Building blocks for the credential and token lifecycle:
//! - Password hashing and verification (Argon2id)
//! - Signing and verification of paired access/refresh bearer tokens
//!   (RS256, one asymmetric key pair per token category)
//!
//! The engine orchestrating these against a user store lives in the service
//! crate. Nothing in here performs I/O or holds shared mutable state, so
//! every operation is safe to run fully in parallel.
//!
//! # Examples
//!
//! ## Password hashing
//! ```
//! use auth_core::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("wrong_password", &hash));
//! ```
//!
//! ## Tokens
//! ```no_run
//! use auth_core::{KeyPurpose, TokenCodec, TokenSubject};
//! use chrono::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = TokenCodec::from_rsa_pem(
//!     &std::fs::read("keys/access_private.pem")?,
//!     &std::fs::read("keys/access_public.pem")?,
//!     &std::fs::read("keys/refresh_private.pem")?,
//!     &std::fs::read("keys/refresh_public.pem")?,
//! )?;
//!
//! let subject = TokenSubject {
//!     username: "alice@example.com".to_string(),
//!     user_id: "8f1f9a52-7a70-4be5-a5eb-5ab5c52df3aa".to_string(),
//! };
//! let token = codec.sign(&subject, KeyPurpose::Access, Duration::minutes(15))?;
//! let claims = codec.verify(&token, KeyPurpose::Access)?;
//! assert_eq!(claims.subject(), subject);
//! # Ok(())
//! # }
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::KeyPurpose;
pub use jwt::TokenCodec;
pub use jwt::TokenSubject;
pub use password::HashingFailure;
pub use password::PasswordHasher;
