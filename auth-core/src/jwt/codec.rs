use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenSubject;
use super::errors::JwtError;

/// Which of the two signing key pairs a token belongs to.
///
/// Access and refresh tokens are signed with distinct RSA key pairs, so a
/// token issued for one purpose never verifies under the other, no matter
/// how it is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPurpose {
    Access,
    Refresh,
}

struct SigningKeyPair {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKeyPair {
    fn from_rsa_pem(private_key: &[u8], public_key: &[u8]) -> Result<Self, JwtError> {
        Ok(Self {
            encoding_key: EncodingKey::from_rsa_pem(private_key)
                .map_err(|e| JwtError::InvalidKey(e.to_string()))?,
            decoding_key: DecodingKey::from_rsa_pem(public_key)
                .map_err(|e| JwtError::InvalidKey(e.to_string()))?,
        })
    }
}

/// Signs and verifies the compact bearer tokens issued by the engine.
///
/// Verification checks the signature against the public key for the selected
/// purpose and the expiry against the current time; it never needs the
/// signing half of the pair.
pub struct TokenCodec {
    access: SigningKeyPair,
    refresh: SigningKeyPair,
}

impl TokenCodec {
    const ALGORITHM: Algorithm = Algorithm::RS256;

    /// Build a codec from four PEM documents, one key pair per purpose.
    ///
    /// # Errors
    /// * `InvalidKey` - key material does not parse. Missing or broken keys
    ///   are a startup failure, not something to limp past.
    pub fn from_rsa_pem(
        access_private_key: &[u8],
        access_public_key: &[u8],
        refresh_private_key: &[u8],
        refresh_public_key: &[u8],
    ) -> Result<Self, JwtError> {
        Ok(Self {
            access: SigningKeyPair::from_rsa_pem(access_private_key, access_public_key)?,
            refresh: SigningKeyPair::from_rsa_pem(refresh_private_key, refresh_public_key)?,
        })
    }

    fn keys(&self, purpose: KeyPurpose) -> &SigningKeyPair {
        match purpose {
            KeyPurpose::Access => &self.access,
            KeyPurpose::Refresh => &self.refresh,
        }
    }

    /// Sign a token for `subject` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `SigningFailed` - the signing operation itself failed
    pub fn sign(
        &self,
        subject: &TokenSubject,
        purpose: KeyPurpose,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::issue(subject, ttl);

        encode(
            &Header::new(Self::ALGORITHM),
            &claims,
            &self.keys(purpose).encoding_key,
        )
        .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    /// * `TokenExpired` - structurally valid but past its expiry
    /// * `TokenInvalid` - anything else: bad signature, wrong key pair,
    ///   malformed token, missing claim
    pub fn verify(&self, token: &str, purpose: KeyPurpose) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Self::ALGORITHM);
        // Expiry is exact; no leeway.
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.keys(purpose).decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::TokenInvalid(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Convenience decomposition of `verify` down to the subject.
    pub fn extract_subject(
        &self,
        token: &str,
        purpose: KeyPurpose,
    ) -> Result<TokenSubject, JwtError> {
        self.verify(token, purpose).map(|claims| claims.subject())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_PRIVATE: &[u8] = include_bytes!("../../testdata/access_private.pem");
    const ACCESS_PUBLIC: &[u8] = include_bytes!("../../testdata/access_public.pem");
    const REFRESH_PRIVATE: &[u8] = include_bytes!("../../testdata/refresh_private.pem");
    const REFRESH_PUBLIC: &[u8] = include_bytes!("../../testdata/refresh_public.pem");

    fn codec() -> TokenCodec {
        TokenCodec::from_rsa_pem(ACCESS_PRIVATE, ACCESS_PUBLIC, REFRESH_PRIVATE, REFRESH_PUBLIC)
            .expect("test keys should parse")
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            username: "alice@example.com".to_string(),
            user_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let codec = codec();

        let token = codec
            .sign(&subject(), KeyPurpose::Access, Duration::minutes(15))
            .expect("Failed to sign token");
        let claims = codec
            .verify(&token, KeyPurpose::Access)
            .expect("Failed to verify token");

        assert_eq!(claims.subject(), subject());
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_expired_token_fails_as_expired() {
        let codec = codec();

        let token = codec
            .sign(&subject(), KeyPurpose::Refresh, Duration::seconds(-60))
            .expect("Failed to sign token");

        assert!(matches!(
            codec.verify(&token, KeyPurpose::Refresh),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_tampered_token_fails_as_invalid_not_expired() {
        let codec = codec();

        let mut token = codec
            .sign(&subject(), KeyPurpose::Access, Duration::minutes(15))
            .expect("Failed to sign token");
        token.pop();

        assert!(matches!(
            codec.verify(&token, KeyPurpose::Access),
            Err(JwtError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let codec = codec();

        assert!(matches!(
            codec.verify("not.a.token", KeyPurpose::Access),
            Err(JwtError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_key_pairs_are_not_interchangeable() {
        let codec = codec();

        let access = codec
            .sign(&subject(), KeyPurpose::Access, Duration::minutes(15))
            .expect("Failed to sign access token");
        let refresh = codec
            .sign(&subject(), KeyPurpose::Refresh, Duration::hours(24))
            .expect("Failed to sign refresh token");

        assert!(matches!(
            codec.verify(&access, KeyPurpose::Refresh),
            Err(JwtError::TokenInvalid(_))
        ));
        assert!(matches!(
            codec.verify(&refresh, KeyPurpose::Access),
            Err(JwtError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_extract_subject() {
        let codec = codec();

        let token = codec
            .sign(&subject(), KeyPurpose::Refresh, Duration::hours(24))
            .expect("Failed to sign token");

        let extracted = codec
            .extract_subject(&token, KeyPurpose::Refresh)
            .expect("Failed to extract subject");
        assert_eq!(extracted, subject());
    }

    #[test]
    fn test_unparsable_key_material_is_rejected() {
        let result =
            TokenCodec::from_rsa_pem(b"not a key", ACCESS_PUBLIC, REFRESH_PRIVATE, REFRESH_PUBLIC);

        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }
}
