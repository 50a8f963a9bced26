use std::env;

use auth_core::JwtError;
use auth_core::TokenCodec;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::identity::models::TokenLifetimes;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub tokens: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Key material and lifetimes for the two token categories.
///
/// Deserialized once at startup and passed into the codec and engine
/// constructors; business logic never reads the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    /// PEM-encoded RSA keys, one pair per token category.
    pub access_private_key: String,
    pub access_public_key: String,
    pub refresh_private_key: String,
    pub refresh_public_key: String,
}

impl TokenConfig {
    /// Build the token codec from the configured key material.
    ///
    /// # Errors
    /// * `InvalidKey` - a PEM document does not parse
    pub fn build_codec(&self) -> Result<TokenCodec, JwtError> {
        TokenCodec::from_rsa_pem(
            self.access_private_key.as_bytes(),
            self.access_public_key.as_bytes(),
            self.refresh_private_key.as_bytes(),
            self.refresh_public_key.as_bytes(),
        )
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: Duration::seconds(self.access_ttl_seconds),
            refresh: Duration::seconds(self.refresh_ttl_seconds),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKENS__ACCESS_TTL_SECONDS, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: TOKENS__ACCESS_PRIVATE_KEY overrides tokens.access_private_key
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_config() -> TokenConfig {
        TokenConfig {
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 604_800,
            access_private_key: include_str!("../../testdata/access_private.pem").to_string(),
            access_public_key: include_str!("../../testdata/access_public.pem").to_string(),
            refresh_private_key: include_str!("../../testdata/refresh_private.pem").to_string(),
            refresh_public_key: include_str!("../../testdata/refresh_public.pem").to_string(),
        }
    }

    #[test]
    fn test_codec_builds_from_configured_pems() {
        assert!(token_config().build_codec().is_ok());
    }

    #[test]
    fn test_lifetimes_are_read_as_seconds() {
        let lifetimes = token_config().lifetimes();
        assert_eq!(lifetimes.access, Duration::seconds(900));
        assert_eq!(lifetimes.refresh, Duration::days(7));
    }

    #[test]
    fn test_broken_key_material_fails_at_startup() {
        let mut tokens = token_config();
        tokens.refresh_public_key = "-----BEGIN PUBLIC KEY-----\ngarbage".to_string();
        assert!(tokens.build_codec().is_err());
    }
}
