use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_ACCESS_TOKEN_TTL_SECS, DEFAULT_COOKIE_SECURE,
    DEFAULT_REFRESH_TOKEN_TTL_SECS, MIN_SECRET_LEN,
};

use serde::Deserialize;

/// Token signing secrets and lifetimes.
///
/// Both secrets are required at startup; there is no anonymous mode for
/// an identity service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_secret: Option<String>,
    pub refresh_token_secret: Option<String>,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Mark auth cookies `Secure` (disable only for plain-HTTP dev setups)
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: None,
            refresh_token_secret: None,
            access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: DEFAULT_REFRESH_TOKEN_TTL_SECS,
            cookie_secure: DEFAULT_COOKIE_SECURE,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let access = self
            .access_token_secret
            .as_deref()
            .ok_or_else(|| ConfigError::auth("auth.access_token_secret is required"))?;
        let refresh = self
            .refresh_token_secret
            .as_deref()
            .ok_or_else(|| ConfigError::auth("auth.refresh_token_secret is required"))?;

        if access.len() < MIN_SECRET_LEN {
            return Err(ConfigError::auth(format!(
                "auth.access_token_secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        if refresh.len() < MIN_SECRET_LEN {
            return Err(ConfigError::auth(format!(
                "auth.refresh_token_secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        if access == refresh {
            return Err(ConfigError::auth(
                "auth.access_token_secret and auth.refresh_token_secret must differ",
            ));
        }

        if self.access_token_ttl_secs <= 0 {
            return Err(ConfigError::auth(format!(
                "auth.access_token_ttl_secs must be positive, got {}",
                self.access_token_ttl_secs
            )));
        }
        if self.refresh_token_ttl_secs <= self.access_token_ttl_secs {
            return Err(ConfigError::auth(
                "auth.refresh_token_ttl_secs must exceed auth.access_token_ttl_secs",
            ));
        }

        Ok(())
    }
}
