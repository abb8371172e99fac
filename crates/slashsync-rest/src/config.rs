//! Transport configuration

use slashsync_core::types::Snowflake;
use std::time::Duration;
use thiserror::Error;

/// Official API base, current stable version
pub const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the bot token
pub const TOKEN_ENV_VAR: &str = "DISCORD_BOT_TOKEN";
/// Environment variable holding the application id
pub const APPLICATION_ID_ENV_VAR: &str = "DISCORD_APPLICATION_ID";

/// Configuration errors for the REST transport
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid application id: {0}")]
    InvalidApplicationId(String),
}

/// Connection settings for the command registration endpoints.
///
/// Carries authentication and routing only; retry and rate-limit policy is
/// deliberately out of scope here.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Bot token sent as `Authorization: Bot <token>`
    pub token: String,
    /// Owning application id, part of every command route
    pub application_id: Snowflake,
    /// API base URL; override for proxies or test servers
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RestConfig {
    /// Create a config with the default base URL and timeout
    pub fn new(token: impl Into<String>, application_id: impl Into<Snowflake>) -> Self {
        Self {
            token: token.into(),
            application_id: application_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL (trailing slashes are trimmed)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve token and application id from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| ConfigError::MissingEnvVar(TOKEN_ENV_VAR))?;
        let raw_id = std::env::var(APPLICATION_ID_ENV_VAR)
            .map_err(|_| ConfigError::MissingEnvVar(APPLICATION_ID_ENV_VAR))?;
        let application_id = raw_id
            .parse::<u64>()
            .map(Snowflake)
            .map_err(|_| ConfigError::InvalidApplicationId(raw_id))?;
        Ok(Self::new(token, application_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let config = RestConfig::new("token", Snowflake(7));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.application_id, Snowflake(7));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = RestConfig::new("token", Snowflake(7)).with_base_url("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
