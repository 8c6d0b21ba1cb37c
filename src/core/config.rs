use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

const REDACTED: &str = "[REDACTED]";

/// Credentials and endpoint overrides for one venue.
///
/// Empty credentials mean read-only: public REST endpoints and anonymous
/// stream sessions only.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    /// REST base URL; the venue default when `None`
    pub base_url: Option<String>,
    /// WebSocket base URL without the venue path; the venue default when `None`
    pub ws_url: Option<String>,
}

#[derive(Serialize)]
struct RedactedConfig<'a> {
    api_key: &'static str,
    secret_key: &'static str,
    base_url: &'a Option<String>,
    ws_url: &'a Option<String>,
}

impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RedactedConfig {
            api_key: REDACTED,
            secret_key: REDACTED,
            base_url: &self.base_url,
            ws_url: &self.ws_url,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct PlainConfig {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    secret_key: String,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    ws_url: Option<String>,
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let plain = PlainConfig::deserialize(deserializer)?;
        Ok(Self {
            base_url: plain.base_url,
            ws_url: plain.ws_url,
            ..Self::new(plain.api_key, plain.secret_key)
        })
    }
}

/// `{PREFIX}_{NAME}` for an upper-cased venue prefix
fn env_name(prefix: &str, name: &str) -> String {
    format!("{}_{}", prefix.to_uppercase(), name)
}

impl ExchangeConfig {
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            base_url: None,
            ws_url: None,
        }
    }

    /// No credentials, venue default endpoints
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Load credentials and endpoint overrides from the environment.
    ///
    /// Reads `{PREFIX}_API_KEY` and `{PREFIX}_SECRET_KEY` (both required) plus
    /// the optional `{PREFIX}_BASE_URL` and `{PREFIX}_WS_URL`, e.g. `COINEX_API_KEY`.
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let required = |name: &str| {
            let var = env_name(exchange_prefix, name);
            env::var(&var).map_err(|_| ConfigError::MissingEnvironmentVariable(var))
        };
        let api_key = required("API_KEY")?;
        let secret_key = required("SECRET_KEY")?;

        Ok(Self::new(api_key, secret_key).with_env_endpoints(exchange_prefix))
    }

    /// [`Self::from_env`], falling back to read-only when credentials are
    /// missing. Endpoint overrides apply either way.
    pub fn from_env_or_read_only(exchange_prefix: &str) -> Self {
        Self::from_env(exchange_prefix)
            .unwrap_or_else(|_| Self::read_only().with_env_endpoints(exchange_prefix))
    }

    fn with_env_endpoints(mut self, exchange_prefix: &str) -> Self {
        self.base_url = env::var(env_name(exchange_prefix, "BASE_URL")).ok();
        self.ws_url = env::var(env_name(exchange_prefix, "WS_URL")).ok();
        self
    }

    /// [`Self::from_env`] after loading `.env` from the working directory.
    /// Never commit a `.env` holding real keys.
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// [`Self::from_env`] after loading the given env file. A missing file is
    /// not an error.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        if let Err(e) = dotenv::from_path(env_file_path) {
            let missing = matches!(
                &e,
                dotenv::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound
            );
            if !missing {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "cannot load env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Both keys present; signed REST calls and stream login need this
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key().is_empty() && !self.secret_key().is_empty()
    }

    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn ws_url(mut self, ws_url: String) -> Self {
        self.ws_url = Some(ws_url);
        self
    }

    /// Exposes the key; only for building signers
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Exposes the secret; only for building signers
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ExchangeConfig::new("my_key".to_string(), "my_secret".to_string())
            .base_url("http://127.0.0.1:8080".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("my_key"));
        assert!(!json.contains("my_secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("127.0.0.1:8080"));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = ExchangeConfig::new("k".to_string(), "super-secret-value".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_read_only_has_no_credentials() {
        assert!(!ExchangeConfig::read_only().has_credentials());
        assert!(ExchangeConfig::new("k".into(), "s".into()).has_credentials());
    }

    #[test]
    fn test_deserialize_without_credentials() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"base_url":null,"ws_url":"ws://localhost:1"}"#).unwrap();
        assert!(!config.has_credentials());
        assert_eq!(config.ws_url.as_deref(), Some("ws://localhost:1"));
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = ExchangeConfig::from_env("VENUELINK_TEST_UNSET_PREFIX").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvironmentVariable(v) if v == "VENUELINK_TEST_UNSET_PREFIX_API_KEY"));
    }
}
