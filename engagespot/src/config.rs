//! Configuration for the `engagespot` command-line tool.
//!
//! The library itself takes credentials as constructor arguments; this module is what the bundled
//! binary uses to find them. Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `engagespot.yaml` but can be specified via `-f` flag or
//! `ENGAGESPOT_CONFIG` environment variable. A missing file is not an error.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration (default: `engagespot.yaml`)
//! 2. **Environment variables** - Variables prefixed with `ENGAGESPOT_` override YAML values
//!
//! ## Example
//!
//! ```yaml
//! api_key: your-api-key
//! api_secret: your-api-secret
//! enable_hmac: true
//! ```
//!
//! ```bash
//! ENGAGESPOT_API_SECRET=... engagespot connect --user-id user@example.com
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_DEVICE_TYPE};
use crate::error::Error;
use crate::types::Credentials;

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "ENGAGESPOT_CONFIG";

const ENV_PREFIX: &str = "ENGAGESPOT_";

/// Fields that may be set through `ENGAGESPOT_*` variables; other variables with the prefix are ignored.
const ENV_FIELDS: &[&str] = &["api_key", "api_secret", "base_url", "enable_hmac", "device_type", "device_id"];

/// Client configuration loaded from YAML and environment variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// API key from the Engagespot dashboard
    pub api_key: Option<String>,
    /// API secret from the Engagespot dashboard
    #[serde(skip_serializing)]
    pub api_secret: Option<String>,
    /// API base URL, override for staging or a local mock
    pub base_url: Url,
    /// Attach HMAC user signatures to connect calls
    pub enable_hmac: bool,
    pub device_type: String,
    /// Fixed device id; a random one is used per run when unset
    pub device_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            enable_hmac: false,
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            device_id: None,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(path).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration for offline signing, where only `api_secret` is required.
    #[allow(clippy::result_large_err)]
    pub fn load_for_signing(path: &str) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(path).extract()?;
        config.signing_secret().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(path: &str) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(path))
            // Environment variables override file values
            .merge(Env::prefixed(ENV_PREFIX).only(ENV_FIELDS))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::InvalidConfig {
                message: "api_key is not configured. Set ENGAGESPOT_API_KEY or add api_key to the config file.".to_string(),
            });
        }

        self.signing_secret()?;

        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig {
                message: format!("base_url must use http or https, got '{}'", self.base_url.scheme()),
            });
        }

        if self.device_type.is_empty() {
            return Err(Error::InvalidConfig {
                message: "device_type cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The API secret, required for both API calls and HMAC signatures.
    pub fn signing_secret(&self) -> Result<&str, Error> {
        match self.api_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(Error::InvalidConfig {
                message: "api_secret is not configured. Set ENGAGESPOT_API_SECRET or add api_secret to the config file.".to_string(),
            }),
        }
    }

    pub fn credentials(&self) -> Result<Credentials, Error> {
        self.validate()?;
        Ok(Credentials::new(
            self.api_key.clone().unwrap_or_default(),
            self.api_secret.clone().unwrap_or_default(),
        ))
    }

    pub fn options(&self) -> ClientOptions {
        ClientOptions::builder()
            .enable_hmac(self.enable_hmac)
            .base_url(self.base_url.as_str())
            .device_type(self.device_type.as_str())
            .maybe_device_id(self.device_id.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_from_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "engagespot.yaml",
                r#"
api_key: key-from-file
api_secret: secret-from-file
enable_hmac: true
device_id: laptop-1
"#,
            )?;

            let config = Config::load("engagespot.yaml")?;

            assert_eq!(config.api_key.as_deref(), Some("key-from-file"));
            assert_eq!(config.api_secret.as_deref(), Some("secret-from-file"));
            assert!(config.enable_hmac);
            assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
            assert_eq!(config.device_type, "web"); // default
            assert_eq!(config.device_id.as_deref(), Some("laptop-1"));

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "engagespot.yaml",
                r#"
api_key: key-from-file
api_secret: secret-from-file
"#,
            )?;

            jail.set_env("ENGAGESPOT_API_SECRET", "secret-from-env");
            jail.set_env("ENGAGESPOT_BASE_URL", "http://localhost:9999/v3/");
            jail.set_env("ENGAGESPOT_CONFIG", "engagespot.yaml");

            let config = Config::load("engagespot.yaml")?;

            // Env vars should override
            assert_eq!(config.api_secret.as_deref(), Some("secret-from-env"));
            assert_eq!(config.base_url.as_str(), "http://localhost:9999/v3/");

            // YAML values should be preserved
            assert_eq!(config.api_key.as_deref(), Some("key-from-file"));

            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_env_only() {
        Jail::expect_with(|jail| {
            jail.set_env("ENGAGESPOT_API_KEY", "k");
            jail.set_env("ENGAGESPOT_API_SECRET", "s");

            let config = Config::load("does-not-exist.yaml")?;
            assert_eq!(config.api_key.as_deref(), Some("k"));

            Ok(())
        });
    }

    #[test]
    fn test_unrelated_prefixed_env_is_ignored() {
        Jail::expect_with(|jail| {
            jail.set_env("ENGAGESPOT_API_KEY", "k");
            jail.set_env("ENGAGESPOT_API_SECRET", "s");
            jail.set_env("ENGAGESPOT_LOG", "debug");
            jail.set_env("ENGAGESPOT_CONFIG", "elsewhere.yaml");

            let config = Config::load("engagespot.yaml")?;
            assert_eq!(config.api_secret.as_deref(), Some("s"));

            Ok(())
        });
    }

    #[test]
    fn test_signing_only_needs_secret() {
        Jail::expect_with(|jail| {
            jail.create_file("engagespot.yaml", "api_secret: secret-only\n")?;

            let config = Config::load_for_signing("engagespot.yaml")?;
            assert_eq!(config.signing_secret().unwrap(), "secret-only");

            // Full loading still insists on the API key
            let err = Config::load("engagespot.yaml").unwrap_err();
            assert!(err.to_string().contains("api_key"));

            Ok(())
        });
    }

    #[test]
    fn test_signing_without_secret_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("engagespot.yaml", "api_key: key-only\n")?;

            let err = Config::load_for_signing("engagespot.yaml").unwrap_err();
            assert!(err.to_string().contains("api_secret"));

            Ok(())
        });
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("engagespot.yaml", "api_key: key-only\n")?;

            let err = Config::load("engagespot.yaml").unwrap_err();
            assert!(err.to_string().contains("api_secret"));

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("engagespot.yaml", "api_key: k\napi_secret: s\nretries: 3\n")?;

            assert!(Config::load("engagespot.yaml").is_err());

            Ok(())
        });
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let config = Config {
            api_key: Some("k".to_string()),
            api_secret: Some("s".to_string()),
            base_url: Url::parse("ftp://example.com/").unwrap(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_options_conversion() {
        let config = Config {
            api_key: Some("k".to_string()),
            api_secret: Some("s".to_string()),
            enable_hmac: true,
            device_id: Some("device-9".to_string()),
            ..Default::default()
        };

        let options = config.options();
        assert!(options.enable_hmac);
        assert_eq!(options.base_url, DEFAULT_BASE_URL);
        assert_eq!(options.device_id.as_deref(), Some("device-9"));

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.api_key(), "k");
        assert_eq!(credentials.api_secret(), "s");
    }
}
