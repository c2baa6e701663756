//! Harvest configuration
//!
//! Optional YAML settings for output, the HTTP transport and per-vendor
//! overrides, plus credential lookup from the environment.
//!
//! ```yaml
//! output_dir: ./out
//! require_complete: true
//! http:
//!   timeout_secs: 60
//!   max_retries: 2
//! vendors:
//!   pandape:
//!     page_size: 500
//!     max_pages: 4
//!   recruitee:
//!     rate_limit:
//!       min_interval_ms: 250
//!       max_concurrent: 4
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Settings shared by every harvest job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Directory the output files are written to (default: current directory)
    pub output_dir: Option<PathBuf>,

    /// Abort instead of writing partial collections
    pub require_complete: bool,

    /// HTTP transport settings
    pub http: HttpSettings,

    /// Per-vendor overrides keyed by vendor name
    pub vendors: HashMap<String, VendorSettings>,
}

impl HarvestConfig {
    /// Load config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides for one vendor (empty when none are configured)
    pub fn vendor(&self, name: &str) -> VendorSettings {
        self.vendors.get(name).cloned().unwrap_or_default()
    }

    /// Output directory, defaulting to the current directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs", "must be greater than 0"));
        }
        for (name, vendor) in &self.vendors {
            if vendor.page_size == Some(0) {
                return Err(invalid(
                    &format!("vendors.{name}.page_size"),
                    "must be greater than 0",
                ));
            }
            if vendor.concurrency == Some(0) {
                return Err(invalid(
                    &format!("vendors.{name}.concurrency"),
                    "must be greater than 0",
                ));
            }
            if let Some(url) = &vendor.base_url {
                url::Url::parse(url)
                    .map_err(|e| invalid(&format!("vendors.{name}.base_url"), &e.to_string()))?;
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> Error {
    Error::InvalidConfigValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for 429/5xx/timeouts (0 = fail on the first error)
    pub max_retries: u32,

    /// Backoff strategy between retries
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in seconds
    pub max_backoff_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 0,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 500,
            max_backoff_secs: 30,
        }
    }
}

impl HttpSettings {
    /// Transport config for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_secs(self.max_backoff_secs),
            )
            .build()
    }
}

// ============================================================================
// Vendors
// ============================================================================

/// Per-vendor overrides; unset fields keep the vendor's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VendorSettings {
    /// API base URL
    pub base_url: Option<String>,

    /// OAuth2 token endpoint
    pub token_url: Option<String>,

    /// Records per page
    pub page_size: Option<u32>,

    /// Maximum pages per collection
    pub max_pages: Option<u32>,

    /// Keyed harvests in flight at once
    pub concurrency: Option<usize>,

    /// Retries, overriding `http.max_retries`
    pub max_retries: Option<u32>,

    /// Request pacing
    pub rate_limit: Option<RateLimitSettings>,
}

/// Request pacing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitSettings {
    /// Minimum time between request starts, in milliseconds
    pub min_interval_ms: u64,

    /// Maximum requests in flight
    pub max_concurrent: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: 0,
            max_concurrent: 10,
        }
    }
}

impl From<&RateLimitSettings> for RateLimiterConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        RateLimiterConfig::new(
            Duration::from_millis(settings.min_interval_ms),
            settings.max_concurrent,
        )
    }
}

// ============================================================================
// Credentials
// ============================================================================

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Credential source keyed by environment variable name
#[derive(Clone)]
pub struct Credentials {
    lookup: Arc<Lookup>,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Self {
        Self::from_fn(|name| std::env::var(name).ok())
    }

    /// Read credentials through a lookup function
    pub fn from_fn(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Fixed credentials, mostly for tests
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_fn(move |name| map.get(name).cloned())
    }

    /// Value of a variable, treating blank as unset
    pub fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    /// Value of a variable or [`Error::MissingCredential`]
    pub fn require(&self, name: &str) -> Result<String> {
        self.get(name).ok_or_else(|| Error::missing_credential(name))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = HarvestConfig::from_yaml("").unwrap();
        assert_eq!(config, HarvestConfig::default());
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert!(!config.require_complete);
        assert_eq!(config.http.max_retries, 0);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
output_dir: ./out
require_complete: true
http:
  timeout_secs: 60
  max_retries: 2
  backoff: linear
  initial_backoff_ms: 100
  max_backoff_secs: 5
vendors:
  pandape:
    base_url: http://localhost:9000/v2
    token_url: http://localhost:9000/connect/token
    page_size: 500
    max_pages: 4
  recruitee:
    concurrency: 3
    rate_limit:
      min_interval_ms: 250
      max_concurrent: 4
";
        let config = HarvestConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.output_dir(), PathBuf::from("./out"));
        assert!(config.require_complete);
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(config.http.backoff, BackoffType::Linear);

        let pandape = config.vendor("pandape");
        assert_eq!(pandape.page_size, Some(500));
        assert_eq!(pandape.max_pages, Some(4));
        assert_eq!(
            pandape.token_url.as_deref(),
            Some("http://localhost:9000/connect/token")
        );

        let recruitee = config.vendor("recruitee");
        assert_eq!(recruitee.concurrency, Some(3));
        assert_eq!(
            recruitee.rate_limit,
            Some(RateLimitSettings {
                min_interval_ms: 250,
                max_concurrent: 4
            })
        );

        assert_eq!(config.vendor("gupy"), VendorSettings::default());
    }

    #[test]
    fn test_unknown_field_is_error() {
        let err = HarvestConfig::from_yaml("outptu_dir: x").unwrap_err();
        assert!(err.to_string().contains("outptu_dir"));
    }

    #[test]
    fn test_zero_page_size_is_error() {
        let err = HarvestConfig::from_yaml("vendors:\n  pandape:\n    page_size: 0").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { field, .. } if field == "vendors.pandape.page_size"
        ));
    }

    #[test]
    fn test_invalid_base_url_is_error() {
        let err = HarvestConfig::from_yaml("vendors:\n  gupy:\n    base_url: nope").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "require_complete: true").unwrap();

        let config = HarvestConfig::load(file.path()).unwrap();
        assert!(config.require_complete);
    }

    #[test]
    fn test_load_missing_file() {
        let err = HarvestConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_http_settings_client_config() {
        let settings = HttpSettings {
            timeout_secs: 10,
            max_retries: 3,
            backoff: BackoffType::Constant,
            initial_backoff_ms: 200,
            max_backoff_secs: 2,
        };
        let config = settings.client_config();

        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_type, BackoffType::Constant);
        assert_eq!(config.initial_backoff, Duration::from_millis(200));
        assert_eq!(config.max_backoff, Duration::from_secs(2));
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_rate_limit_settings_conversion() {
        let settings = RateLimitSettings {
            min_interval_ms: 200,
            max_concurrent: 5,
        };
        let limiter = RateLimiterConfig::from(&settings);
        assert_eq!(limiter, RateLimiterConfig::new(Duration::from_millis(200), 5));
    }

    #[test]
    fn test_credentials() {
        let creds = Credentials::from_pairs([("GUPY_API_KEY", "abc"), ("BLANK", "  ")]);

        assert_eq!(creds.require("GUPY_API_KEY").unwrap(), "abc");
        assert!(creds.get("BLANK").is_none());

        let err = creds.require("LEVER_API_KEY").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCredential { variable } if variable == "LEVER_API_KEY"
        ));
    }

    #[test]
    fn test_credentials_debug_hides_values() {
        let creds = Credentials::from_pairs([("KEY", "secret")]);
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
