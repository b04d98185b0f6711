//! Application configuration
//!
//! TOML file pointed at by `SITEMET_CONFIG` (default `config.toml`), with
//! defaults for everything but the site registry and provider credentials.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A monitored site as configured. Coordinates and timezone are optional
/// here; queries against an incomplete site degrade at the engine level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone name, e.g. "Australia/Perth".
    pub timezone: Option<String>,
    /// Place id for the current-conditions provider.
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalProviderConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentProviderConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    pub historical: Option<HistoricalProviderConfig>,
    pub current: Option<CurrentProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
    /// Hours a reading must age before it counts as final. Zero or
    /// negative disables the filter.
    pub confirmation_horizon_hours: Option<i64>,
    pub providers: Option<ProvidersConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from the SITEMET_CONFIG path (TOML) if present,
    /// with reasonable defaults otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SITEMET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let cfg = if path.as_ref().exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.http
            .as_ref()
            .and_then(|h| h.bind.clone())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    /// Confirmation horizon as a duration (default 6 hours).
    pub fn confirmation_horizon(&self) -> Duration {
        Duration::hours(self.confirmation_horizon_hours.unwrap_or(6))
    }

    pub fn site(&self, id: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn historical_base_url(&self) -> String {
        self.providers
            .as_ref()
            .and_then(|p| p.historical.as_ref())
            .and_then(|h| h.base_url.clone())
            .unwrap_or_else(|| "https://meteostat.p.rapidapi.com".to_string())
    }

    pub fn historical_api_key(&self) -> String {
        self.providers
            .as_ref()
            .and_then(|p| p.historical.as_ref())
            .and_then(|h| h.api_key.clone())
            .unwrap_or_default()
    }

    pub fn historical_api_host(&self) -> String {
        self.providers
            .as_ref()
            .and_then(|p| p.historical.as_ref())
            .and_then(|h| h.api_host.clone())
            .unwrap_or_else(|| "meteostat.p.rapidapi.com".to_string())
    }

    pub fn current_base_url(&self) -> String {
        self.providers
            .as_ref()
            .and_then(|p| p.current.as_ref())
            .and_then(|c| c.base_url.clone())
            .unwrap_or_else(|| "https://www.meteosource.com/api/v1/free".to_string())
    }

    pub fn current_api_key(&self) -> String {
        self.providers
            .as_ref()
            .and_then(|p| p.current.as_ref())
            .and_then(|c| c.api_key.clone())
            .unwrap_or_default()
    }
}
