use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tc_data::ProviderConfig;
use tc_types::{config_error, MetricsConfig, TcResult, DEFAULT_PERIODS_PER_YEAR};

/// Service configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub provider: ProviderConfig,
    /// Origins allowed by CORS; the browser frontend runs on Vite's port.
    pub allowed_origins: Vec<String>,
    /// Defaults applied when a request leaves a parameter out.
    pub metrics: MetricsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            provider: ProviderConfig::Sample,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            metrics: MetricsConfig::default(),
        }
    }
}

fn lookup_str(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn lookup_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> TcResult<T> {
    match lookup_str(lookup, name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| config_error!("invalid value for {}: {}", name, raw)),
        None => Ok(default),
    }
}

impl ServerConfig {
    pub fn from_env() -> TcResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TcResult<Self> {
        let defaults = Self::default();

        let provider = ProviderConfig::from_kind(
            &lookup_str(&lookup, "TC_PROVIDER").unwrap_or_else(|| "sample".to_string()),
            PathBuf::from(lookup_str(&lookup, "TC_DATA_DIR").unwrap_or_else(|| "./data".to_string())),
            lookup_str(&lookup, "TC_CSV_PATTERN").unwrap_or_else(|| "{ticker}.csv".to_string()),
        )?;

        let allowed_origins = match lookup_str(&lookup, "TC_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_origins,
        };

        let metrics = MetricsConfig::default()
            .with_periods_per_year(lookup_parsed(&lookup, "TC_PERIODS_PER_YEAR", DEFAULT_PERIODS_PER_YEAR)?)
            .with_risk_free_rate(lookup_parsed(&lookup, "TC_RISK_FREE_RATE", 0.0)?);
        metrics.validate()?;

        Ok(Self {
            bind: lookup_str(&lookup, "TC_BIND").unwrap_or(defaults.bind),
            port: lookup_parsed(&lookup, "TC_PORT", defaults.port)?,
            provider,
            allowed_origins,
            metrics,
        })
    }

    pub fn socket_addr(&self) -> TcResult<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| config_error!("invalid bind address {}:{}: {}", self.bind, self.port, e))
    }
}
