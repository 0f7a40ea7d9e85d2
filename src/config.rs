use serde::Deserialize;

use crate::state::{DEFAULT_HEALTH_CAPACITY, DEFAULT_LOG_CAPACITY};

/// Env var that overrides `backend.host`.
pub const API_HOST_ENV: &str = "NEXUS_API_HOST";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub buffers: BufferConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout; a hung request counts as a failure.
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8001,
            request_timeout_ms: 10_000,
        }
    }
}

impl BackendConfig {
    /// API root, with the host taken from `NEXUS_API_HOST` when set.
    pub fn base_url(&self) -> String {
        let env_host = std::env::var(API_HOST_ENV).ok();
        let host = resolve_api_host(env_host.as_deref(), &self.host);
        format!("http://{}:{}/api", host, self.port)
    }
}

/// Picks the backend host: a non-empty env value wins over config; `localhost` means loopback.
pub fn resolve_api_host(env_host: Option<&str>, configured: &str) -> String {
    let host = env_host
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(configured);
    if host.eq_ignore_ascii_case("localhost") {
        "127.0.0.1".into()
    } else {
        host.to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub health_interval_ms: u64,
    /// Chance per tick of also refreshing the wealth snapshot (0.0..=1.0).
    pub wealth_refresh_probability: f64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            health_interval_ms: 3_000,
            wealth_refresh_probability: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub health_capacity: usize,
    pub log_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            health_capacity: DEFAULT_HEALTH_CAPACITY,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.backend.host.trim().is_empty(),
            "backend.host must be non-empty"
        );
        anyhow::ensure!(
            self.backend.port > 0,
            "backend.port must be between 1 and 65535, got {}",
            self.backend.port
        );
        anyhow::ensure!(
            self.backend.request_timeout_ms > 0,
            "backend.request_timeout_ms must be > 0, got {}",
            self.backend.request_timeout_ms
        );
        anyhow::ensure!(
            self.polling.health_interval_ms > 0,
            "polling.health_interval_ms must be > 0, got {}",
            self.polling.health_interval_ms
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.polling.wealth_refresh_probability),
            "polling.wealth_refresh_probability must be within 0.0..=1.0, got {}",
            self.polling.wealth_refresh_probability
        );
        anyhow::ensure!(
            self.buffers.health_capacity > 0,
            "buffers.health_capacity must be > 0, got {}",
            self.buffers.health_capacity
        );
        anyhow::ensure!(
            self.buffers.log_capacity > 0,
            "buffers.log_capacity must be > 0, got {}",
            self.buffers.log_capacity
        );
        anyhow::ensure!(
            !self.view.host.trim().is_empty(),
            "view.host must be non-empty"
        );
        anyhow::ensure!(
            self.view.port > 0,
            "view.port must be between 1 and 65535, got {}",
            self.view.port
        );
        Ok(())
    }
}
