// Health poll payload, recorded samples and connectivity status

use serde::{Deserialize, Serialize};

/// CPU value shown when the backend omits `cpu` from a health reply.
pub const CPU_PLACEHOLDER_PERCENT: f64 = 1.2;

/// Body of GET /api/health. Extra fields (`is_online`, `timestamp`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthReading {
    pub cpu: Option<f64>,
    pub ram: Option<f64>,
}

impl HealthReading {
    pub fn cpu_percent(&self) -> f64 {
        self.cpu.unwrap_or(CPU_PLACEHOLDER_PERCENT)
    }

    pub fn ram_percent(&self) -> f64 {
        self.ram.unwrap_or(0.0)
    }
}

/// Latest gauge values (CPU and RAM percent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentHealth {
    pub cpu: f64,
    pub ram: f64,
}

/// One successful health poll, kept in the bounded chart history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSample {
    /// Unix millis when the reply was received.
    pub timestamp: u64,
    pub cpu_percent: f64,
    pub ram_percent: f64,
}

/// Backend reachability as seen by the health poll; serializes to lowercase JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    #[default]
    Online,
    Offline,
}

impl ConnectivityStatus {
    pub fn is_online(self) -> bool {
        self == ConnectivityStatus::Online
    }
}

impl std::fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectivityStatus::Online => f.write_str("online"),
            ConnectivityStatus::Offline => f.write_str("offline"),
        }
    }
}
