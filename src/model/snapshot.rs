use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detail key carrying the checker's server name; never shown to the user.
pub const HIDDEN_DETAIL_KEY: &str = "server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Warning,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Display bucket for a host health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Success,
    Warning,
    Danger,
}

impl ScoreTier {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            ScoreTier::Success
        } else if score >= 70 {
            ScoreTier::Warning
        } else {
            ScoreTier::Danger
        }
    }
}

/// One status report as returned by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub overall_status: HealthStatus,
    #[serde(default)]
    pub total_healthy: u32,
    #[serde(default)]
    pub total_unhealthy: u32,
    #[serde(default)]
    pub total_unknown: u32,
    #[serde(default)]
    pub total_services: u32,
    /// Unix time of the last health check in seconds; `None` = never checked
    #[serde(default)]
    pub last_check_time: Option<f64>,
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default)]
    pub hosts: Vec<HostView>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HostView {
    pub host_name: String,
    #[serde(default)]
    pub host_type: String,
    #[serde(default)]
    pub host_address: Option<String>,
    #[serde(default)]
    pub health_status: HealthStatus,
    #[serde(default)]
    pub healthy_count: u32,
    #[serde(default)]
    pub unhealthy_count: u32,
    #[serde(default)]
    pub unknown_count: u32,
    #[serde(default)]
    pub total_services: u32,
    #[serde(default)]
    pub services: Vec<ServiceView>,
}

impl HostView {
    /// Percentage of healthy services, rounded half up. Zero for a host without services.
    pub fn health_score(&self) -> u32 {
        if self.total_services == 0 {
            return 0;
        }
        let healthy = u64::from(self.healthy_count);
        let total = u64::from(self.total_services);
        ((200 * healthy + total) / (2 * total)) as u32
    }

    pub fn score_tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.health_score())
    }

    /// Healthy fraction in `0.0..=1.0` for progress bars.
    pub fn healthy_fraction(&self) -> f32 {
        if self.total_services == 0 {
            0.0
        } else {
            (self.healthy_count as f32 / self.total_services as f32).clamp(0.0, 1.0)
        }
    }

    /// The configured address, or `None` when the host is the local machine.
    pub fn remote_address(&self) -> Option<&str> {
        self.host_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceView {
    pub name: String,
    #[serde(rename = "type", default)]
    pub service_type: String,
    #[serde(default)]
    pub status: HealthStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl ServiceView {
    /// Detail entries to show, without internal metadata.
    pub fn visible_details(&self) -> Vec<(&str, String)> {
        self.details
            .iter()
            .filter(|(key, _)| key.as_str() != HIDDEN_DETAIL_KEY)
            .map(|(key, value)| (key.as_str(), detail_text(value)))
            .collect()
    }
}

fn detail_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reply of `POST /api/refresh`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
