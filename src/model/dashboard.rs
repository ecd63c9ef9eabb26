use super::snapshot::{HealthStatus, HostView, ScoreTier, StatusSnapshot};
use std::collections::HashMap;

/// Placeholder shown when the backend has never run a check.
pub const NEVER_CHECKED: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateCounters {
    pub healthy: u32,
    pub unhealthy: u32,
    pub unknown: u32,
    pub hosts: usize,
}

impl AggregateCounters {
    /// `healthy/unhealthy/unknown`
    pub fn summary(&self) -> String {
        format!("{}/{}/{}", self.healthy, self.unhealthy, self.unknown)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostCard {
    pub host: HostView,
    pub health_score: u32,
    pub tier: ScoreTier,
    pub healthy_fraction: f32,
}

impl HostCard {
    fn new(host: &HostView) -> Self {
        Self {
            health_score: host.health_score(),
            tier: host.score_tier(),
            healthy_fraction: host.healthy_fraction(),
            host: host.clone(),
        }
    }
}

/// Everything the renderer needs, derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub overall_status: HealthStatus,
    pub counters: AggregateCounters,
    pub hosts: Vec<HostCard>,
    pub last_update: String,
    pub show_empty_state: bool,
    index: HashMap<String, usize>,
}

impl DashboardView {
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let hosts: Vec<HostCard> = snapshot.hosts.iter().map(HostCard::new).collect();
        let index = hosts
            .iter()
            .enumerate()
            .map(|(i, card)| (card.host.host_name.clone(), i))
            .collect();

        Self {
            overall_status: snapshot.overall_status,
            counters: AggregateCounters {
                healthy: snapshot.total_healthy,
                unhealthy: snapshot.total_unhealthy,
                unknown: snapshot.total_unknown,
                hosts: hosts.len(),
            },
            show_empty_state: hosts.is_empty(),
            last_update: format_check_time(snapshot.last_check_time),
            hosts,
            index,
        }
    }

    pub fn host(&self, host_name: &str) -> Option<&HostCard> {
        self.index.get(host_name).and_then(|&i| self.hosts.get(i))
    }
}

/// Formats a Unix timestamp (seconds) in local time.
pub fn format_check_time(timestamp: Option<f64>) -> String {
    let Some(ts) = timestamp.filter(|ts| ts.is_finite() && *ts > 0.0) else {
        return NEVER_CHECKED.to_string();
    };
    let secs = ts.trunc() as i64;
    let nanos = (ts.fract() * 1e9) as u32;
    match chrono::DateTime::from_timestamp(secs, nanos) {
        Some(utc) => utc
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => NEVER_CHECKED.to_string(),
    }
}
