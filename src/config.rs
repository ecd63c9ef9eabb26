use crate::logic::RefreshSettings;
use clap::{CommandFactory, Parser};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "egui_service_monitor", version, about = "Service health dashboard")]
pub struct Config {
    /// Base URL of the monitoring server
    #[arg(long, env = "SERVICE_MONITOR_URL", default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Seconds between automatic refreshes
    #[arg(
        long,
        env = "SERVICE_MONITOR_REFRESH_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub refresh_period: u32,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout: u64,

    /// How long notifications stay visible, in seconds
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub notification_secs: u64,

    #[arg(long, default_value = "Service Monitor")]
    pub window_title: String,

    #[arg(long, default_value_t = 1200.0)]
    pub window_width: f32,

    #[arg(long, default_value_t = 800.0)]
    pub window_height: f32,
}

impl Config {
    /// Checks constraints that span several arguments.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.request_timeout > u64::from(self.refresh_period) {
            return Err(Config::command().error(
                clap::error::ErrorKind::ArgumentConflict,
                format!(
                    "--request-timeout ({}s) must not exceed --refresh-period ({}s)",
                    self.request_timeout, self.refresh_period
                ),
            ));
        }
        Ok(())
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            period_secs: self.refresh_period,
            notification_duration: Duration::from_secs(self.notification_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["egui_service_monitor"]).unwrap();
        assert_eq!(config.refresh_settings().period_secs, 30);
        assert_eq!(
            config.refresh_settings().notification_duration,
            Duration::from_secs(3)
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.window_width, 1200.0);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "egui_service_monitor",
            "--server-url",
            "http://10.0.0.2:8080",
            "--refresh-period",
            "15",
        ])
        .unwrap();
        assert_eq!(config.server_url, "http://10.0.0.2:8080");
        assert_eq!(config.refresh_period, 15);
    }

    #[test]
    fn test_timeout_longer_than_period_rejected() {
        let config = Config::try_parse_from(["egui_service_monitor", "--refresh-period", "5"]).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let config = Config::try_parse_from([
            "egui_service_monitor",
            "--refresh-period",
            "5",
            "--request-timeout",
            "5",
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::try_parse_from(["egui_service_monitor"]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_notification_duration_rejected() {
        assert!(Config::try_parse_from(["egui_service_monitor", "--notification-secs", "0"]).is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(Config::try_parse_from(["egui_service_monitor", "--refresh-period", "0"]).is_err());
    }
}
