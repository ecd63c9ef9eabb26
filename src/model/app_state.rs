use super::dashboard::DashboardView;
use super::notification::{NotificationKind, NotificationQueue};
use super::snapshot::{HostView, StatusSnapshot};
use std::time::{Duration, Instant};

/// Default auto-refresh period in seconds.
pub const REFRESH_PERIOD_SECS: u32 = 30;

/// State shared between the refresh controller and the UI.
#[derive(Debug, Clone)]
pub struct AppState {
    pub snapshot: Option<StatusSnapshot>,
    pub view: Option<DashboardView>,
    /// Seconds until the next automatic refresh
    pub countdown: u32,
    pub refresh_period: u32,
    /// Manual refreshes still running; the Refresh button is disabled while non-zero
    pub refreshes_in_flight: u32,
    pub fetches_in_flight: u32,
    pub last_applied_seq: u64,
    pub selected_host: Option<HostView>,
    pub notifications: NotificationQueue,
    pub initialized: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(REFRESH_PERIOD_SECS)
    }
}

impl AppState {
    pub fn new(refresh_period: u32) -> Self {
        let refresh_period = refresh_period.max(1);
        Self {
            snapshot: None,
            view: None,
            countdown: refresh_period,
            refresh_period,
            refreshes_in_flight: 0,
            fetches_in_flight: 0,
            last_applied_seq: 0,
            selected_host: None,
            notifications: NotificationQueue::default(),
            initialized: false,
        }
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notifications.set_duration(duration);
        self
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    pub fn reset_countdown(&mut self) {
        self.countdown = self.refresh_period;
    }

    /// Decrements the countdown. Returns true when it hit zero, in which case
    /// it has already been restarted at the full period.
    pub fn tick_countdown(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.reset_countdown();
            true
        } else {
            false
        }
    }

    /// Replaces the snapshot and rebuilds every derived view field in one step.
    pub fn apply_snapshot(&mut self, snapshot: StatusSnapshot) {
        self.view = Some(DashboardView::from_snapshot(&snapshot));
        self.snapshot = Some(snapshot);
        self.reset_countdown();
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.notifications.push(kind, message, Instant::now())
    }

    /// Opens the detail window for a host of the current view. Unknown names are ignored.
    pub fn open_host_detail(&mut self, host_name: &str) -> bool {
        let host = self
            .view
            .as_ref()
            .and_then(|view| view.host(host_name))
            .map(|card| card.host.clone());
        match host {
            Some(host) => {
                self.selected_host = Some(host);
                true
            }
            None => false,
        }
    }

    pub fn close_host_detail(&mut self) {
        self.selected_host = None;
    }
}
