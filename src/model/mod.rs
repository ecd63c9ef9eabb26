pub mod app_state;
pub mod dashboard;
pub mod notification;
pub mod snapshot;

pub use app_state::{AppState, REFRESH_PERIOD_SECS};
pub use dashboard::{AggregateCounters, DashboardView, HostCard, NEVER_CHECKED};
pub use notification::{Notification, NotificationKind, NotificationQueue};
pub use snapshot::{HealthStatus, HostView, RefreshOutcome, ScoreTier, ServiceView, StatusSnapshot};
