use super::source::StatusSource;
use crate::error::FetchError;
use crate::model::{AppState, NotificationKind, REFRESH_PERIOD_SECS, StatusSnapshot};
use crate::model::notification::NOTIFICATION_DURATION;
use eframe::egui;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tr::tr;

pub type SharedState = Arc<Mutex<AppState>>;

/// Requests sent from the UI to the controller task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ManualRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub period_secs: u32,
    pub notification_duration: Duration,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            period_secs: REFRESH_PERIOD_SECS,
            notification_duration: NOTIFICATION_DURATION,
        }
    }
}

pub fn new_shared_state(settings: &RefreshSettings) -> SharedState {
    Arc::new(Mutex::new(
        AppState::new(settings.period_secs).with_notification_duration(settings.notification_duration),
    ))
}

/// Locks the shared state. A poisoned lock is recovered: every mutation
/// leaves the state consistent before it can panic.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps [`AppState`] in sync with a [`StatusSource`].
pub struct RefreshController {
    state: SharedState,
    source: Arc<dyn StatusSource>,
    fetch_seq: AtomicU64,
    repaint: Option<egui::Context>,
}

impl RefreshController {
    pub fn new(state: SharedState, source: Arc<dyn StatusSource>) -> Self {
        Self {
            state,
            source,
            fetch_seq: AtomicU64::new(0),
            repaint: None,
        }
    }

    /// Requests a repaint of `ctx` after every state change.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Starts the first fetch and arms the countdown. Only the first call has any effect.
    pub fn initialize(self: &Arc<Self>) -> bool {
        {
            let mut state = lock_state(&self.state);
            if state.initialized {
                tracing::warn!("refresh controller already initialized");
                return false;
            }
            state.initialized = true;
            state.reset_countdown();
        }
        tracing::info!("refresh controller initialized");
        self.spawn_fetch();
        true
    }

    /// One-second timer step. Returns true when an automatic refresh is due;
    /// the countdown has then already restarted.
    pub fn tick(&self) -> bool {
        let due = lock_state(&self.state).tick_countdown();
        self.request_repaint();
        due
    }

    /// Starts an automatic refresh unless a fetch is still running.
    pub fn start_auto_refresh(self: &Arc<Self>) -> bool {
        let busy = lock_state(&self.state).fetches_in_flight > 0;
        if busy {
            tracing::debug!("automatic refresh skipped, fetch still in flight");
            return false;
        }
        self.spawn_fetch();
        true
    }

    fn spawn_fetch(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let _ = controller.fetch_and_render().await;
        });
    }

    /// Fetches a snapshot and, on success, replaces the view with it. On
    /// failure the current view is left as it was and one notification is raised.
    pub async fn fetch_and_render(&self) -> Result<(), FetchError> {
        let result = self.fetch_snapshot().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, kind = ?e.kind(), "failed to load status");
            self.notify(
                NotificationKind::Error,
                format!("{}: {}", tr!("Failed to load status"), e),
            );
        }
        result
    }

    /// User-triggered refresh: asks the server to re-run checks, then reloads.
    pub async fn manual_refresh(&self) -> Result<(), FetchError> {
        lock_state(&self.state).refreshes_in_flight += 1;
        self.request_repaint();

        let result = self.refresh_and_fetch().await;

        {
            let mut state = lock_state(&self.state);
            state.refreshes_in_flight = state.refreshes_in_flight.saturating_sub(1);
            match &result {
                Ok(()) => {
                    state.reset_countdown();
                    state.notify(NotificationKind::Success, tr!("Refresh succeeded"));
                }
                Err(e) => {
                    tracing::warn!(error = %e, kind = ?e.kind(), "manual refresh failed");
                    state.notify(
                        NotificationKind::Error,
                        format!("{}: {}", tr!("Refresh failed"), e),
                    );
                }
            }
        }
        self.request_repaint();
        result
    }

    async fn refresh_and_fetch(&self) -> Result<(), FetchError> {
        let outcome = self.source.trigger_refresh().await?;
        if !outcome.success {
            return Err(FetchError::Application(
                outcome.message.unwrap_or_else(|| tr!("unknown error")),
            ));
        }
        if let Some(message) = &outcome.message {
            tracing::info!(message = %message, "server refreshed");
        }
        self.fetch_snapshot().await
    }

    async fn fetch_snapshot(&self) -> Result<(), FetchError> {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        lock_state(&self.state).fetches_in_flight += 1;

        let result = self.source.fetch_status().await;

        let outcome = {
            let mut state = lock_state(&self.state);
            state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
            result.map(|snapshot| {
                if seq > state.last_applied_seq {
                    log_snapshot(seq, &snapshot);
                    state.apply_snapshot(snapshot);
                    state.last_applied_seq = seq;
                } else {
                    tracing::debug!(seq, applied = state.last_applied_seq, "discarding stale snapshot");
                }
            })
        };
        self.request_repaint();
        outcome
    }

    /// Initializes, then ticks every second and serves UI commands until the
    /// command channel closes.
    pub async fn run(self: Arc<Self>, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.initialize();

        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if self.tick() {
                        self.start_auto_refresh();
                    }
                }
                command = commands.recv() => match command {
                    Some(Command::ManualRefresh) => {
                        let controller = Arc::clone(&self);
                        tokio::spawn(async move {
                            let _ = controller.manual_refresh().await;
                        });
                    }
                    None => break,
                },
            }
        }
        tracing::info!("refresh controller stopped");
    }

    fn notify(&self, kind: NotificationKind, message: String) {
        lock_state(&self.state).notify(kind, message);
        self.request_repaint();
    }

    fn request_repaint(&self) {
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

fn log_snapshot(seq: u64, snapshot: &StatusSnapshot) {
    tracing::info!(
        seq,
        hosts = snapshot.hosts.len(),
        healthy = snapshot.total_healthy,
        unhealthy = snapshot.total_unhealthy,
        unknown = snapshot.total_unknown,
        "status snapshot applied"
    );
    if snapshot.total_unhealthy > 0 {
        tracing::warn!(unhealthy = snapshot.total_unhealthy, "unhealthy services reported");
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
