use eframe::egui;
use egui_kittest::Harness;
use egui_kittest::kittest::Queryable;
use egui_service_monitor::app::StatusBoard;
use egui_service_monitor::logic::{Command, RefreshSettings, SharedState, lock_state, new_shared_state};
use egui_service_monitor::model::*;
use tokio::sync::mpsc;
use tr::tr;

// --- Helper ---

fn example_snapshot(hosts: Vec<HostView>) -> StatusSnapshot {
    StatusSnapshot {
        overall_status: HealthStatus::Healthy,
        total_healthy: 3,
        total_unhealthy: 0,
        total_unknown: 0,
        hosts,
        ..StatusSnapshot::default()
    }
}

fn web1() -> HostView {
    HostView {
        host_name: "web1".to_string(),
        host_type: "SSH remote host".to_string(),
        host_address: None,
        health_status: HealthStatus::Healthy,
        healthy_count: 4,
        unhealthy_count: 0,
        unknown_count: 0,
        total_services: 4,
        services: vec![ServiceView {
            name: "nginx".to_string(),
            service_type: "docker".to_string(),
            status: HealthStatus::Healthy,
            message: "container running".to_string(),
            details: [
                ("server".to_string(), serde_json::json!("web1")),
                ("image".to_string(), serde_json::json!("nginx:1.25")),
            ]
            .into_iter()
            .collect(),
        }],
    }
}

fn make_board(snapshot: Option<StatusSnapshot>) -> (SharedState, mpsc::UnboundedReceiver<Command>, StatusBoard) {
    let state = new_shared_state(&RefreshSettings::default());
    if let Some(snapshot) = snapshot {
        lock_state(&state).apply_snapshot(snapshot);
    }
    let (tx, rx) = mpsc::unbounded_channel();
    let board = StatusBoard::from_state(state.clone(), tx);
    (state, rx, board)
}

// === Loading and empty state ===

#[test]
fn test_loading_before_first_snapshot() {
    let (_state, _rx, mut app) = make_board(None);
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label(&tr!("Loading..."));
    harness.get_by_label_contains("--");
}

#[test]
fn test_empty_host_list_shows_empty_state() {
    let (_state, _rx, mut app) = make_board(Some(example_snapshot(vec![])));
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label(&tr!("No host data"));
    assert!(harness.query_by_label(&tr!("Details")).is_none());
}

// === Overview and host cards ===

#[test]
fn test_host_card_and_counters() {
    let (_state, _rx, mut app) = make_board(Some(example_snapshot(vec![web1()])));
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label("web1");
    harness.get_by_label("100%");
    harness.get_by_label("3/0/0");
    harness.get_by_label("Healthy: 3");
    harness.get_by_label("Hosts: 1");
    harness.get_by_label(&tr!("Local host"));
    harness.get_by_label("Auto refresh in 30s");
    assert!(harness.query_by_label(&tr!("No host data")).is_none());
}

#[test]
fn test_countdown_label_follows_state() {
    let (state, _rx, mut app) = make_board(Some(example_snapshot(vec![web1()])));
    lock_state(&state).countdown = 7;
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.run();

    harness.get_by_label("Auto refresh in 7s");
}

// === Refresh button ===

#[test]
fn test_refresh_button_sends_command() {
    let (_state, mut rx, mut app) = make_board(Some(example_snapshot(vec![web1()])));
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label(&tr!("Refresh")).click();
    harness.run();
    drop(harness);

    assert_eq!(rx.try_recv().ok(), Some(Command::ManualRefresh));
}

#[test]
fn test_refresh_button_disabled_while_in_flight() {
    let (state, mut rx, mut app) = make_board(Some(example_snapshot(vec![web1()])));
    lock_state(&state).refreshes_in_flight = 1;
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label(&tr!("Refreshing...")).click();
    harness.run();
    assert!(rx.try_recv().is_err());

    // Same position, enabled again.
    lock_state(&state).refreshes_in_flight = 0;
    harness.run();
    harness.get_by_label(&tr!("Refresh")).click();
    harness.run();
    assert_eq!(rx.try_recv().ok(), Some(Command::ManualRefresh));
}

// === Host detail window ===

#[test]
fn test_details_open_and_close() {
    let (state, _rx, mut app) = make_board(Some(example_snapshot(vec![web1()])));
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label(&tr!("Details")).click();
    harness.run();
    assert_eq!(
        lock_state(&state).selected_host.as_ref().map(|h| h.host_name.clone()),
        Some("web1".to_string())
    );

    harness.run();
    harness.get_by_label(&tr!("Connection info"));
    harness.get_by_label("container running");
    harness.get_by_label("image: nginx:1.25");
    assert!(harness.query_by_label_contains("server: web1").is_none());

    harness.get_by_label(&tr!("Close")).click();
    harness.run();
    assert!(lock_state(&state).selected_host.is_none());
}

#[test]
fn test_detail_window_without_services() {
    let mut host = web1();
    host.services.clear();
    host.total_services = 0;
    host.healthy_count = 0;
    let (state, _rx, mut app) = make_board(Some(example_snapshot(vec![host])));
    lock_state(&state).open_host_detail("web1");

    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label(&tr!("No services on this host"));
    harness.get_by_label("0%");
}

// === Notifications ===

#[test]
fn test_notification_shown_and_dismissed() {
    let (state, _rx, mut app) = make_board(Some(example_snapshot(vec![web1()])));
    lock_state(&state).notify(NotificationKind::Error, "Refresh failed: timeout");

    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1200.0, 800.0));
    harness.run();

    harness.get_by_label("Refresh failed: timeout");
    harness.get_by_label("x").click();
    harness.run();

    assert!(lock_state(&state).notifications.is_empty());
    assert!(harness.query_by_label("Refresh failed: timeout").is_none());
}
