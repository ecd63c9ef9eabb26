use crate::config::Config;
use crate::error::StartupError;
use crate::logic::{Command, HttpStatusClient, RefreshController, SharedState, lock_state, new_shared_state};
use crate::model::{
    DashboardView, HealthStatus, HostCard, HostView, NEVER_CHECKED, Notification, NotificationKind,
    ScoreTier,
};
use eframe::egui;
use eframe::egui::{Color32, RichText};
use egui_extras::{Column, TableBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tr::tr;

const CARD_WIDTH: f32 = 220.0;

pub struct StatusBoard {
    pub(crate) state: SharedState,
    commands: mpsc::UnboundedSender<Command>,
}

/// What the user asked for during a frame; applied after drawing.
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    Refresh,
    OpenHost(String),
    CloseDetail,
    Dismiss(u64),
}

/// Everything a frame draws, copied out of the shared state.
struct FrameState {
    view: Option<DashboardView>,
    countdown: u32,
    refresh_in_flight: bool,
    selected_host: Option<HostView>,
    notifications: Vec<Notification>,
}

/// Helper for application-specific colors adapted for light/dark themes.
struct StatusVisuals {
    pub is_dark: bool,
}

impl StatusVisuals {
    fn from_ctx(ctx: &egui::Context) -> Self {
        Self {
            is_dark: ctx.style().visuals.dark_mode,
        }
    }

    fn success(&self) -> Color32 {
        Color32::from_rgb(0, 158, 115) // Bluish green
    }

    fn warning(&self) -> Color32 {
        if self.is_dark {
            Color32::from_rgb(240, 228, 66) // Yellow
        } else {
            Color32::from_rgb(230, 159, 0) // Orange
        }
    }

    fn danger(&self) -> Color32 {
        Color32::from_rgb(213, 94, 0) // Vermilion
    }

    fn muted(&self) -> Color32 {
        if self.is_dark {
            Color32::from_gray(150)
        } else {
            Color32::from_gray(110)
        }
    }

    fn tier_color(&self, tier: ScoreTier) -> Color32 {
        match tier {
            ScoreTier::Success => self.success(),
            ScoreTier::Warning => self.warning(),
            ScoreTier::Danger => self.danger(),
        }
    }

    fn status_color(&self, status: HealthStatus) -> Color32 {
        match status {
            HealthStatus::Healthy => self.success(),
            HealthStatus::Unhealthy => self.danger(),
            HealthStatus::Warning => self.warning(),
            HealthStatus::Unknown => self.muted(),
        }
    }

    fn notification_color(&self, kind: NotificationKind) -> Color32 {
        match kind {
            NotificationKind::Success => self.success(),
            NotificationKind::Error => self.danger(),
            NotificationKind::Info => Color32::from_rgb(86, 180, 233), // Sky Blue
        }
    }
}

fn status_text(status: HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => tr!("Healthy"),
        HealthStatus::Unhealthy => tr!("Unhealthy"),
        HealthStatus::Warning => tr!("Warning"),
        HealthStatus::Unknown => tr!("Unknown"),
    }
}

fn status_icon(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "✔",
        HealthStatus::Unhealthy => "✖",
        HealthStatus::Warning => "⚠",
        HealthStatus::Unknown => "?",
    }
}

fn status_badge(visuals: &StatusVisuals, status: HealthStatus) -> RichText {
    RichText::new(format!("{} {}", status_icon(status), status_text(status)))
        .strong()
        .color(visuals.status_color(status))
}

fn host_address_text(host: &HostView) -> String {
    host.remote_address()
        .map(str::to_string)
        .unwrap_or_else(|| tr!("Local host"))
}

impl StatusBoard {
    /// Builds the dashboard and starts the refresh controller on its own runtime thread.
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config) -> Result<Self, StartupError> {
        let settings = config.refresh_settings();
        let state = new_shared_state(&settings);
        let source = Arc::new(HttpStatusClient::new(
            &config.server_url,
            config.request_timeout(),
        )?);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (commands, receiver) = mpsc::unbounded_channel();
        let controller = Arc::new(
            RefreshController::new(state.clone(), source).with_repaint(cc.egui_ctx.clone()),
        );
        std::thread::Builder::new()
            .name("status-refresh".to_string())
            .spawn(move || runtime.block_on(controller.run(receiver)))?;

        tracing::info!(
            url = %config.server_url,
            period = settings.period_secs,
            "dashboard started"
        );
        Ok(Self::from_state(state, commands))
    }

    pub fn from_state(state: SharedState, commands: mpsc::UnboundedSender<Command>) -> Self {
        Self { state, commands }
    }

    fn capture_frame(&self) -> FrameState {
        let mut state = lock_state(&self.state);
        state.notifications.prune(Instant::now());
        FrameState {
            view: state.view.clone(),
            countdown: state.countdown,
            refresh_in_flight: state.is_refreshing(),
            selected_host: state.selected_host.clone(),
            notifications: state.notifications.active().to_vec(),
        }
    }

    pub fn ui_layout(&mut self, ctx: &egui::Context) {
        let frame = self.capture_frame();
        let visuals = StatusVisuals::from_ctx(ctx);
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("overview").show(ctx, |ui| {
            overview_ui(ui, &frame, &visuals, &mut actions);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match &frame.view {
                None => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.label(tr!("Loading..."));
                    });
                }
                Some(view) if view.show_empty_state => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.label(RichText::new(tr!("No host data")).heading());
                    });
                }
                Some(view) => {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = egui::vec2(12.0, 12.0);
                        for card in &view.hosts {
                            if host_card_ui(ui, card, &visuals) {
                                actions.push(UiAction::OpenHost(card.host.host_name.clone()));
                            }
                        }
                    });
                }
            });
        });

        if let Some(host) = &frame.selected_host {
            host_detail_window(ctx, host, &visuals, &mut actions);
        }

        notifications_ui(ctx, &frame.notifications, &visuals, &mut actions);

        self.apply(actions);
    }

    fn apply(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Refresh => {
                    if self.commands.send(Command::ManualRefresh).is_err() {
                        tracing::warn!("refresh controller is not running");
                    }
                }
                UiAction::OpenHost(name) => {
                    lock_state(&self.state).open_host_detail(&name);
                }
                UiAction::CloseDetail => lock_state(&self.state).close_host_detail(),
                UiAction::Dismiss(id) => {
                    lock_state(&self.state).notifications.dismiss(id);
                }
            }
        }
    }
}

fn overview_ui(
    ui: &mut egui::Ui,
    frame: &FrameState,
    visuals: &StatusVisuals,
    actions: &mut Vec<UiAction>,
) {
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.heading(tr!("Service Monitor"));
        if let Some(view) = &frame.view {
            ui.label(status_badge(visuals, view.overall_status));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if frame.refresh_in_flight {
                tr!("Refreshing...")
            } else {
                tr!("Refresh")
            };
            if ui
                .add_enabled(!frame.refresh_in_flight, egui::Button::new(label))
                .clicked()
            {
                actions.push(UiAction::Refresh);
            }
            ui.label(format!("{} {}s", tr!("Auto refresh in"), frame.countdown));

            let mut theme = ui.ctx().options(|o| o.theme_preference);
            let old_theme = theme;
            theme.radio_buttons(ui);
            if theme != old_theme {
                ui.ctx().options_mut(|o| o.theme_preference = theme);
            }
        });
    });

    ui.horizontal(|ui| {
        let last_update = match &frame.view {
            Some(view) => {
                let counters = view.counters;
                ui.colored_label(
                    visuals.success(),
                    format!("{}: {}", tr!("Healthy"), counters.healthy),
                );
                ui.colored_label(
                    visuals.danger(),
                    format!("{}: {}", tr!("Unhealthy"), counters.unhealthy),
                );
                ui.colored_label(
                    visuals.warning(),
                    format!("{}: {}", tr!("Unknown"), counters.unknown),
                );
                ui.label(format!("{}: {}", tr!("Hosts"), counters.hosts));
                ui.separator();
                ui.label(RichText::new(counters.summary()).monospace())
                    .on_hover_text(tr!("healthy / unhealthy / unknown"));
                view.last_update.as_str()
            }
            None => NEVER_CHECKED,
        };
        ui.separator();
        ui.label(format!("{}: {}", tr!("Last update"), last_update));
    });
    ui.add_space(4.0);
}

/// Draws one host card. Returns true when the card or its Details button was clicked.
fn host_card_ui(ui: &mut egui::Ui, card: &HostCard, visuals: &StatusVisuals) -> bool {
    let host = &card.host;
    let id = egui::Id::new("host_card").with(&host.host_name);
    let mut details_clicked = false;

    let response = ui
        .scope_builder(
            egui::UiBuilder::new().id_salt(id).sense(egui::Sense::click()),
            |ui| {
                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(12))
                    .stroke(egui::Stroke::new(1.5, visuals.status_color(host.health_status)))
                    .show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(&host.host_name).strong().size(16.0));
                            ui.label(
                                RichText::new(format!("{}%", card.health_score))
                                    .size(28.0)
                                    .strong()
                                    .color(visuals.tier_color(card.tier)),
                            );
                            ui.add(
                                egui::ProgressBar::new(card.healthy_fraction)
                                    .desired_width(CARD_WIDTH)
                                    .fill(visuals.success()),
                            );
                            ui.add_space(6.0);
                            ui.columns(3, |cols| {
                                cols[0].vertical_centered(|ui| {
                                    ui.colored_label(visuals.success(), host.healthy_count.to_string());
                                    ui.small(tr!("healthy"));
                                });
                                cols[1].vertical_centered(|ui| {
                                    ui.colored_label(visuals.danger(), host.unhealthy_count.to_string());
                                    ui.small(tr!("unhealthy"));
                                });
                                cols[2].vertical_centered(|ui| {
                                    ui.colored_label(visuals.warning(), host.unknown_count.to_string());
                                    ui.small(tr!("unknown"));
                                });
                            });
                            ui.add_space(6.0);
                            ui.label(RichText::new(&host.host_type).small().strong());
                            ui.label(RichText::new(host_address_text(host)).small().color(visuals.muted()));
                            ui.add_space(6.0);
                            if ui.button(tr!("Details")).clicked() {
                                details_clicked = true;
                            }
                        });
                    });
            },
        )
        .response;

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    details_clicked || response.clicked()
}

fn host_detail_window(
    ctx: &egui::Context,
    host: &HostView,
    visuals: &StatusVisuals,
    actions: &mut Vec<UiAction>,
) {
    let mut open = true;
    let window_res = egui::Window::new(tr!("Host Details"))
        .id(egui::Id::new("host_detail"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(620.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&host.host_name);
                ui.label(status_badge(visuals, host.health_status));
            });
            ui.label(format!(
                "{} · {} · {} {}",
                host.host_type,
                host_address_text(host),
                host.total_services,
                tr!("services")
            ));
            ui.separator();

            ui.strong(tr!("Services"));
            if host.services.is_empty() {
                ui.label(RichText::new(tr!("No services on this host")).color(visuals.muted()));
            } else {
                services_table(ui, host, visuals);
            }

            ui.separator();
            ui.strong(tr!("Connection info"));
            egui::Grid::new("connection_info")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    ui.label(tr!("Host name:"));
                    ui.label(&host.host_name);
                    ui.end_row();
                    ui.label(tr!("Type:"));
                    ui.label(&host.host_type);
                    ui.end_row();
                    ui.label(tr!("Address:"));
                    ui.label(host_address_text(host));
                    ui.end_row();
                    ui.label(tr!("Service count:"));
                    ui.label(host.total_services.to_string());
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.button(tr!("Close")).clicked()
        });

    let close_clicked = window_res.and_then(|res| res.inner).unwrap_or(false);
    if !open || close_clicked {
        actions.push(UiAction::CloseDetail);
    }
}

fn services_table(ui: &mut egui::Ui, host: &HostView, visuals: &StatusVisuals) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(tr!("Status"));
            });
            header.col(|ui| {
                ui.strong(tr!("Name"));
            });
            header.col(|ui| {
                ui.strong(tr!("Type"));
            });
            header.col(|ui| {
                ui.strong(tr!("Message"));
            });
        })
        .body(|mut body| {
            for service in &host.services {
                let details = service.visible_details();
                let height = if details.is_empty() { 24.0 } else { 44.0 };
                body.row(height, |mut row| {
                    row.col(|ui| {
                        ui.label(status_badge(visuals, service.status));
                    });
                    row.col(|ui| {
                        ui.label(&service.name);
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&service.service_type).monospace());
                    });
                    row.col(|ui| {
                        ui.vertical(|ui| {
                            ui.label(&service.message);
                            if !details.is_empty() {
                                ui.horizontal_wrapped(|ui| {
                                    for (key, value) in &details {
                                        ui.label(
                                            RichText::new(format!("{key}: {value}"))
                                                .small()
                                                .color(visuals.muted()),
                                        );
                                    }
                                });
                            }
                        });
                    });
                });
            }
        });
}

fn notifications_ui(
    ctx: &egui::Context,
    notifications: &[Notification],
    visuals: &StatusVisuals,
    actions: &mut Vec<UiAction>,
) {
    if notifications.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-20.0, 20.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for notification in notifications {
                let color = visuals.notification_color(notification.kind);
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.5, color))
                    .inner_margin(egui::Margin::same(10))
                    .show(ui, |ui| {
                        ui.set_min_width(300.0);
                        ui.horizontal(|ui| {
                            ui.colored_label(color, RichText::new(&notification.message).strong());
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("x").clicked() {
                                    actions.push(UiAction::Dismiss(notification.id));
                                }
                            });
                        });
                    });
                ui.add_space(6.0);
            }
        });
}

impl eframe::App for StatusBoard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_layout(ctx);
        let has_notifications = !lock_state(&self.state).notifications.is_empty();
        let next = if has_notifications {
            Duration::from_millis(250)
        } else {
            Duration::from_millis(1000)
        };
        ctx.request_repaint_after(next);
    }
}
