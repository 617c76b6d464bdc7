//! Main application window: video list, player controls, violation
//! timeline and tables.
//!
//! Fetch results and playback notifications are applied on the UI thread at
//! the start of every frame; widgets then render from the session and report
//! input as [`UiAction`]s that are applied once the frame is laid out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel;
use eframe::{App, CreationContext};
use egui::{Context, Key, Modifiers, RichText};
use tokio::sync::mpsc;

use crate::api::{Backend, Endpoints, FetchError};
use crate::config::Config;
use crate::core::time::format_clock;
use crate::core::violation::{VideoMetadata, ViolationRecord};
use crate::playback::{ClockPlayer, MediaPlayer, PLAYBACK_RATES};
use crate::poller::{PollUpdate, Pollers, Wake};
use crate::session::{Session, Shortcut};
use crate::store::Notifications;
use crate::ui::view_model::time_readout;
use crate::ui::{level_color, status_color, tables, timeline_view, UiAction};

/// How long an activated violation stays emphasised
const HIGHLIGHT_FOR: Duration = Duration::from_millis(1500);
/// Repaint cadence, which is also the host's time-update granularity
const REPAINT_PLAYING: Duration = Duration::from_millis(100);
const REPAINT_IDLE: Duration = Duration::from_millis(250);

/// Keyboard shortcut bound to a key press, if any
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    match key {
        Key::Space => Some(Shortcut::TogglePlay),
        Key::ArrowLeft => Some(Shortcut::SkipBack),
        Key::ArrowRight => Some(Shortcut::SkipForward),
        Key::F if modifiers.ctrl || modifiers.command => Some(Shortcut::ToggleFullscreen),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Player,
    Overview,
}

/// Transient emphasis of the violation last jumped to
struct Highlight {
    record: ViolationRecord,
    until: Instant,
}

/// Fetches video metadata off the UI thread
struct MetadataFetcher {
    runtime: tokio::runtime::Handle,
    backend: Arc<dyn Backend>,
    tx: channel::Sender<(String, Result<VideoMetadata, FetchError>)>,
    rx: channel::Receiver<(String, Result<VideoMetadata, FetchError>)>,
}

impl MetadataFetcher {
    fn new(runtime: tokio::runtime::Handle, backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            runtime,
            backend,
            tx,
            rx,
        }
    }

    fn request(&self, name: String, ctx: Context) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = backend.fetch_video_metadata(&name).await;
            // The app may already be gone
            let _ = tx.send((name, result));
            ctx.request_repaint();
        });
    }
}

pub struct MonitorApp {
    session: Session<ClockPlayer>,
    updates: mpsc::Receiver<PollUpdate>,
    metadata: MetadataFetcher,
    _pollers: Pollers,
    search: String,
    highlight: Option<Highlight>,
    tab: Tab,
    fullscreen: bool,
}

impl MonitorApp {
    /// Build the app and start polling.
    ///
    /// Called by eframe during application initialization.
    pub fn new(
        cc: &CreationContext<'_>,
        runtime: tokio::runtime::Handle,
        backend: Arc<dyn Backend>,
        config: &Config,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let wake: Wake = Arc::new(move || ctx.request_repaint());
        let (pollers, updates) =
            Pollers::spawn(&runtime, Arc::clone(&backend), config.poll_config(), Some(wake));

        let session = Session::new(
            Endpoints::new(config.api_base_url.clone()),
            ClockPlayer::new(),
            Notifications::new(config.notification_ttl),
        );

        Self {
            session,
            updates,
            metadata: MetadataFetcher::new(runtime, backend),
            _pollers: pollers,
            search: String::new(),
            highlight: None,
            tab: Tab::Player,
            fullscreen: false,
        }
    }

    /// Apply everything that arrived since the last frame
    fn absorb(&mut self, ctx: &Context) {
        while let Ok(update) = self.updates.try_recv() {
            self.session.apply_update(update);
        }

        if let Some(name) = self.session.take_metadata_request() {
            self.metadata.request(name, ctx.clone());
        }
        for (name, result) in self.metadata.rx.try_iter() {
            self.session.apply_metadata(&name, result);
        }

        if !ctx.wants_keyboard_input() {
            let shortcuts: Vec<Shortcut> = ctx.input(|i| {
                i.events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::Key {
                            key,
                            pressed: true,
                            modifiers,
                            ..
                        } => shortcut_for(*key, *modifiers),
                        _ => None,
                    })
                    .collect()
            });
            for shortcut in shortcuts {
                self.session.handle_shortcut(shortcut);
            }
        }

        self.session.pump_playback();

        let now = Instant::now();
        self.session.notifications_mut().expire(now);
        if self.highlight.as_ref().is_some_and(|h| h.until <= now) {
            self.highlight = None;
        }
    }

    fn apply(&mut self, ctx: &Context, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::SelectVideo(name) => self.session.select_video(&name),
                UiAction::Activate(activation) => {
                    if let Some(request) = self.session.activate(&activation) {
                        self.emphasise(request.highlight);
                    }
                }
                UiAction::JumpTo(record) => {
                    if let Some(request) = self.session.seek_to_violation(&record) {
                        self.emphasise(request.highlight);
                    }
                }
                UiAction::ViewEvidence(record) => {
                    if let Some(url) = self.session.evidence_image_url(&record) {
                        ctx.open_url(egui::OpenUrl::new_tab(url));
                    }
                }
                UiAction::SetRate(rate) => self.session.set_rate(rate),
                UiAction::Shortcut(shortcut) => self.session.handle_shortcut(shortcut),
                UiAction::Download => {
                    if let Some(url) = self.session.download_url() {
                        ctx.open_url(egui::OpenUrl::same_tab(url));
                    }
                }
                UiAction::DismissNotification(index) => {
                    self.session.notifications_mut().dismiss(index)
                }
            }
        }

        let fullscreen = self.session.playback().player().is_fullscreen();
        if fullscreen != self.fullscreen {
            self.fullscreen = fullscreen;
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
        }
    }

    fn emphasise(&mut self, record: Option<ViolationRecord>) {
        self.highlight = record.map(|record| Highlight {
            record,
            until: Instant::now() + HIGHLIGHT_FOR,
        });
    }

    fn player_panel(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let session = &self.session;
        let playback = session.playback();

        match session.selected_video() {
            Some(video) => ui.heading(&video.name),
            None => ui.heading("No video selected"),
        };

        // Stand-in for the video surface: the host advances time only
        let surface_height = (ui.available_height() * 0.35).max(120.0);
        egui::Frame::none()
            .fill(egui::Color32::BLACK)
            .rounding(4.0)
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(ui.available_width(), surface_height));
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format_clock(playback.current_time()))
                            .size(48.0)
                            .monospace()
                            .color(egui::Color32::WHITE),
                    );
                });
            });

        ui.horizontal(|ui| {
            let label = if playback.player().is_playing() {
                "⏸ Pause"
            } else {
                "▶ Play"
            };
            if ui.button(label).clicked() {
                actions.push(UiAction::Shortcut(Shortcut::TogglePlay));
            }
            if ui.button("⏪ 5s").clicked() {
                actions.push(UiAction::Shortcut(Shortcut::SkipBack));
            }
            if ui.button("5s ⏩").clicked() {
                actions.push(UiAction::Shortcut(Shortcut::SkipForward));
            }

            ui.monospace(time_readout(playback.current_time(), playback.duration()));

            let current_rate = playback.player().rate();
            let mut rate = current_rate;
            egui::ComboBox::from_id_source("playback_rate")
                .selected_text(format!("{}x", rate))
                .show_ui(ui, |ui| {
                    for option in PLAYBACK_RATES {
                        ui.selectable_value(&mut rate, option, format!("{}x", option));
                    }
                });
            if rate != current_rate {
                actions.push(UiAction::SetRate(rate));
            }

            if ui.button("⛶ Fullscreen").clicked() {
                actions.push(UiAction::Shortcut(Shortcut::ToggleFullscreen));
            }
            if ui.button("⬇ Download").clicked() {
                actions.push(UiAction::Download);
            }
        });

        ui.add_space(6.0);
        timeline_view::show(ui, session.timeline(), actions);
        ui.add_space(6.0);
        tables::video_details(ui, session);
        ui.separator();

        let highlight = self.highlight.as_ref().map(|h| &h.record);
        tables::scoped_violations(ui, session, highlight, actions);
    }

    fn notifications(&self, ctx: &Context, actions: &mut Vec<UiAction>) {
        if self.session.notifications().is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-20.0, 40.0))
            .show(ctx, |ui| {
                for (index, note) in self.session.notifications().iter().enumerate() {
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, level_color(note.level)))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.colored_label(level_color(note.level), &note.message);
                                if ui.small_button("✕").clicked() {
                                    actions.push(UiAction::DismissNotification(index));
                                }
                            });
                        });
                }
            });
    }
}

impl App for MonitorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.absorb(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Traffic Violation Monitor");
                ui.separator();
                ui.selectable_value(&mut self.tab, Tab::Player, "Video monitoring");
                ui.selectable_value(&mut self.tab, Tab::Overview, "All violations");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let status = self.session.status();
                    ui.colored_label(status_color(status), status.label());
                });
            });
        });

        match self.tab {
            Tab::Player => {
                egui::SidePanel::left("videos")
                    .resizable(true)
                    .default_width(260.0)
                    .show(ctx, |ui| {
                        ui.heading(format!("Videos ({})", self.session.catalog().len()));
                        tables::video_list(ui, &self.session, &mut self.search, &mut actions);
                    });
                egui::TopBottomPanel::bottom("summary").show(ctx, |ui| {
                    tables::catalog_summary(ui, &self.session);
                });
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.player_panel(ui, &mut actions);
                });
            }
            Tab::Overview => {
                let today = chrono::Local::now().format("%Y-%m-%d").to_string();
                egui::CentralPanel::default().show(ctx, |ui| {
                    tables::overview(ui, &self.session, &today, &mut actions);
                });
            }
        }

        self.notifications(ctx, &mut actions);
        self.apply(ctx, actions);

        let repaint = if self.session.playback().player().is_playing() {
            REPAINT_PLAYING
        } else {
            REPAINT_IDLE
        };
        ctx.request_repaint_after(repaint);
    }
}
