//! Video list, violation tables and summary counters.

use egui::{Color32, Grid, ProgressBar, RichText, ScrollArea, Ui};

use crate::core::time::{format_created_local, format_file_size};
use crate::core::violation::ViolationRecord;
use crate::playback::MediaPlayer;
use crate::session::Session;
use crate::ui::view_model::{OverviewRow, VideoListItem, ViolationRow};
use crate::ui::{badge_color, tier_color, UiAction};

/// Searchable list of catalog videos
pub fn video_list<P: MediaPlayer>(
    ui: &mut Ui,
    session: &Session<P>,
    search: &mut String,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.label("Search");
        ui.text_edit_singleline(search);
    });
    ui.separator();

    let catalog = session.catalog();
    let selected = catalog.selected();

    ScrollArea::vertical().id_source("video_list").show(ui, |ui| {
        for video in catalog.search(search) {
            let item = VideoListItem::project(video, selected, format_created_local);
            let response = ui.selectable_label(item.is_selected, format!("▶ {}", item.name));
            match &item.duration_label {
                Some(duration) => ui.weak(format!(
                    "{} • {} • {}",
                    item.size_label, duration, item.created_label
                )),
                None => ui.weak(format!("{} • {}", item.size_label, item.created_label)),
            };
            if response.clicked() && !item.is_selected {
                actions.push(UiAction::SelectVideo(item.name.clone()));
            }
            ui.add_space(4.0);
        }
    });
}

/// Catalog totals
pub fn catalog_summary<P: MediaPlayer>(ui: &mut Ui, session: &Session<P>) {
    let catalog = session.catalog();
    ui.horizontal(|ui| {
        ui.label(format!("Videos: {}", catalog.len()));
        ui.separator();
        ui.label(format!("Total size: {}", format_file_size(catalog.total_size())));
        ui.separator();
        ui.label(format!(
            "Violations in video: {}",
            session.timeline().scoped_violations().len()
        ));
    });
}

/// Size and creation time of the selected video
pub fn video_details<P: MediaPlayer>(ui: &mut Ui, session: &Session<P>) {
    if let Some(metadata) = session.metadata() {
        ui.horizontal(|ui| {
            ui.label(format!("Size: {}", format_file_size(metadata.size)));
            ui.separator();
            ui.label(format!("Created: {}", format_created_local(metadata.created)));
        });
    }
}

/// Violations of the selected video, in scoped order
pub fn scoped_violations<P: MediaPlayer>(
    ui: &mut Ui,
    session: &Session<P>,
    highlight: Option<&ViolationRecord>,
    actions: &mut Vec<UiAction>,
) {
    let scoped = session.timeline().scoped_violations();
    ui.heading(format!("{} Violations", scoped.len()));

    if scoped.is_empty() {
        ui.weak("No violations detected in this video");
        return;
    }

    ScrollArea::vertical().id_source("scoped_violations").show(ui, |ui| {
        Grid::new("scoped_violations_grid")
            .striped(true)
            .num_columns(5)
            .show(ui, |ui| {
                ui.strong("Time");
                ui.strong("Plate");
                ui.strong("Type");
                ui.strong("Confidence");
                ui.strong("");
                ui.end_row();

                for record in scoped {
                    let row = ViolationRow::from_record(record);

                    let mut time = RichText::new(&row.time_label).monospace();
                    if highlight == Some(record) {
                        time = time.strong().background_color(Color32::from_rgb(207, 226, 255));
                    }
                    if ui.link(time).clicked() {
                        actions.push(UiAction::JumpTo(row.record.clone()));
                    }
                    ui.label(RichText::new(&row.plate_label).monospace().strong());
                    ui.label(RichText::new(&row.kind_label).color(badge_color(row.badge)));
                    ui.add(
                        ProgressBar::new((row.confidence_percent / 100.0) as f32)
                            .desired_width(120.0)
                            .fill(tier_color(row.tier))
                            .text(row.confidence_label.as_str()),
                    );
                    ui.horizontal(|ui| {
                        if ui.small_button("View").clicked() {
                            actions.push(UiAction::ViewEvidence(row.record.clone()));
                        }
                        if ui.small_button("Jump").clicked() {
                            actions.push(UiAction::JumpTo(row.record.clone()));
                        }
                    });
                    ui.end_row();
                }
            });
    });
}

/// Every violation, newest first, with overview counters
pub fn overview<P: MediaPlayer>(
    ui: &mut Ui,
    session: &Session<P>,
    today: &str,
    actions: &mut Vec<UiAction>,
) {
    let stats = session.violation_stats(today);
    ui.horizontal(|ui| {
        ui.label(format!("Total: {}", stats.total));
        ui.separator();
        ui.label(format!("Today: {}", stats.today));
        ui.separator();
        ui.label(format!("Unique plates: {}", stats.unique_plates));
    });
    ui.separator();

    ScrollArea::vertical().id_source("overview").show(ui, |ui| {
        Grid::new("overview_grid")
            .striped(true)
            .num_columns(5)
            .show(ui, |ui| {
                ui.strong("Time");
                ui.strong("Plate");
                ui.strong("Type");
                ui.strong("Location");
                ui.strong("Evidence");
                ui.end_row();

                for record in session.violations().newest_first() {
                    let row = OverviewRow::from_record(record);
                    ui.label(row.time_label.as_str());
                    ui.label(RichText::new(&row.plate_label).monospace().strong());
                    ui.label(
                        RichText::new(&row.kind_label).color(Color32::from_rgb(220, 53, 69)),
                    );
                    ui.label("Intersection");
                    if ui
                        .add_enabled(row.image.is_some(), egui::Button::new("View"))
                        .clicked()
                    {
                        actions.push(UiAction::ViewEvidence(row.record.clone()));
                    }
                    ui.end_row();
                }
            });
    });
}
