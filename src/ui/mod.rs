//! egui presentation layer.
//!
//! Widgets read the session through the projections in [`view_model`] and
//! report user input as [`UiAction`]s; the app applies those to the session
//! after the frame is laid out, so rendering never mutates state.

pub mod app;
pub mod tables;
pub mod timeline_view;
pub mod view_model;

pub use app::MonitorApp;

use egui::Color32;

use crate::core::marker::Activation;
use crate::core::violation::ViolationRecord;
use crate::session::Shortcut;
use crate::store::{ApiStatus, NotificationLevel};
use view_model::{ConfidenceTier, TypeBadge};

/// User input collected during one frame
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectVideo(String),
    Activate(Activation),
    JumpTo(ViolationRecord),
    ViewEvidence(ViolationRecord),
    SetRate(f64),
    Shortcut(Shortcut),
    Download,
    DismissNotification(usize),
}

pub fn badge_color(badge: TypeBadge) -> Color32 {
    match badge {
        TypeBadge::Danger => Color32::from_rgb(220, 53, 69),
        TypeBadge::Warning => Color32::from_rgb(255, 193, 7),
        TypeBadge::Primary => Color32::from_rgb(13, 110, 253),
        TypeBadge::Secondary => Color32::from_rgb(108, 117, 125),
    }
}

pub fn tier_color(tier: ConfidenceTier) -> Color32 {
    match tier {
        ConfidenceTier::Highest => Color32::from_rgb(25, 135, 84),
        ConfidenceTier::High => Color32::from_rgb(13, 202, 240),
        ConfidenceTier::Medium => Color32::from_rgb(255, 193, 7),
        ConfidenceTier::Low => Color32::from_rgb(220, 53, 69),
        ConfidenceTier::Unknown => Color32::from_rgb(108, 117, 125),
    }
}

pub fn level_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Success => Color32::from_rgb(25, 135, 84),
        NotificationLevel::Info => Color32::from_rgb(13, 202, 240),
        NotificationLevel::Warning => Color32::from_rgb(255, 193, 7),
        NotificationLevel::Danger => Color32::from_rgb(220, 53, 69),
    }
}

pub fn status_color(status: ApiStatus) -> Color32 {
    match status {
        ApiStatus::Online => Color32::from_rgb(25, 135, 84),
        ApiStatus::Offline => Color32::from_rgb(220, 53, 69),
        ApiStatus::Unknown => Color32::from_rgb(108, 117, 125),
    }
}
