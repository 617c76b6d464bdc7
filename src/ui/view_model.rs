//! Pure projections of session state into display rows and placements.
//!
//! Nothing here holds state; every function can be re-run on each frame and
//! yields the same output for the same input.

use crate::core::time::{format_clock, format_duration, format_file_size, Seconds};
use crate::core::violation::{VideoDescriptor, ViolationRecord};
use crate::timeline::TimelineSynchronizer;

/// Confidence bands, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    /// >= 0.9
    Highest,
    /// >= 0.7
    High,
    /// >= 0.5
    Medium,
    /// below 0.5
    Low,
    /// no confidence reported
    Unknown,
}

/// Inclusive lower bounds of the confidence bands
pub const TIER_HIGHEST: f64 = 0.9;
pub const TIER_HIGH: f64 = 0.7;
pub const TIER_MEDIUM: f64 = 0.5;

pub fn confidence_tier(confidence: Option<f64>) -> ConfidenceTier {
    match confidence {
        None => ConfidenceTier::Unknown,
        Some(c) if c.is_nan() => ConfidenceTier::Unknown,
        Some(c) if c >= TIER_HIGHEST => ConfidenceTier::Highest,
        Some(c) if c >= TIER_HIGH => ConfidenceTier::High,
        Some(c) if c >= TIER_MEDIUM => ConfidenceTier::Medium,
        Some(_) => ConfidenceTier::Low,
    }
}

/// `93.0%`, or `N/A` when missing
pub fn confidence_label(confidence: Option<f64>) -> String {
    match confidence.filter(|c| c.is_finite()) {
        Some(c) => format!("{:.1}%", c * 100.0),
        None => "N/A".to_string(),
    }
}

/// Severity colouring of a violation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeBadge {
    Danger,
    Warning,
    Primary,
    Secondary,
}

pub fn type_badge(kind: Option<&str>) -> TypeBadge {
    match kind {
        None => TypeBadge::Secondary,
        Some(k) if k.contains("Box Junction") || k.contains("Red Light") => TypeBadge::Danger,
        Some(k) if k.contains("Speeding") => TypeBadge::Warning,
        Some(k) if k.contains("Illegal") => TypeBadge::Danger,
        Some(_) => TypeBadge::Primary,
    }
}

/// One row of the per-video violation table
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationRow {
    pub time_label: String,
    pub plate_label: String,
    pub kind_label: String,
    pub badge: TypeBadge,
    pub tier: ConfidenceTier,
    pub confidence_label: String,
    /// Width of the confidence bar in percent
    pub confidence_percent: f64,
    pub record: ViolationRecord,
}

impl ViolationRow {
    pub fn from_record(record: &ViolationRecord) -> Self {
        let time_label = match record.offset() {
            Some(t) => format_clock(t),
            None => record.time_label().unwrap_or_else(|| "N/A".to_string()),
        };

        Self {
            time_label,
            plate_label: record.plate.clone().unwrap_or_else(|| "N/A".to_string()),
            kind_label: record.kind.clone().unwrap_or_else(|| "Unknown".to_string()),
            badge: type_badge(record.kind.as_deref()),
            tier: confidence_tier(record.confidence),
            confidence_label: confidence_label(record.confidence),
            confidence_percent: record
                .confidence
                .filter(|c| c.is_finite())
                .map_or(0.0, |c| (c * 100.0).clamp(0.0, 100.0)),
            record: record.clone(),
        }
    }
}

/// One row of the newest-first overview table
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    pub time_label: String,
    /// Readable plate, or `UNKNOWN`
    pub plate_label: String,
    pub kind_label: String,
    pub image: Option<String>,
    pub record: ViolationRecord,
}

impl OverviewRow {
    pub fn from_record(record: &ViolationRecord) -> Self {
        Self {
            time_label: record.time_label().unwrap_or_else(|| "N/A".to_string()),
            plate_label: record.known_plate().unwrap_or("UNKNOWN").to_string(),
            kind_label: record.kind.clone().unwrap_or_else(|| "Unknown".to_string()),
            image: record.image.clone(),
            record: record.clone(),
        }
    }
}

/// A marker placed on the track
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    /// Offset from the left edge in percent of the track width
    pub left_percent: f64,
    /// `mm:ss` tooltip
    pub label: String,
}

/// Everything needed to draw the timeline track
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    pub markers: Vec<MarkerView>,
    pub indicator_percent: f64,
    /// Nothing to draw: duration unknown or no scoped violations
    pub is_empty: bool,
}

impl TimelineView {
    pub fn project(timeline: &TimelineSynchronizer) -> Self {
        let is_empty = timeline.duration().is_none() || timeline.scoped_violations().is_empty();
        let markers = timeline
            .markers()
            .iter()
            .map(|m| MarkerView {
                left_percent: m.placement() * 100.0,
                label: format_clock(m.timestamp()),
            })
            .collect();

        Self {
            markers,
            indicator_percent: timeline.indicator_fraction() * 100.0,
            is_empty,
        }
    }
}

/// An entry of the video list
#[derive(Debug, Clone, PartialEq)]
pub struct VideoListItem {
    pub name: String,
    pub size_label: String,
    pub created_label: String,
    /// Clip length when the catalog reports one
    pub duration_label: Option<String>,
    pub is_selected: bool,
}

impl VideoListItem {
    pub fn project(
        video: &VideoDescriptor,
        selected: Option<&VideoDescriptor>,
        format_created: impl Fn(f64) -> String,
    ) -> Self {
        Self {
            name: video.name.clone(),
            size_label: format_file_size(video.size),
            created_label: format_created(video.created),
            duration_label: video
                .duration
                .filter(|d| d.is_finite() && *d > 0.0)
                .map(format_duration),
            is_selected: selected.is_some_and(|s| s.name == video.name),
        }
    }
}

/// Current / total time readout
pub fn time_readout(current: Seconds, duration: Option<Seconds>) -> String {
    format!(
        "{} / {}",
        format_clock(current),
        format_clock(duration.unwrap_or(0.0))
    )
}
