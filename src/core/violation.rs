//! Wire records returned by the violation backend.
//!
//! Records are immutable once fetched. Identity is positional: `id` is not
//! guaranteed to be present or stable across fetches.

use serde::{Deserialize, Serialize};

use chrono::TimeZone;

use crate::core::time::{format_created, Seconds};

/// Sentinel the detector writes when no plate could be read
pub const UNKNOWN_PLATE: &str = "N/A";

/// Video container extensions stripped before name matching
pub const VIDEO_EXTENSIONS: [&str; 8] = [
    ".mp4", ".avi", ".mov", ".mkv", ".webm", ".flv", ".wmv", ".m4v",
];

/// A detected traffic infraction with optional evidence references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationRecord {
    pub id: Option<String>,
    /// Offset into the source video, in seconds
    pub timestamp: Option<Seconds>,
    pub plate: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Detector confidence in `[0, 1]`
    pub confidence: Option<f64>,
    /// Evidence image filename
    pub image: Option<String>,
    /// Source video filename or partial name
    pub video: Option<String>,
    /// Wall-clock detection time as written by the detector
    pub time: Option<DetectionTime>,
    pub time_formatted: Option<String>,
    pub log_file: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl ViolationRecord {
    /// The plate, unless absent or the unknown sentinel
    pub fn known_plate(&self) -> Option<&str> {
        self.plate
            .as_deref()
            .filter(|p| !p.is_empty() && *p != UNKNOWN_PLATE)
    }

    /// Timestamp when it is a usable (finite) offset
    pub fn offset(&self) -> Option<Seconds> {
        self.timestamp.filter(|t| t.is_finite())
    }

    /// Display form of the detection time in `tz`.
    ///
    /// `time_formatted` wins when the backend supplied it; unix timestamps
    /// are rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn time_label_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        if let Some(formatted) = self.time_formatted.as_deref().filter(|t| !t.is_empty()) {
            return Some(formatted.to_string());
        }
        self.time.as_ref().and_then(|time| time.render_in(tz))
    }

    /// [`time_label_in`](Self::time_label_in) in the machine's local zone
    pub fn time_label(&self) -> Option<String> {
        self.time_label_in(&chrono::Local)
    }

    /// Whether this record's `video` reference textually contains `base_name`.
    /// Records without a `video` field never match.
    pub fn refers_to(&self, base_name: &str) -> bool {
        match self.video.as_deref() {
            Some(video) => video.contains(base_name),
            None => false,
        }
    }
}

/// Detection time as the detector logs it: free text or a unix timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectionTime {
    Text(String),
    Unix(f64),
}

impl DetectionTime {
    /// Text as-is; timestamps formatted in `tz`, `None` when out of range
    pub fn render_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        match self {
            DetectionTime::Text(text) => Some(text.clone()),
            DetectionTime::Unix(unix) => format_created(*unix, tz),
        }
    }
}

impl From<&str> for DetectionTime {
    fn from(text: &str) -> Self {
        DetectionTime::Text(text.to_string())
    }
}

impl From<String> for DetectionTime {
    fn from(text: String) -> Self {
        DetectionTime::Text(text)
    }
}

/// An entry of the video catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Filename, unique within one catalog snapshot
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Creation time as a unix timestamp (seconds)
    pub created: f64,
    #[serde(default)]
    pub duration: Option<Seconds>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub violation_count: Option<u64>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl VideoDescriptor {
    pub fn new(name: impl Into<String>, size: u64, created: f64) -> Self {
        Self {
            name: name.into(),
            size,
            created,
            ..Default::default()
        }
    }

    /// Name with a known container extension removed
    pub fn base_name(&self) -> &str {
        video_base_name(&self.name)
    }
}

/// Response of `GET /api/video/metadata/{name}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub size: u64,
    pub created: f64,
}

/// Strip one trailing known video extension (case-insensitive).
///
/// Names without a known extension come back unchanged.
pub fn video_base_name(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &name[..name.len() - ext.len()])
        .unwrap_or(name)
}
