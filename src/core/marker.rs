//! Timeline annotations derived from violation timestamps.

use crate::core::time::Seconds;
use crate::core::violation::ViolationRecord;

/// A point on the timeline track for one violation.
/// Derived data: rebuilt whenever the scoped subset or the duration changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMarker {
    /// `timestamp / duration`; values outside `[0, 1]` are kept as-is and
    /// clamped only when placed
    pub position_fraction: f64,
    pub source: ViolationRecord,
}

impl TimelineMarker {
    /// The violation's exact offset in seconds
    pub fn timestamp(&self) -> Seconds {
        self.source.timestamp.unwrap_or_default()
    }

    /// Fraction clamped into the visible track
    pub fn placement(&self) -> f64 {
        self.position_fraction.clamp(0.0, 1.0)
    }
}

/// What the user activated on the timeline
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// A click on the bare track at the given fraction of its width
    Track(f64),
    /// A click on a marker
    Marker(TimelineMarker),
}
