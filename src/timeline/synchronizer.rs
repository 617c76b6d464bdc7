//! Keeps the violation markers, the playback indicator and seek requests of
//! one video consistent.
//!
//! Markers are derived from the scoped violation subset and the video
//! duration and are rebuilt whenever either changes. Without a valid
//! (finite, positive) duration there are no markers and the indicator rests
//! at 0.

use crate::core::marker::{Activation, TimelineMarker};
use crate::core::time::Seconds;
use crate::core::violation::ViolationRecord;
use crate::playback::{MediaPlayer, PlaybackController};

/// Receiver of seek requests produced by timeline activation
pub trait SeekSink {
    fn request_seek(&mut self, time: Seconds);
}

impl<P: MediaPlayer> SeekSink for PlaybackController<P> {
    fn request_seek(&mut self, time: Seconds) {
        if let Err(e) = self.seek(time) {
            tracing::warn!(error = %e, time, "Timeline seek dropped");
        }
    }
}

/// Outcome of an activation: where playback was sent and which violation,
/// if any, should be emphasised. The emphasis is transient and not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SeekRequest {
    pub time: Seconds,
    pub highlight: Option<ViolationRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineSynchronizer {
    duration: Option<Seconds>,
    scoped: Vec<ViolationRecord>,
    cursor: Seconds,
    markers: Vec<TimelineMarker>,
}

fn valid_duration(duration: Seconds) -> Option<Seconds> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

impl TimelineSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Media metadata became known. Invalid durations count as unknown.
    pub fn set_duration(&mut self, duration: Seconds) {
        self.duration = valid_duration(duration);
        self.cursor = self.clamp_cursor(self.cursor);
        self.compute_markers();
    }

    /// Forget the duration, e.g. while a new source loads
    pub fn reset_duration(&mut self) {
        self.duration = None;
        self.compute_markers();
    }

    /// Replace the subset of violations shown on this timeline
    pub fn set_scoped_violations(&mut self, violations: Vec<ViolationRecord>) {
        self.scoped = violations;
        self.compute_markers();
    }

    /// Rebuild markers: one per violation with a timestamp, at
    /// `timestamp / duration`, in scoped order. Empty without a valid duration.
    pub fn compute_markers(&mut self) -> &[TimelineMarker] {
        self.markers = match self.duration {
            Some(duration) => self
                .scoped
                .iter()
                .filter_map(|record| {
                    record.offset().map(|t| TimelineMarker {
                        position_fraction: t / duration,
                        source: record.clone(),
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        &self.markers
    }

    /// Follow the playback position
    pub fn advance_cursor(&mut self, time: Seconds) {
        self.cursor = self.clamp_cursor(time);
    }

    fn clamp_cursor(&self, time: Seconds) -> Seconds {
        if !time.is_finite() || time < 0.0 {
            return 0.0;
        }
        match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        }
    }

    /// Indicator position as a fraction of the track; 0 without a valid duration
    pub fn indicator_fraction(&self) -> f64 {
        match self.duration {
            Some(duration) => (self.cursor / duration).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    /// Translate an activation into an absolute time and hand it to `sink`.
    ///
    /// Track clicks map `fraction * duration` (fraction clamped to `[0, 1]`)
    /// and need a known duration. Markers seek to their exact timestamp and
    /// ask for their violation to be highlighted.
    pub fn activate_at<S: SeekSink + ?Sized>(
        &self,
        activation: &Activation,
        sink: &mut S,
    ) -> Option<SeekRequest> {
        let request = match activation {
            Activation::Track(fraction) => {
                let duration = self.duration?;
                if !fraction.is_finite() {
                    return None;
                }
                SeekRequest {
                    time: fraction.clamp(0.0, 1.0) * duration,
                    highlight: None,
                }
            }
            Activation::Marker(marker) => SeekRequest {
                time: marker.source.offset()?,
                highlight: Some(marker.source.clone()),
            },
        };

        tracing::debug!(
            time = request.time,
            marker = request.highlight.is_some(),
            "Timeline activated"
        );
        sink.request_seek(request.time);
        Some(request)
    }

    /// Marker closest to `fraction`, if one lies within `tolerance`
    pub fn nearest_marker(&self, fraction: f64, tolerance: f64) -> Option<&TimelineMarker> {
        self.markers
            .iter()
            .map(|m| ((m.placement() - fraction).abs(), m))
            .filter(|(distance, _)| *distance <= tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, m)| m)
    }

    pub fn markers(&self) -> &[TimelineMarker] {
        &self.markers
    }

    pub fn scoped_violations(&self) -> &[ViolationRecord] {
        &self.scoped
    }

    pub fn duration(&self) -> Option<Seconds> {
        self.duration
    }

    pub fn cursor(&self) -> Seconds {
        self.cursor
    }
}
