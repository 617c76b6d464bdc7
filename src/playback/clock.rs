//! Clock-driven media host.
//!
//! Advances a position from wall-clock time at the selected rate without
//! decoding any frames. The duration comes from the source's hint; without
//! one the metadata never becomes ready.

use std::time::Instant;

use crate::core::time::Seconds;
use crate::playback::player::{MediaPlayer, MediaSource};
use crate::playback::state::PlaybackState;

pub struct ClockPlayer {
    source: Option<MediaSource>,
    state: PlaybackState,
    rate: f64,
    fullscreen: bool,
}

impl ClockPlayer {
    pub fn new() -> Self {
        Self {
            source: None,
            state: PlaybackState::Idle,
            rate: 1.0,
            fullscreen: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Position at `now`, clamped to the duration
    pub fn position_at(&self, now: Instant) -> Seconds {
        let raw = self.state.position_at(now, self.rate);
        self.clamp(raw)
    }

    fn clamp(&self, time: Seconds) -> Seconds {
        let upper = self.duration().unwrap_or(f64::INFINITY);
        if time.is_nan() {
            return 0.0;
        }
        time.clamp(0.0, upper)
    }

    /// Freeze playback at the end once the clock runs past the duration
    fn settle(&mut self, now: Instant) {
        if let (PlaybackState::Playing { .. }, Some(duration)) = (self.state, self.duration()) {
            if self.state.position_at(now, self.rate) >= duration {
                self.state = PlaybackState::Paused { at: duration };
            }
        }
    }
}

impl Default for ClockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPlayer for ClockPlayer {
    fn load(&mut self, source: MediaSource) {
        self.source = Some(source);
        self.state = PlaybackState::Paused { at: 0.0 };
    }

    fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    fn current_time(&self) -> Seconds {
        self.position_at(Instant::now())
    }

    fn duration(&self) -> Option<Seconds> {
        self.source
            .as_ref()
            .and_then(|s| s.duration_hint)
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    fn seek(&mut self, time: Seconds) {
        let target = self.clamp(time);
        self.state = match self.state {
            PlaybackState::Idle => PlaybackState::Idle,
            PlaybackState::Playing { .. } => PlaybackState::Playing {
                since: Instant::now(),
                from: target,
            },
            PlaybackState::Paused { .. } => PlaybackState::Paused { at: target },
        };
    }

    fn set_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            return;
        }
        // Re-anchor so the position does not jump
        let now = Instant::now();
        if let PlaybackState::Playing { .. } = self.state {
            let at = self.position_at(now);
            self.state = PlaybackState::Playing { since: now, from: at };
        }
        self.rate = rate;
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn play(&mut self) {
        let now = Instant::now();
        self.settle(now);
        if let PlaybackState::Paused { at } = self.state {
            // Restart from the top when parked at the end
            let from = match self.duration() {
                Some(d) if at >= d => 0.0,
                _ => at,
            };
            self.state = PlaybackState::Playing { since: now, from };
        }
    }

    fn pause(&mut self) {
        if let PlaybackState::Playing { .. } = self.state {
            let at = self.position_at(Instant::now());
            self.state = PlaybackState::Paused { at };
        }
    }

    fn is_playing(&self) -> bool {
        match self.state {
            PlaybackState::Playing { .. } => match self.duration() {
                Some(d) => self.state.position_at(Instant::now(), self.rate) < d,
                None => true,
            },
            _ => false,
        }
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}
