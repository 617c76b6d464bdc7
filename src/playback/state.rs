//! Playback state machine of the clock-driven media host.

use std::time::Instant;

use crate::core::time::Seconds;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// No source loaded
    Idle,
    /// Playing - advancing from `from` since `since`
    Playing { since: Instant, from: Seconds },
    /// Paused at a specific position
    Paused { at: Seconds },
}

impl PlaybackState {
    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    /// Check if paused
    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused { .. })
    }

    /// Check if no source is loaded
    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackState::Idle)
    }

    /// Position at `now` for the given rate, before clamping to the duration
    pub fn position_at(&self, now: Instant, rate: f64) -> Seconds {
        match self {
            PlaybackState::Idle => 0.0,
            PlaybackState::Playing { since, from } => {
                let elapsed = now.saturating_duration_since(*since).as_secs_f64();
                from + elapsed * rate
            }
            PlaybackState::Paused { at } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_position_while_playing() {
        let since = Instant::now();
        let state = PlaybackState::Playing { since, from: 10.0 };
        let now = since + Duration::from_secs(4);
        assert_eq!(state.position_at(now, 1.0), 14.0);
        assert_eq!(state.position_at(now, 0.5), 12.0);
        assert_eq!(state.position_at(now, 2.0), 18.0);
    }

    #[test]
    fn test_position_when_not_playing() {
        let now = Instant::now();
        assert_eq!(PlaybackState::Idle.position_at(now, 1.0), 0.0);
        assert_eq!(PlaybackState::Paused { at: 7.5 }.position_at(now, 2.0), 7.5);
        assert!(PlaybackState::Paused { at: 0.0 }.is_paused());
        assert!(!PlaybackState::Idle.is_playing());
    }
}
