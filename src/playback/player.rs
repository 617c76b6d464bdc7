//! The media host capability the playback controller drives.

use crate::core::time::Seconds;

/// Speeds offered in the rate selector
pub const PLAYBACK_RATES: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// A loadable media source
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    /// Catalog name of the video
    pub name: String,
    /// Where the host fetches the stream from
    pub url: String,
    /// Duration when the catalog already knows it
    pub duration_hint: Option<Seconds>,
}

/// Media element owned by the host (a browser `<video>`, a decoder, a clock).
///
/// Position changes requested through [`seek`](MediaPlayer::seek) are not
/// guaranteed to be visible synchronously; observers learn about them on the
/// next time update.
pub trait MediaPlayer: Send {
    /// Replace the current source. Resets position and duration.
    fn load(&mut self, source: MediaSource);

    fn source(&self) -> Option<&MediaSource>;

    /// Current position in seconds
    fn current_time(&self) -> Seconds;

    /// Duration once metadata is known
    fn duration(&self) -> Option<Seconds>;

    /// Request a position change; the host clamps into `[0, duration]`.
    fn seek(&mut self, time: Seconds);

    fn set_rate(&mut self, rate: f64);

    fn rate(&self) -> f64;

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    fn toggle_fullscreen(&mut self);

    fn is_fullscreen(&self) -> bool;
}
