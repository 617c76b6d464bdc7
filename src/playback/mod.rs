//! Playback: the media host capability, a clock-driven host and the
//! controller that relays time updates to observers.

pub mod clock;
pub mod controller;
pub mod player;
pub mod state;

pub use clock::ClockPlayer;
pub use controller::{PlaybackController, PlaybackError, PlaybackEvent, SKIP_SECONDS};
pub use player::{MediaPlayer, MediaSource, PLAYBACK_RATES};
pub use state::PlaybackState;
