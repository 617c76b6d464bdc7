//! Playback controller: a thin command surface over a [`MediaPlayer`] plus
//! the notification side observers use to follow playback.
//!
//! Notifications are produced by [`PlaybackController::tick`], which the
//! owner calls at the host's update granularity (every UI frame). Each tick
//! publishes at most one metadata-ready and one time-change event.

use crossbeam::channel;

use crate::core::time::Seconds;
use crate::playback::player::{MediaPlayer, MediaSource};

/// Distance (seconds) the arrow-key shortcuts skip
pub const SKIP_SECONDS: Seconds = 5.0;

/// Notification published to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A new source was loaded
    SourceChanged { name: String },
    /// The duration of the current source became known
    MetadataReady { duration: Seconds },
    /// The playback position changed
    TimeChanged { time: Seconds },
}

/// Error type for playback commands
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("no media source loaded")]
    NoSource,
    #[error("unsupported playback rate: {0}")]
    InvalidRate(f64),
}

type TimeListener = Box<dyn FnMut(Seconds) + Send>;

pub struct PlaybackController<P: MediaPlayer> {
    player: P,
    time_listeners: Vec<TimeListener>,
    metadata_listeners: Vec<TimeListener>,
    subscribers: Vec<channel::Sender<PlaybackEvent>>,
    /// Last time published; `None` forces the next tick to publish
    last_time: Option<Seconds>,
    metadata_published: bool,
}

impl<P: MediaPlayer> PlaybackController<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            time_listeners: Vec::new(),
            metadata_listeners: Vec::new(),
            subscribers: Vec::new(),
            last_time: None,
            metadata_published: false,
        }
    }

    /// Register a callback for every playback time update
    pub fn on_time_change(&mut self, listener: impl FnMut(Seconds) + Send + 'static) {
        self.time_listeners.push(Box::new(listener));
    }

    /// Register a callback fired once per source when its duration becomes known
    pub fn on_metadata_ready(&mut self, listener: impl FnMut(Seconds) + Send + 'static) {
        self.metadata_listeners.push(Box::new(listener));
    }

    /// Channel receiving every [`PlaybackEvent`]. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> channel::Receiver<PlaybackEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Load a new source. Duration and position notifications start over.
    pub fn load(&mut self, source: MediaSource) {
        tracing::info!(video = %source.name, url = %source.url, "Loading media source");
        let name = source.name.clone();
        self.player.load(source);
        self.last_time = None;
        self.metadata_published = false;
        self.publish(PlaybackEvent::SourceChanged { name });
    }

    /// Poll the host and publish what changed since the last tick.
    pub fn tick(&mut self) {
        if self.player.source().is_none() {
            return;
        }

        if !self.metadata_published {
            if let Some(duration) = self.player.duration() {
                self.metadata_published = true;
                for listener in &mut self.metadata_listeners {
                    listener(duration);
                }
                self.publish(PlaybackEvent::MetadataReady { duration });
            }
        }

        let time = self.player.current_time();
        if self.last_time != Some(time) {
            self.last_time = Some(time);
            for listener in &mut self.time_listeners {
                listener(time);
            }
            self.publish(PlaybackEvent::TimeChanged { time });
        }
    }

    fn publish(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn require_source(&self) -> Result<(), PlaybackError> {
        match self.player.source() {
            Some(_) => Ok(()),
            None => Err(PlaybackError::NoSource),
        }
    }

    /// Request a position change. The host clamps it and reports the
    /// effective position on a later tick.
    pub fn seek(&mut self, time: Seconds) -> Result<(), PlaybackError> {
        self.require_source()?;
        tracing::debug!(time, "Seek requested");
        self.player.seek(time);
        Ok(())
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta: Seconds) -> Result<(), PlaybackError> {
        let target = (self.player.current_time() + delta).max(0.0);
        self.seek(target)
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<(), PlaybackError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(PlaybackError::InvalidRate(rate));
        }
        self.player.set_rate(rate);
        Ok(())
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        self.require_source()?;
        self.player.play();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        self.require_source()?;
        self.player.pause();
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<(), PlaybackError> {
        if self.player.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.player.toggle_fullscreen();
    }

    pub fn current_time(&self) -> Seconds {
        self.player.current_time()
    }

    pub fn duration(&self) -> Option<Seconds> {
        self.player.duration()
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}
