//! Traffic violation monitor: polls a detection backend for violations and
//! recorded videos, and keeps a playback timeline in step with the
//! violations of the selected video.

pub mod api;
pub mod config;
pub mod core;
pub mod playback;
pub mod poller;
pub mod session;
pub mod store;
pub mod timeline;
pub mod ui;

#[cfg(test)]
mod testing;
