//! Core types shared by the stores, the timeline and the views.
//!
//! Positions and durations are seconds (f64), matching what the media host
//! reports; sizes are bytes.

pub mod marker;
pub mod time;
pub mod violation;

// Re-export core data structures for easier access.
pub use marker::{Activation, TimelineMarker};
pub use time::Seconds;
pub use violation::{DetectionTime, VideoDescriptor, VideoMetadata, ViolationRecord};
