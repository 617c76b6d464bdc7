pub mod synchronizer;

pub use synchronizer::{SeekRequest, SeekSink, TimelineSynchronizer};
