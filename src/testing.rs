//! In-memory backend for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{Backend, FetchError};
use crate::core::violation::{VideoDescriptor, VideoMetadata, ViolationRecord};

/// Serves canned results; unset endpoints answer with an empty list
pub struct FakeBackend {
    violations: Mutex<Result<Vec<ViolationRecord>, FetchError>>,
    videos: Mutex<Result<Vec<VideoDescriptor>, FetchError>>,
    metadata: Mutex<Result<VideoMetadata, FetchError>>,
    violation_calls: AtomicUsize,
    video_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            violations: Mutex::new(Ok(Vec::new())),
            videos: Mutex::new(Ok(Vec::new())),
            metadata: Mutex::new(Err(FetchError::Status {
                status: 404,
                body: "not found".into(),
            })),
            violation_calls: AtomicUsize::new(0),
            video_calls: AtomicUsize::new(0),
            metadata_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_violations(&self, result: Result<Vec<ViolationRecord>, FetchError>) {
        *self.violations.lock().unwrap() = result;
    }

    pub fn set_videos(&self, result: Result<Vec<VideoDescriptor>, FetchError>) {
        *self.videos.lock().unwrap() = result;
    }

    pub fn set_metadata(&self, result: Result<VideoMetadata, FetchError>) {
        *self.metadata.lock().unwrap() = result;
    }

    pub fn violation_calls(&self) -> usize {
        self.violation_calls.load(Ordering::SeqCst)
    }

    pub fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_violations(&self) -> Result<Vec<ViolationRecord>, FetchError> {
        self.violation_calls.fetch_add(1, Ordering::SeqCst);
        self.violations.lock().unwrap().clone()
    }

    async fn fetch_videos(&self) -> Result<Vec<VideoDescriptor>, FetchError> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        self.videos.lock().unwrap().clone()
    }

    async fn fetch_video_metadata(&self, _name: &str) -> Result<VideoMetadata, FetchError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata.lock().unwrap().clone()
    }
}
