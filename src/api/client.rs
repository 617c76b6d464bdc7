//! REST client for the violation backend.
//!
//! Only reads are issued: the violation list, the video catalog and per-video
//! metadata. Every failure is classified into one of three [`FetchReason`]s;
//! callers treat them alike (keep stale data, flag the backend offline).

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::core::violation::{VideoDescriptor, VideoMetadata, ViolationRecord};

/// Coarse failure category of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    Network,
    Non2xx,
    Decode,
}

/// Errors from a single backend read.
///
/// Carries rendered messages rather than the source errors so results can be
/// cloned and sent across threads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the response not received.
    #[error("request failed: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn reason(&self) -> FetchReason {
        match self {
            FetchError::Network(_) => FetchReason::Network,
            FetchError::Status { .. } => FetchReason::Non2xx,
            FetchError::Decode(_) => FetchReason::Decode,
        }
    }
}

/// Read side of the violation backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/violations`
    async fn fetch_violations(&self) -> Result<Vec<ViolationRecord>, FetchError>;

    /// `GET /api/videos`
    async fn fetch_videos(&self) -> Result<Vec<VideoDescriptor>, FetchError>;

    /// `GET /api/video/metadata/{name}`
    async fn fetch_video_metadata(&self, name: &str) -> Result<VideoMetadata, FetchError>;
}

/// URL layout of the backend, rooted at its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// * `base_url` - Origin such as `http://localhost:5000`; a trailing `/` is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// A base that does not parse as a URL is joined verbatim.
    fn join(&self, segments: &[&str]) -> String {
        let mut url = match reqwest::Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(_) => return format!("{}/{}", self.base_url, segments.join("/")),
        };
        match url.path_segments_mut() {
            Ok(mut path) => {
                path.pop_if_empty().extend(segments);
            }
            Err(()) => return format!("{}/{}", self.base_url, segments.join("/")),
        }
        url.to_string()
    }

    pub fn violations(&self) -> String {
        self.join(&["api", "violations"])
    }

    pub fn videos(&self) -> String {
        self.join(&["api", "videos"])
    }

    pub fn video_metadata(&self, name: &str) -> String {
        self.join(&["api", "video", "metadata", name])
    }

    /// Evidence image served as a static file
    pub fn image(&self, filename: &str) -> String {
        self.join(&["evidence", "images", filename])
    }

    /// Evidence video served as a static file
    pub fn video(&self, filename: &str) -> String {
        self.join(&["evidence", "videos", filename])
    }
}

/// [`Backend`] over HTTP using [`reqwest`]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    /// Create a client with a per-request timeout.
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_violations(&self) -> Result<Vec<ViolationRecord>, FetchError> {
        self.get_json(&self.endpoints.violations()).await
    }

    async fn fetch_videos(&self) -> Result<Vec<VideoDescriptor>, FetchError> {
        self.get_json(&self.endpoints.videos()).await
    }

    async fn fetch_video_metadata(&self, name: &str) -> Result<VideoMetadata, FetchError> {
        self.get_json(&self.endpoints.video_metadata(name)).await
    }
}
