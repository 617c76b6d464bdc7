//! Catalog of evidence videos and the current selection.

use crate::api::{Backend, FetchError};
use crate::core::violation::VideoDescriptor;

/// Last fetched list of videos plus the sticky selection
#[derive(Debug, Clone, Default)]
pub struct VideoCatalog {
    videos: Vec<VideoDescriptor>,
    selected: Option<VideoDescriptor>,
}

impl VideoCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog and replace it on success.
    pub async fn refresh<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&[VideoDescriptor], FetchError> {
        let result = backend.fetch_videos().await;
        self.apply(result)
    }

    /// Fold a fetch result into the catalog. The selection is left alone.
    pub fn apply(
        &mut self,
        result: Result<Vec<VideoDescriptor>, FetchError>,
    ) -> Result<&[VideoDescriptor], FetchError> {
        match result {
            Ok(videos) => {
                tracing::debug!(count = videos.len(), "Video catalog replaced");
                self.videos = videos;
                Ok(&self.videos)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept = self.videos.len(),
                    "Video catalog refresh failed"
                );
                Err(e)
            }
        }
    }

    /// Select the first video when nothing is selected yet.
    ///
    /// Returns the entry that is selected afterwards. An existing selection
    /// is returned unchanged, even when the latest snapshot no longer lists it.
    pub fn select_initial(&mut self) -> Option<&VideoDescriptor> {
        if self.selected.is_none() {
            self.selected = self.videos.first().cloned();
        }
        self.selected.as_ref()
    }

    /// Explicit user selection by name.
    ///
    /// Names missing from the current snapshot still select a bare
    /// descriptor, so a video can be opened while the catalog is stale.
    pub fn select(&mut self, name: &str) -> &VideoDescriptor {
        let descriptor = self
            .find(name)
            .cloned()
            .unwrap_or_else(|| VideoDescriptor::new(name, 0, 0.0));
        self.selected.insert(descriptor)
    }

    pub fn selected(&self) -> Option<&VideoDescriptor> {
        self.selected.as_ref()
    }

    pub fn videos(&self) -> &[VideoDescriptor] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&VideoDescriptor> {
        self.videos.iter().find(|v| v.name == name)
    }

    /// Videos whose name contains `term`, ignoring case. An empty term matches all.
    pub fn search(&self, term: &str) -> Vec<&VideoDescriptor> {
        let needle = term.trim().to_lowercase();
        self.videos
            .iter()
            .filter(|v| v.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Sum of all video sizes in bytes
    pub fn total_size(&self) -> u64 {
        self.videos.iter().map(|v| v.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    fn catalog_of(names: &[&str]) -> VideoCatalog {
        let mut catalog = VideoCatalog::new();
        let videos = names
            .iter()
            .enumerate()
            .map(|(i, n)| VideoDescriptor::new(*n, (i as u64 + 1) * 1024, 0.0))
            .collect();
        catalog.apply(Ok(videos)).unwrap();
        catalog
    }

    #[test]
    fn test_select_initial_picks_first() {
        let mut catalog = catalog_of(&["a.mp4", "b.mp4"]);
        assert_eq!(catalog.select_initial().map(|v| v.name.as_str()), Some("a.mp4"));
    }

    #[test]
    fn test_select_initial_on_empty_catalog() {
        let mut catalog = VideoCatalog::new();
        assert!(catalog.select_initial().is_none());
        assert!(catalog.selected().is_none());
    }

    #[test]
    fn test_selection_is_sticky_across_refresh() {
        let mut catalog = catalog_of(&["a.mp4", "b.mp4"]);
        catalog.select("b.mp4");

        catalog
            .apply(Ok(vec![VideoDescriptor::new("c.mp4", 1, 0.0)]))
            .unwrap();
        assert_eq!(catalog.select_initial().map(|v| v.name.as_str()), Some("b.mp4"));
    }

    #[test]
    fn test_failed_refresh_keeps_catalog() {
        let mut catalog = catalog_of(&["a.mp4"]);
        assert!(catalog
            .apply(Err(FetchError::Network("refused".into())))
            .is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_select_unknown_name() {
        let mut catalog = catalog_of(&["a.mp4"]);
        let selected = catalog.select("late.mp4");
        assert_eq!(selected.name, "late.mp4");
        assert_eq!(selected.size, 0);
    }

    #[test]
    fn test_search_and_totals() {
        let catalog = catalog_of(&["Cam1_Morning.mp4", "cam2_evening.mp4", "junction.avi"]);
        let hits: Vec<_> = catalog.search("CAM").iter().map(|v| v.name.clone()).collect();
        assert_eq!(hits, vec!["Cam1_Morning.mp4", "cam2_evening.mp4"]);
        assert_eq!(catalog.search("").len(), 3);
        assert_eq!(catalog.total_size(), 1024 + 2048 + 3072);
    }

    #[tokio::test]
    async fn test_refresh_from_backend() {
        let backend = FakeBackend::new();
        backend.set_videos(Ok(vec![VideoDescriptor::new("x.mp4", 10, 1.0)]));
        let mut catalog = VideoCatalog::new();
        assert_eq!(catalog.refresh(&backend).await.unwrap().len(), 1);
        assert_eq!(backend.video_calls(), 1);
    }
}
