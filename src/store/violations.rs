//! Client-side cache of the violation list.
//!
//! The list is replaced wholesale on every successful fetch. There is no
//! merge or diff. A failed fetch leaves the previous list in place.

use std::collections::HashSet;

use chrono::TimeZone;

use crate::api::{Backend, FetchError};
use crate::core::violation::{video_base_name, ViolationRecord};

/// Overview counters shown above the violation table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViolationStats {
    pub total: usize,
    /// Records whose wall-clock `time` falls on the given day
    pub today: usize,
    /// Distinct readable plates
    pub unique_plates: usize,
}

/// Last fetched violation list
#[derive(Debug, Clone, Default)]
pub struct ViolationStore {
    records: Vec<ViolationRecord>,
    /// Successful refreshes so far; zero means nothing has been fetched yet
    generation: u64,
}

impl ViolationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the list and replace the cache on success.
    pub async fn refresh<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&[ViolationRecord], FetchError> {
        let result = backend.fetch_violations().await;
        self.apply(result)
    }

    /// Fold a fetch result into the cache.
    ///
    /// Split from [`refresh`](Self::refresh) so fetches can run on a poller
    /// task while the owner of the store applies the outcome.
    pub fn apply(
        &mut self,
        result: Result<Vec<ViolationRecord>, FetchError>,
    ) -> Result<&[ViolationRecord], FetchError> {
        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Violation list replaced");
                self.records = records;
                self.generation += 1;
                Ok(&self.records)
            }
            Err(e) => {
                tracing::warn!(error = %e, kept = self.records.len(), "Violation refresh failed");
                Err(e)
            }
        }
    }

    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records associated with a video by name.
    ///
    /// A record belongs to the video when its `video` field contains the
    /// video name with its container extension stripped. Records without a
    /// `video` field are never included. Source order is preserved.
    ///
    /// The association is textual only: clips whose names share a prefix
    /// (`cam1` and `cam10`) can claim each other's records.
    pub fn scope_to_video(&self, video_name: &str) -> Vec<ViolationRecord> {
        let base = video_base_name(video_name);
        self.records
            .iter()
            .filter(|r| r.refers_to(base))
            .cloned()
            .collect()
    }

    /// Full list with the most recent (last fetched) record first
    pub fn newest_first(&self) -> impl Iterator<Item = &ViolationRecord> {
        self.records.iter().rev()
    }

    /// Counters for the overview; `day` is `YYYY-MM-DD` in the local zone.
    pub fn stats(&self, day: &str) -> ViolationStats {
        self.stats_in(day, &chrono::Local)
    }

    /// [`stats`](Self::stats) with detection times rendered in `tz`
    pub fn stats_in<Tz: TimeZone>(&self, day: &str, tz: &Tz) -> ViolationStats
    where
        Tz::Offset: std::fmt::Display,
    {
        let today = self
            .records
            .iter()
            .filter(|r| r.time_label_in(tz).is_some_and(|t| t.contains(day)))
            .count();

        let unique_plates = self
            .records
            .iter()
            .filter_map(|r| r.known_plate())
            .collect::<HashSet<_>>()
            .len();

        ViolationStats {
            total: self.records.len(),
            today,
            unique_plates,
        }
    }
}
