//! Session state of one monitoring view.
//!
//! [`Session`] owns every store, the timeline synchronizer and the playback
//! controller. It is the single writer of that state: fetch results arrive as
//! values (from the pollers or from [`Session::refresh_all`]) and playback
//! notifications are drained in [`Session::pump_playback`]. Views only read
//! from it and call its methods in response to input.

use crossbeam::channel;

use crate::api::{Backend, Endpoints, FetchError};
use crate::core::marker::Activation;
use crate::core::violation::{VideoDescriptor, VideoMetadata, ViolationRecord};
use crate::playback::{
    MediaPlayer, MediaSource, PlaybackController, PlaybackEvent, SKIP_SECONDS,
};
use crate::poller::PollUpdate;
use crate::store::{
    ApiStatus, NotificationLevel, Notifications, VideoCatalog, ViolationStats, ViolationStore,
};
use crate::timeline::{SeekRequest, TimelineSynchronizer};

/// Keyboard commands of the player view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    SkipBack,
    SkipForward,
    ToggleFullscreen,
}

pub struct Session<P: MediaPlayer> {
    endpoints: Endpoints,
    violations: ViolationStore,
    catalog: VideoCatalog,
    timeline: TimelineSynchronizer,
    playback: PlaybackController<P>,
    playback_events: channel::Receiver<PlaybackEvent>,
    status: ApiStatus,
    notifications: Notifications,
    metadata: Option<VideoMetadata>,
    /// Video whose metadata should be fetched next
    pending_metadata: Option<String>,
}

impl<P: MediaPlayer> Session<P> {
    pub fn new(endpoints: Endpoints, player: P, notifications: Notifications) -> Self {
        let mut playback = PlaybackController::new(player);
        let playback_events = playback.subscribe();
        Self {
            endpoints,
            violations: ViolationStore::new(),
            catalog: VideoCatalog::new(),
            timeline: TimelineSynchronizer::new(),
            playback,
            playback_events,
            status: ApiStatus::Unknown,
            notifications,
            metadata: None,
            pending_metadata: None,
        }
    }

    /// Fetch catalog, violations and (when a video is selected) its
    /// metadata, applying each result as it arrives.
    pub async fn refresh_all<B: Backend + ?Sized>(&mut self, backend: &B) {
        let videos = backend.fetch_videos().await;
        self.apply_update(PollUpdate::Videos(videos));

        let violations = backend.fetch_violations().await;
        self.apply_update(PollUpdate::Violations(violations));

        if let Some(name) = self.take_metadata_request() {
            let metadata = backend.fetch_video_metadata(&name).await;
            self.apply_metadata(&name, metadata);
        }
    }

    /// Fold one fetch outcome into the session.
    ///
    /// Failures never propagate: cached data stays, the status flips to
    /// offline and a notification is raised when the backend was not
    /// already known to be offline.
    pub fn apply_update(&mut self, update: PollUpdate) {
        match update {
            PollUpdate::Violations(result) => match self.violations.apply(result).map(|_| ()) {
                Ok(_) => {
                    self.mark_online();
                    self.rescope();
                }
                Err(e) => self.mark_offline("Failed to load violations", &e),
            },
            PollUpdate::Videos(result) => match self.catalog.apply(result).map(|_| ()) {
                Ok(_) => {
                    self.mark_online();
                    if self.catalog.selected().is_none() {
                        let first = self.catalog.select_initial().map(|v| v.name.clone());
                        if let Some(name) = first {
                            self.select_video(&name);
                        }
                    }
                }
                Err(e) => self.mark_offline("Failed to load videos", &e),
            },
        }
    }

    fn mark_online(&mut self) {
        if self.status != ApiStatus::Online {
            tracing::info!("Backend online");
        }
        self.status = ApiStatus::Online;
    }

    fn mark_offline(&mut self, message: &str, error: &FetchError) {
        tracing::error!(error = %error, reason = ?error.reason(), "{}", message);
        if self.status != ApiStatus::Offline {
            self.notifications.push(NotificationLevel::Danger, message);
        }
        self.status = ApiStatus::Offline;
    }

    /// Open a video: load it into the player and rebuild its timeline.
    pub fn select_video(&mut self, name: &str) {
        let descriptor = self.catalog.select(name).clone();
        tracing::info!(video = %descriptor.name, "Video selected");

        self.playback.load(MediaSource {
            url: self.endpoints.video(&descriptor.name),
            name: descriptor.name.clone(),
            duration_hint: descriptor.duration,
        });
        self.timeline.reset_duration();
        self.timeline.advance_cursor(0.0);
        self.rescope();

        self.metadata = None;
        self.pending_metadata = Some(descriptor.name.clone());
        self.notifications.push(
            NotificationLevel::Success,
            format!("Loaded video: {}", descriptor.name),
        );
    }

    fn rescope(&mut self) {
        if let Some(video) = self.catalog.selected() {
            let scoped = self.violations.scope_to_video(&video.name);
            self.timeline.set_scoped_violations(scoped);
        }
    }

    /// Video whose metadata still has to be fetched, if any
    pub fn take_metadata_request(&mut self) -> Option<String> {
        self.pending_metadata.take()
    }

    /// Store fetched metadata if it still belongs to the selected video.
    /// Failures are logged and otherwise ignored.
    pub fn apply_metadata(&mut self, name: &str, result: Result<VideoMetadata, FetchError>) {
        match result {
            Ok(metadata) if self.selected_video().is_some_and(|v| v.name == name) => {
                self.metadata = Some(metadata);
            }
            Ok(_) => tracing::debug!(video = %name, "Discarding metadata of deselected video"),
            Err(e) => tracing::warn!(video = %name, error = %e, "Failed to load video metadata"),
        }
    }

    /// Poll the player and feed its notifications to the timeline.
    pub fn pump_playback(&mut self) {
        self.playback.tick();
        for event in self.playback_events.try_iter() {
            match event {
                PlaybackEvent::MetadataReady { duration } => self.timeline.set_duration(duration),
                PlaybackEvent::TimeChanged { time } => self.timeline.advance_cursor(time),
                PlaybackEvent::SourceChanged { name } => {
                    tracing::debug!(video = %name, "Player source changed");
                }
            }
        }
    }

    /// Timeline click or marker click
    pub fn activate(&mut self, activation: &Activation) -> Option<SeekRequest> {
        self.timeline.activate_at(activation, &mut self.playback)
    }

    /// Jump to a violation and start playing. Records without a timestamp are ignored.
    pub fn seek_to_violation(&mut self, record: &ViolationRecord) -> Option<SeekRequest> {
        let time = record.offset()?;
        if let Err(e) = self.playback.seek(time).and_then(|_| self.playback.play()) {
            tracing::warn!(error = %e, time, "Cannot jump to violation");
            return None;
        }
        Some(SeekRequest {
            time,
            highlight: Some(record.clone()),
        })
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) {
        let result = match shortcut {
            Shortcut::TogglePlay => self.playback.toggle_play(),
            Shortcut::SkipBack => self.playback.seek_by(-SKIP_SECONDS),
            Shortcut::SkipForward => self.playback.seek_by(SKIP_SECONDS),
            Shortcut::ToggleFullscreen => {
                self.playback.toggle_fullscreen();
                Ok(())
            }
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, ?shortcut, "Shortcut ignored");
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        if let Err(e) = self.playback.set_rate(rate) {
            tracing::warn!(error = %e, "Rate change rejected");
        }
    }

    /// URL of a violation's evidence image; warns when there is none
    pub fn evidence_image_url(&mut self, record: &ViolationRecord) -> Option<String> {
        match record.image.as_deref().filter(|i| !i.is_empty()) {
            Some(image) => Some(self.endpoints.image(image)),
            None => {
                self.notifications
                    .push(NotificationLevel::Warning, "No evidence image available");
                None
            }
        }
    }

    /// Download URL of the selected video; warns when nothing is selected
    pub fn download_url(&mut self) -> Option<String> {
        match self.catalog.selected() {
            Some(video) => Some(self.endpoints.video(&video.name)),
            None => {
                self.notifications
                    .push(NotificationLevel::Warning, "No video selected");
                None
            }
        }
    }

    pub fn violation_stats(&self, day: &str) -> ViolationStats {
        self.violations.stats(day)
    }

    pub fn selected_video(&self) -> Option<&VideoDescriptor> {
        self.catalog.selected()
    }

    pub fn violations(&self) -> &ViolationStore {
        &self.violations
    }

    pub fn catalog(&self) -> &VideoCatalog {
        &self.catalog
    }

    pub fn timeline(&self) -> &TimelineSynchronizer {
        &self.timeline
    }

    pub fn playback(&self) -> &PlaybackController<P> {
        &self.playback
    }

    pub fn status(&self) -> ApiStatus {
        self.status
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ClockPlayer;
    use crate::testing::FakeBackend;
    use std::time::Duration;

    fn session() -> Session<ClockPlayer> {
        Session::new(
            Endpoints::new("http://localhost:5000"),
            ClockPlayer::new(),
            Notifications::new(Duration::from_secs(3)),
        )
    }

    fn video(name: &str, duration: Option<f64>) -> VideoDescriptor {
        VideoDescriptor {
            duration,
            ..VideoDescriptor::new(name, 4096, 1_700_000_000.0)
        }
    }

    fn violation(video: &str, timestamp: f64) -> ViolationRecord {
        ViolationRecord {
            timestamp: Some(timestamp),
            video: Some(video.to_string()),
            image: Some(format!("{}_{}.jpg", video, timestamp)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_marker_seek() {
        let backend = FakeBackend::new();
        backend.set_videos(Ok(vec![video("cam1_clip.mp4", Some(60.0))]));
        backend.set_violations(Ok(vec![violation("cam1_clip", 30.0)]));
        backend.set_metadata(Ok(VideoMetadata {
            size: 4096,
            created: 1_700_000_000.0,
        }));

        let mut session = session();
        session.refresh_all(&backend).await;
        session.pump_playback();

        assert_eq!(session.selected_video().unwrap().name, "cam1_clip.mp4");
        assert_eq!(session.timeline().scoped_violations().len(), 1);
        assert_eq!(session.timeline().duration(), Some(60.0));
        assert_eq!(session.metadata().unwrap().size, 4096);
        assert_eq!(backend.metadata_calls(), 1);

        let marker = session.timeline().markers()[0].clone();
        assert_eq!(marker.position_fraction, 0.5);

        let request = session.activate(&Activation::Marker(marker)).unwrap();
        assert_eq!(request.time, 30.0);
        assert_eq!(session.playback().current_time(), 30.0);

        session.pump_playback();
        assert_eq!(session.timeline().indicator_fraction(), 0.5);
    }

    #[tokio::test]
    async fn test_server_error_keeps_previous_violations() {
        let backend = FakeBackend::new();
        backend.set_videos(Ok(vec![video("cam1_clip.mp4", Some(60.0))]));
        backend.set_violations(Ok(vec![violation("cam1_clip", 30.0)]));

        let mut session = session();
        session.refresh_all(&backend).await;
        assert_eq!(session.status(), ApiStatus::Online);

        backend.set_violations(Err(FetchError::Status {
            status: 500,
            body: "Internal Server Error".into(),
        }));
        session.refresh_all(&backend).await;

        assert_eq!(session.status(), ApiStatus::Offline);
        assert_eq!(session.violations().len(), 1);
        assert_eq!(session.timeline().scoped_violations().len(), 1);
        assert!(session
            .notifications()
            .iter()
            .any(|n| n.level == NotificationLevel::Danger));
    }

    #[test]
    fn test_offline_notification_only_on_transition() {
        let mut session = session();
        for _ in 0..3 {
            session.apply_update(PollUpdate::Videos(Err(FetchError::Network(
                "refused".into(),
            ))));
        }
        let dangers = session
            .notifications()
            .iter()
            .filter(|n| n.level == NotificationLevel::Danger)
            .count();
        assert_eq!(dangers, 1);

        session.apply_update(PollUpdate::Videos(Ok(Vec::new())));
        assert_eq!(session.status(), ApiStatus::Online);
    }

    #[test]
    fn test_switching_video_rescopes_and_resets_timeline() {
        let mut session = session();
        session.apply_update(PollUpdate::Videos(Ok(vec![
            video("cam1.mp4", Some(60.0)),
            video("cam2.mp4", None),
        ])));
        session.apply_update(PollUpdate::Violations(Ok(vec![
            violation("cam1", 10.0),
            violation("cam1", 20.0),
            violation("cam2", 5.0),
        ])));
        session.pump_playback();
        assert_eq!(session.timeline().markers().len(), 2);

        session.select_video("cam2.mp4");
        session.pump_playback();
        assert_eq!(session.timeline().scoped_violations().len(), 1);
        // No duration known for cam2: no markers
        assert!(session.timeline().markers().is_empty());
        assert_eq!(session.timeline().cursor(), 0.0);
    }

    #[test]
    fn test_selection_sticky_across_catalog_refresh() {
        let mut session = session();
        session.apply_update(PollUpdate::Videos(Ok(vec![
            video("a.mp4", None),
            video("b.mp4", None),
        ])));
        session.select_video("b.mp4");
        session.apply_update(PollUpdate::Videos(Ok(vec![
            video("a.mp4", None),
            video("b.mp4", None),
        ])));
        assert_eq!(session.selected_video().unwrap().name, "b.mp4");
    }

    #[test]
    fn test_metadata_for_stale_selection_is_dropped() {
        let mut session = session();
        session.apply_update(PollUpdate::Videos(Ok(vec![
            video("a.mp4", None),
            video("b.mp4", None),
        ])));
        assert_eq!(session.take_metadata_request().as_deref(), Some("a.mp4"));
        session.select_video("b.mp4");

        let metadata = VideoMetadata {
            size: 1,
            created: 0.0,
        };
        session.apply_metadata("a.mp4", Ok(metadata));
        assert!(session.metadata().is_none());
        session.apply_metadata("b.mp4", Err(FetchError::Decode("eof".into())));
        assert!(session.metadata().is_none());
        session.apply_metadata("b.mp4", Ok(metadata));
        assert_eq!(session.metadata(), Some(&metadata));
    }

    #[test]
    fn test_seek_to_violation_plays() {
        let mut session = session();
        session.apply_update(PollUpdate::Videos(Ok(vec![video("cam1.mp4", Some(60.0))])));

        let request = session.seek_to_violation(&violation("cam1", 42.0)).unwrap();
        assert_eq!(request.time, 42.0);
        assert!(session.playback().player().is_playing());

        let untimed = ViolationRecord::default();
        assert!(session.seek_to_violation(&untimed).is_none());
    }

    #[test]
    fn test_shortcuts() {
        let mut session = session();
        session.apply_update(PollUpdate::Videos(Ok(vec![video("cam1.mp4", Some(60.0))])));
        session.pump_playback();
        session.activate(&Activation::Track(0.5));
        session.handle_shortcut(Shortcut::SkipForward);
        assert_eq!(session.playback().current_time(), 35.0);
        session.handle_shortcut(Shortcut::SkipBack);
        session.handle_shortcut(Shortcut::SkipBack);
        assert_eq!(session.playback().current_time(), 25.0);
        session.handle_shortcut(Shortcut::ToggleFullscreen);
        assert!(session.playback().player().is_fullscreen());
    }

    #[test]
    fn test_evidence_and_download_urls() {
        let mut session = session();
        assert!(session.download_url().is_none());
        assert!(session.evidence_image_url(&ViolationRecord::default()).is_none());
        assert_eq!(session.notifications().len(), 2);

        session.apply_update(PollUpdate::Videos(Ok(vec![video("cam1.mp4", None)])));
        assert_eq!(
            session.download_url().as_deref(),
            Some("http://localhost:5000/evidence/videos/cam1.mp4")
        );
        assert_eq!(
            session.evidence_image_url(&violation("cam1", 3.0)).as_deref(),
            Some("http://localhost:5000/evidence/images/cam1_3.jpg")
        );
    }
}
