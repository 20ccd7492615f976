//! Timeline playback scheduler.
//!
//! Two cancellable tasks drive playback: a one-shot transition timer for the
//! current item and a frame sampler that publishes the scrub position. Both
//! report back through a channel tagged with the scheduling epoch; events from
//! an older epoch are ignored, and every state transition starts by cancelling
//! both tasks.

use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::constants::PLAYBACK_FRAME_INTERVAL_MS;
use crate::state::CanvasDocument;

/// Message sent by the scheduler tasks to their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The current item's display time is over.
    Advance { epoch: u64 },
    /// Time to refresh the scrub position.
    Frame { epoch: u64 },
}

/// Instruction for a `<video>` node backing an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCommand {
    /// Rewind to 0 and play.
    Restart(String),
    /// Pause and rewind to 0.
    PauseAndRewind(String),
}

/// Observable playback state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub looping: bool,
    pub current_index: Option<usize>,
    pub elapsed_ms: f64,
}

/// What the `<video>` nodes were last synchronised to: play state, index and
/// the element at that index.
type SyncKey = (bool, Option<usize>, Option<String>);

pub struct PlaybackScheduler {
    state: PlaybackState,
    epoch: u64,
    /// Timeline position at `anchor`
    base_ms: f64,
    anchor: Instant,
    item_start_ms: f64,
    item_end_ms: f64,
    /// When the pending transition is due
    deadline: Instant,
    transition: Option<JoinHandle<()>>,
    sampler: Option<JoinHandle<()>>,
    events: UnboundedSender<PlaybackEvent>,
    last_synced: Option<SyncKey>,
}

impl PlaybackScheduler {
    /// Create a stopped scheduler and the receiver its tasks report to.
    pub fn new() -> (Self, UnboundedReceiver<PlaybackEvent>) {
        let (events, receiver) = unbounded_channel();
        (Self::with_sender(events), receiver)
    }

    /// Create a stopped scheduler reporting to an existing channel.
    pub fn with_sender(events: UnboundedSender<PlaybackEvent>) -> Self {
        let now = Instant::now();
        Self {
            state: PlaybackState::default(),
            epoch: 0,
            base_ms: 0.0,
            anchor: now,
            item_start_ms: 0.0,
            item_end_ms: 0.0,
            deadline: now,
            transition: None,
            sampler: None,
            events,
            last_synced: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.state.elapsed_ms
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Takes effect at the next wrap decision.
    pub fn set_loop(&mut self, looping: bool) {
        self.state.looping = looping;
    }

    /// Abort both tasks and invalidate anything they already queued.
    pub fn cancel_all_timers(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(handle) = self.transition.take() {
            handle.abort();
        }
        if let Some(handle) = self.sampler.take() {
            handle.abort();
        }
    }

    /// Start playing at the beginning of `from_index`. No-op on an empty timeline.
    pub fn play(&mut self, doc: &CanvasDocument, from_index: usize) {
        if doc.is_empty() {
            return;
        }
        self.cancel_all_timers();
        let index = from_index.min(doc.len() - 1);
        self.state.is_playing = true;
        tracing::debug!(index, epoch = self.epoch, "Playback started");
        self.start_item(doc, index, Instant::now());
        self.spawn_sampler();
    }

    /// Play from the retained index, or pause when already playing.
    pub fn toggle(&mut self, doc: &CanvasDocument) {
        if self.state.is_playing {
            self.pause();
        } else {
            let index = self.state.current_index.unwrap_or(0);
            self.play(doc, index);
        }
    }

    /// Same as `stop` except that the current index is kept. There is no
    /// mid-item resume: the scrub position returns to the start of that item
    /// and the next `play` starts it over.
    pub fn pause(&mut self) {
        self.cancel_all_timers();
        self.state.is_playing = false;
        if self.state.current_index.is_some() {
            self.state.elapsed_ms = self.item_start_ms;
        }
        tracing::debug!(index = ?self.state.current_index, "Playback paused");
    }

    pub fn stop(&mut self) {
        self.cancel_all_timers();
        self.state.is_playing = false;
        self.state.current_index = None;
        self.state.elapsed_ms = 0.0;
        self.base_ms = 0.0;
        self.item_start_ms = 0.0;
        self.item_end_ms = 0.0;
        tracing::debug!("Playback stopped");
    }

    /// Jump to the item containing `ms`. Returns false when `ms` is past the
    /// end of the timeline or the timeline is empty.
    pub fn seek(&mut self, doc: &CanvasDocument, ms: f64) -> bool {
        if doc.is_empty() {
            return false;
        }
        let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        let Some(index) = doc.index_at_ms(ms) else {
            return false;
        };

        self.state.current_index = Some(index);
        self.state.elapsed_ms = ms;
        self.item_start_ms = doc.cumulative_offset_ms(index);
        self.item_end_ms = self.item_start_ms + doc.duration_ms_at(index).unwrap_or(0.0);

        if self.state.is_playing {
            self.cancel_all_timers();
            let now = Instant::now();
            self.base_ms = ms;
            self.anchor = now;
            self.deadline = now + ms_to_duration(self.item_end_ms - ms);
            self.spawn_transition();
            self.spawn_sampler();
            tracing::debug!(index, ms, epoch = self.epoch, "Playback seeked");
        }
        true
    }

    /// Timeline card click: restart from `index` while playing, otherwise
    /// move the scrub position to its start.
    pub fn jump_to(&mut self, doc: &CanvasDocument, index: usize) {
        if index >= doc.len() {
            return;
        }
        if self.state.is_playing {
            self.play(doc, index);
        } else {
            self.seek(doc, doc.cumulative_offset_ms(index));
        }
    }

    /// Apply an event from the scheduler tasks. Returns true when the
    /// observable state changed.
    pub fn handle_event(&mut self, doc: &CanvasDocument, event: PlaybackEvent) -> bool {
        match event {
            PlaybackEvent::Frame { epoch } => {
                if epoch != self.epoch || !self.state.is_playing {
                    return false;
                }
                let elapsed = self.base_ms + Instant::now().saturating_duration_since(self.anchor).as_secs_f64() * 1000.0;
                self.state.elapsed_ms = elapsed.min(self.item_end_ms);
                true
            }
            PlaybackEvent::Advance { epoch } => {
                if epoch != self.epoch || !self.state.is_playing {
                    return false;
                }
                self.advance(doc);
                true
            }
        }
    }

    /// Element shown while playing; every other element is hidden.
    pub fn active_element_id<'a>(&self, doc: &'a CanvasDocument) -> Option<&'a str> {
        self.state
            .current_index
            .and_then(|index| doc.item_at(index))
            .map(|item| item.id())
    }

    pub fn is_element_visible(&self, doc: &CanvasDocument, element_id: &str) -> bool {
        !self.state.is_playing || self.active_element_id(doc) == Some(element_id)
    }

    fn sync_key(&self, doc: &CanvasDocument) -> SyncKey {
        (
            self.state.is_playing,
            self.state.current_index,
            self.active_element_id(doc).map(str::to_string),
        )
    }

    pub fn needs_media_sync(&self, doc: &CanvasDocument) -> bool {
        self.last_synced.as_ref() != Some(&self.sync_key(doc))
    }

    /// Video commands for the current play state and active element, or
    /// `None` if neither changed since the last call. Timeline edits that
    /// put another element at the current index count as a change.
    pub fn take_media_sync<F>(&mut self, doc: &CanvasDocument, is_video: F) -> Option<Vec<MediaCommand>>
    where
        F: Fn(&str) -> bool,
    {
        let key = self.sync_key(doc);
        if self.last_synced.as_ref() == Some(&key) {
            return None;
        }
        self.last_synced = Some(key);

        let active = if self.state.is_playing {
            self.active_element_id(doc)
        } else {
            None
        };
        let commands = doc
            .elements()
            .filter(|element| is_video(&element.file_id))
            .map(|element| {
                if Some(element.id.as_str()) == active {
                    MediaCommand::Restart(element.id.clone())
                } else {
                    MediaCommand::PauseAndRewind(element.id.clone())
                }
            })
            .collect();
        Some(commands)
    }

    fn advance(&mut self, doc: &CanvasDocument) {
        let boundary = self.deadline;
        let next = self.state.current_index.map(|index| index + 1).unwrap_or(0);
        if next < doc.len() {
            self.start_item(doc, next, boundary);
        } else if self.state.looping && !doc.is_empty() {
            tracing::debug!("Playback wrapped to start");
            self.start_item(doc, 0, boundary);
        } else {
            self.stop();
        }
    }

    /// Show `index`, anchored at `start`, and schedule its transition.
    fn start_item(&mut self, doc: &CanvasDocument, index: usize, start: Instant) {
        let duration_ms = doc.duration_ms_at(index).unwrap_or(0.0);
        self.state.current_index = Some(index);
        self.item_start_ms = doc.cumulative_offset_ms(index);
        self.item_end_ms = self.item_start_ms + duration_ms;
        self.base_ms = self.item_start_ms;
        self.anchor = start;
        self.state.elapsed_ms = self.item_start_ms;
        self.deadline = start + ms_to_duration(duration_ms);
        tracing::debug!(index, duration_ms, "Showing timeline item");
        self.spawn_transition();
    }

    fn spawn_transition(&mut self) {
        if let Some(handle) = self.transition.take() {
            handle.abort();
        }
        let events = self.events.clone();
        let epoch = self.epoch;
        let deadline = self.deadline;
        self.transition = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(PlaybackEvent::Advance { epoch });
        }));
    }

    fn spawn_sampler(&mut self) {
        if let Some(handle) = self.sampler.take() {
            handle.abort();
        }
        let events = self.events.clone();
        let epoch = self.epoch;
        self.sampler = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(PLAYBACK_FRAME_INTERVAL_MS));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if events.send(PlaybackEvent::Frame { epoch }).is_err() {
                    break;
                }
            }
        }));
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.cancel_all_timers();
    }
}

fn ms_to_duration(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Bounds;

    fn doc_with_durations(durations: &[f64]) -> CanvasDocument {
        let mut doc = CanvasDocument::new("Playback");
        for (i, duration) in durations.iter().enumerate() {
            doc.append_item(format!("f{i}"), Bounds::new(0.0, 0.0, 100.0, 100.0), *duration);
        }
        doc
    }

    /// Advance the paused clock in small steps, feeding events back.
    async fn run_for(
        scheduler: &mut PlaybackScheduler,
        doc: &CanvasDocument,
        events: &mut UnboundedReceiver<PlaybackEvent>,
        ms: u64,
    ) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(10);
            tokio::time::advance(Duration::from_millis(step)).await;
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            while let Ok(event) = events.try_recv() {
                scheduler.handle_event(doc, event);
            }
            remaining -= step;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_looping_walk_through_items() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.set_loop(true);
        scheduler.play(&doc, 0);
        assert_eq!(scheduler.current_index(), Some(0));

        run_for(&mut scheduler, &doc, &mut events, 2_500).await;
        assert_eq!(scheduler.current_index(), Some(1));
        assert!((scheduler.elapsed_ms() - 2_500.0).abs() < 20.0);

        run_for(&mut scheduler, &doc, &mut events, 3_000).await;
        assert_eq!(scheduler.current_index(), Some(2));

        run_for(&mut scheduler, &doc, &mut events, 1_000).await;
        assert_eq!(scheduler.current_index(), Some(0));
        assert!(scheduler.is_playing());
        assert!(scheduler.elapsed_ms() < 1_000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_after_last_item_without_loop() {
        let doc = doc_with_durations(&[1.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.play(&doc, 0);

        run_for(&mut scheduler, &doc, &mut events, 2_100).await;
        assert!(!scheduler.is_playing());
        assert_eq!(scheduler.current_index(), None);
        assert_eq!(scheduler.elapsed_ms(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_twice_does_not_double_advance() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.play(&doc, 0);
        scheduler.play(&doc, 0);

        run_for(&mut scheduler, &doc, &mut events, 2_500).await;
        assert_eq!(scheduler.current_index(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_epoch_events_are_ignored() {
        let doc = doc_with_durations(&[2.0, 3.0]);
        let (mut scheduler, _events) = PlaybackScheduler::new();
        scheduler.play(&doc, 0);
        let stale = scheduler.epoch();
        scheduler.play(&doc, 0);

        assert!(!scheduler.handle_event(&doc, PlaybackEvent::Advance { epoch: stale }));
        assert_eq!(scheduler.current_index(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_while_playing_reschedules_remaining_time() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.play(&doc, 0);
        run_for(&mut scheduler, &doc, &mut events, 500).await;

        assert!(scheduler.seek(&doc, 4_500.0));
        assert_eq!(scheduler.current_index(), Some(1));
        assert_eq!(scheduler.elapsed_ms(), 4_500.0);

        run_for(&mut scheduler, &doc, &mut events, 400).await;
        assert_eq!(scheduler.current_index(), Some(1));
        run_for(&mut scheduler, &doc, &mut events, 200).await;
        assert_eq!(scheduler.current_index(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_selects_containing_interval() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        let (mut scheduler, _events) = PlaybackScheduler::new();
        for i in 0..doc.len() {
            let start = doc.cumulative_offset_ms(i);
            let end = doc.cumulative_offset_ms(i + 1);
            assert!(scheduler.seek(&doc, start));
            assert_eq!(scheduler.current_index(), Some(i));
            assert!(scheduler.seek(&doc, end - 0.5));
            assert_eq!(scheduler.current_index(), Some(i));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_past_end_and_empty_are_noops() {
        let doc = doc_with_durations(&[2.0]);
        let (mut scheduler, _events) = PlaybackScheduler::new();
        assert!(scheduler.seek(&doc, 1_000.0));
        assert!(!scheduler.seek(&doc, 9_000.0));
        assert_eq!(scheduler.current_index(), Some(0));
        assert_eq!(scheduler.elapsed_ms(), 1_000.0);

        let empty = CanvasDocument::new("Empty");
        let (mut idle, _rx) = PlaybackScheduler::new();
        idle.play(&empty, 0);
        assert!(!idle.is_playing());
        assert!(!idle.seek(&empty, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_while_stopped_schedules_nothing() {
        let doc = doc_with_durations(&[1.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.seek(&doc, 1_200.0);
        run_for(&mut scheduler, &doc, &mut events, 3_000).await;
        assert_eq!(scheduler.current_index(), Some(1));
        assert!(!scheduler.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_keeps_index_and_resumes_at_item_start() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.play(&doc, 0);
        run_for(&mut scheduler, &doc, &mut events, 2_500).await;

        scheduler.pause();
        assert!(!scheduler.is_playing());
        assert_eq!(scheduler.current_index(), Some(1));
        assert_eq!(scheduler.elapsed_ms(), 2_000.0);

        run_for(&mut scheduler, &doc, &mut events, 5_000).await;
        assert_eq!(scheduler.current_index(), Some(1));

        scheduler.toggle(&doc);
        assert!(scheduler.is_playing());
        run_for(&mut scheduler, &doc, &mut events, 2_900).await;
        assert_eq!(scheduler.current_index(), Some(1));
        run_for(&mut scheduler, &doc, &mut events, 200).await;
        assert_eq!(scheduler.current_index(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_change_applies_at_next_wrap() {
        let doc = doc_with_durations(&[1.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.set_loop(true);
        scheduler.play(&doc, 0);
        run_for(&mut scheduler, &doc, &mut events, 1_500).await;
        scheduler.set_loop(false);
        run_for(&mut scheduler, &doc, &mut events, 600).await;
        assert!(!scheduler.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_card() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        let (mut scheduler, mut events) = PlaybackScheduler::new();
        scheduler.jump_to(&doc, 2);
        assert_eq!(scheduler.current_index(), Some(2));
        assert_eq!(scheduler.elapsed_ms(), 5_000.0);
        assert!(!scheduler.is_playing());

        scheduler.play(&doc, 0);
        scheduler.jump_to(&doc, 1);
        run_for(&mut scheduler, &doc, &mut events, 2_900).await;
        assert_eq!(scheduler.current_index(), Some(1));
        run_for(&mut scheduler, &doc, &mut events, 200).await;
        assert_eq!(scheduler.current_index(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_sync_on_state_change_only() {
        let doc = doc_with_durations(&[1.0, 1.0]);
        let ids: Vec<String> = doc.timeline().into_iter().map(|item| item.id).collect();
        let (mut scheduler, _events) = PlaybackScheduler::new();
        let all_video = |_: &str| true;

        assert!(scheduler.needs_media_sync(&doc));
        let idle = scheduler.take_media_sync(&doc, all_video).unwrap();
        assert!(!scheduler.needs_media_sync(&doc));
        assert!(idle.iter().all(|command| matches!(command, MediaCommand::PauseAndRewind(_))));
        assert!(scheduler.take_media_sync(&doc, all_video).is_none());

        scheduler.play(&doc, 1);
        let playing = scheduler.take_media_sync(&doc, all_video).unwrap();
        assert!(playing.contains(&MediaCommand::Restart(ids[1].clone())));
        assert!(playing.contains(&MediaCommand::PauseAndRewind(ids[0].clone())));
        assert!(scheduler.is_element_visible(&doc, &ids[1]));
        assert!(!scheduler.is_element_visible(&doc, &ids[0]));

        let images_only = scheduler.take_media_sync(&doc, |_| false);
        assert!(images_only.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_sync_after_reorder_during_playback() {
        let mut doc = doc_with_durations(&[4.0, 4.0]);
        let ids: Vec<String> = doc.timeline().into_iter().map(|item| item.id).collect();
        let (mut scheduler, _events) = PlaybackScheduler::new();
        let all_video = |_: &str| true;

        scheduler.play(&doc, 0);
        scheduler.take_media_sync(&doc, all_video).unwrap();

        doc.reorder(0, 1);
        assert_eq!(scheduler.current_index(), Some(0));
        assert!(scheduler.needs_media_sync(&doc));
        let commands = scheduler.take_media_sync(&doc, all_video).unwrap();
        assert!(commands.contains(&MediaCommand::Restart(ids[1].clone())));
        assert!(commands.contains(&MediaCommand::PauseAndRewind(ids[0].clone())));
        assert!(scheduler.take_media_sync(&doc, all_video).is_none());
    }
}
