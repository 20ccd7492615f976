//! The open canvas with everything the editor tracks around it.

use tokio::sync::mpsc::UnboundedSender;

use crate::constants::{DEFAULT_PIXELS_PER_SECOND, FALLBACK_CANVAS_HEIGHT, FALLBACK_CANVAS_WIDTH};
use crate::core::interaction::{drop_bounds, InteractionController};
use crate::core::media::VideoProbe;
use crate::core::playback::{MediaCommand, PlaybackEvent, PlaybackScheduler};
use crate::core::storage::StorageError;
use crate::core::timeline_view;
use crate::state::{
    BoundsEdit, CanvasDocument, CanvasRecord, MediaFile, QuickAddDefaults, QuickAddRequest, ResizeHandle,
    SelectionState,
};

/// Save in flight: which opened document it belongs to and the revision it
/// captured.
#[derive(Debug, Clone, Copy)]
struct PendingSave {
    generation: u64,
    revision: u64,
}

/// Editor state for one open canvas. Owned by the UI root and handed to
/// every component through a signal.
pub struct EditorSession {
    pub doc: CanvasDocument,
    pub playback: PlaybackScheduler,
    pub interaction: InteractionController,
    pub selection: SelectionState,
    pub quick_add: Option<QuickAddRequest>,
    pub quick_defaults: QuickAddDefaults,
    pub aspect_locked: bool,
    pub pixels_per_second: f64,
    revision: u64,
    saved_revision: u64,
    /// Bumped every time a document is opened.
    generation: u64,
    saving: Option<PendingSave>,
}

impl EditorSession {
    pub fn new(events: UnboundedSender<PlaybackEvent>) -> Self {
        Self {
            doc: CanvasDocument::new("Untitled"),
            playback: PlaybackScheduler::with_sender(events),
            interaction: InteractionController::default(),
            selection: SelectionState::default(),
            quick_add: None,
            quick_defaults: QuickAddDefaults::default(),
            aspect_locked: false,
            pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
            revision: 0,
            saved_revision: 0,
            generation: 0,
            saving: None,
        }
    }

    /// Replace the open document; playback and transient UI state reset.
    /// A save still in flight stays pending so saves never overlap, but its
    /// outcome no longer touches the new document.
    pub fn open_document(&mut self, doc: CanvasDocument) {
        self.playback.stop();
        self.interaction.end();
        self.selection.clear();
        self.quick_add = None;
        self.doc = doc;
        self.revision = 0;
        self.saved_revision = 0;
        self.generation += 1;
    }

    /// Start a fresh, unsaved template.
    pub fn new_document(&mut self, name: &str) {
        self.open_document(CanvasDocument::new(name));
    }

    /// Open the result of a storage lookup. A missing canvas opens as an
    /// empty document under the requested id; other errors are returned.
    pub fn open_loaded(&mut self, id: &str, loaded: Result<CanvasRecord, StorageError>) -> Result<(), StorageError> {
        match loaded {
            Ok(record) => {
                self.open_document(CanvasDocument::from_record(record));
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(canvas_id = %id, "Canvas not found; starting empty");
                let mut doc = CanvasDocument::new("Untitled");
                doc.id = id.to_string();
                self.open_document(doc);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    // =========================================================================
    // Dirty tracking and saving
    // =========================================================================

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    /// Snapshot for saving, or `None` while another save is in flight.
    pub fn begin_save(&mut self) -> Option<CanvasRecord> {
        if self.saving.is_some() {
            return None;
        }
        self.saving = Some(PendingSave {
            generation: self.generation,
            revision: self.revision,
        });
        Some(self.doc.to_record())
    }

    /// Finish the in-flight save. Edits made meanwhile keep the session dirty;
    /// a failure leaves everything as it was. A save of a document that has
    /// since been replaced only releases the in-flight flag.
    pub fn finish_save(&mut self, succeeded: bool) {
        let Some(pending) = self.saving.take() else {
            return;
        };
        if succeeded && pending.generation == self.generation {
            self.saved_revision = pending.revision;
        }
    }

    // =========================================================================
    // Canvas
    // =========================================================================

    pub fn rename(&mut self, name: &str) {
        if self.doc.name != name {
            self.doc.name = name.to_string();
            self.touch();
        }
    }

    /// Apply size fields as typed; unparsable input becomes 640x360.
    pub fn set_dimensions_input(&mut self, width: &str, height: &str) {
        let width = parse_dimension(width, FALLBACK_CANVAS_WIDTH);
        let height = parse_dimension(height, FALLBACK_CANVAS_HEIGHT);
        if (width, height) != (self.doc.width, self.doc.height) {
            self.doc.set_dimensions(width, height);
            self.touch();
        }
    }

    /// Remove every element and slot.
    pub fn reset(&mut self) {
        self.playback.stop();
        self.interaction.end();
        self.selection.clear();
        if !self.doc.is_empty() {
            self.doc.clear();
            self.touch();
        }
    }

    // =========================================================================
    // Adding and removing elements
    // =========================================================================

    /// Place a gallery file at a canvas-local point. Returns the new id.
    pub fn add_dropped_file(&mut self, file: &MediaFile, local: (f64, f64)) -> String {
        let bounds = drop_bounds(local, &self.quick_defaults, self.doc.width, self.doc.height);
        let id = self
            .doc
            .append_item(file.id.clone(), bounds, self.quick_defaults.duration_seconds);
        self.selection.select_element(id.clone());
        self.touch();
        tracing::info!(element_id = %id, file_id = %file.id, "Element dropped");
        id
    }

    pub fn open_quick_add(&mut self, file: &MediaFile) {
        self.selection.select_file(file.id.clone());
        self.quick_add = Some(QuickAddRequest::open(
            file,
            self.doc.width,
            self.doc.height,
            self.quick_defaults.duration_seconds,
        ));
    }

    pub fn cancel_quick_add(&mut self) {
        self.quick_add = None;
    }

    /// Create the element described by the open quick-add modal.
    pub fn confirm_quick_add(&mut self) -> Option<String> {
        let request = self.quick_add.take()?;
        let bounds = request.placement(self.doc.width, self.doc.height);
        let id = self
            .doc
            .append_item(request.file_id.clone(), bounds, request.effective_duration());
        self.quick_defaults.remember(&request);
        self.selection.select_element(id.clone());
        self.touch();
        Some(id)
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        if !self.doc.remove_item(id) {
            return false;
        }
        self.selection.remove_element(id);
        if self.interaction.active().is_some_and(|gesture| gesture.element_id == id) {
            self.interaction.end();
        }
        if self.doc.is_empty() {
            self.playback.stop();
        }
        self.touch();
        true
    }

    pub fn remove_selected(&mut self) -> bool {
        match self.selection.primary_element().map(str::to_string) {
            Some(id) => self.remove_element(&id),
            None => false,
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn begin_move(&mut self, id: &str, pointer: (f64, f64)) {
        self.selection.select_element(id);
        self.interaction.begin_move(&self.doc, id, pointer.0, pointer.1);
    }

    pub fn begin_resize(&mut self, id: &str, handle: ResizeHandle, pointer: (f64, f64)) {
        self.selection.select_element(id);
        self.interaction.begin_resize(&self.doc, id, handle, pointer.0, pointer.1);
    }

    pub fn pointer_move(&mut self, pointer: (f64, f64)) {
        if self
            .interaction
            .pointer_move(&mut self.doc, pointer.0, pointer.1, self.aspect_locked)
        {
            self.touch();
        }
    }

    pub fn end_gesture(&mut self) {
        self.interaction.end();
    }

    pub fn toggle_full_canvas(&mut self, id: &str) {
        if self.doc.toggle_full_canvas(id) {
            self.touch();
        }
    }

    pub fn set_explicit_bounds(&mut self, id: &str, edit: BoundsEdit) {
        if self.doc.set_explicit_bounds(id, edit) {
            self.touch();
        }
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    pub fn set_duration(&mut self, id: &str, seconds: f64) {
        if self.doc.set_duration(id, seconds) {
            self.touch();
        }
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if self.doc.reorder(from, to) {
            self.touch();
        }
    }

    /// Apply a finished probe of the video behind `element_id`.
    pub fn apply_video_probe(&mut self, element_id: &str, probe: VideoProbe) {
        if let Some(seconds) = probe.rounded_duration_seconds() {
            self.quick_defaults.duration_seconds = seconds;
            if self.doc.set_duration(element_id, seconds) {
                self.touch();
            }
        }
        if probe.matches_aspect(self.doc.width, self.doc.height) {
            self.quick_defaults.width = self.doc.width as f64;
            self.quick_defaults.height = self.doc.height as f64;
            if self.doc.expand_to_full_canvas(element_id) {
                self.touch();
            }
        }
    }

    pub fn zoom_in(&mut self) {
        self.pixels_per_second = timeline_view::zoom_in(self.pixels_per_second);
    }

    pub fn zoom_out(&mut self) {
        self.pixels_per_second = timeline_view::zoom_out(self.pixels_per_second);
    }

    pub fn set_zoom_input(&mut self, input: &str) {
        self.pixels_per_second = timeline_view::manual_zoom(input);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    pub fn toggle_play(&mut self) {
        self.playback.toggle(&self.doc);
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn seek(&mut self, ms: f64) {
        self.playback.seek(&self.doc, ms);
    }

    /// Timeline card click.
    pub fn select_card(&mut self, index: usize) {
        if let Some(item) = self.doc.item_at(index) {
            let id = item.id().to_string();
            self.selection.select_element(id);
            self.playback.jump_to(&self.doc, index);
        }
    }

    pub fn handle_playback_event(&mut self, event: PlaybackEvent) -> bool {
        self.playback.handle_event(&self.doc, event)
    }

    pub fn needs_media_sync(&self) -> bool {
        self.playback.needs_media_sync(&self.doc)
    }

    /// Pending `<video>` commands, given the gallery to tell videos apart.
    pub fn take_media_sync(&mut self, files: &[MediaFile]) -> Option<Vec<MediaCommand>> {
        self.playback
            .take_media_sync(&self.doc, |file_id| files.iter().any(|f| f.id == file_id && f.is_video()))
    }
}

fn parse_dimension(input: &str, fallback: u32) -> u32 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 => value.round().min(u32::MAX as f64) as u32,
        Ok(value) if value.is_finite() => 1,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Bounds;

    fn session() -> EditorSession {
        let (events, _receiver) = tokio::sync::mpsc::unbounded_channel();
        EditorSession::new(events)
    }

    fn video(id: &str) -> MediaFile {
        MediaFile {
            id: id.into(),
            name: format!("{id}.mp4"),
            mime_type: "video/mp4".into(),
            url: format!("/tmp/{id}.mp4"),
        }
    }

    #[tokio::test]
    async fn test_drop_creates_pair_and_marks_dirty() {
        let mut session = session();
        assert!(!session.is_dirty());
        let id = session.add_dropped_file(&video("f1"), (40.0, 60.0));
        assert!(session.is_dirty());
        assert_eq!(session.selection.primary_element(), Some(id.as_str()));
        assert_eq!(session.doc.find_element(&id).unwrap().bounds(), Bounds::new(40.0, 60.0, 200.0, 120.0));
        assert_eq!(session.doc.timeline()[0].duration_seconds, 5.0);
    }

    #[tokio::test]
    async fn test_probe_updates_duration_and_expands_on_aspect_match() {
        let mut session = session();
        let id = session.add_dropped_file(&video("f1"), (10.0, 10.0));
        session.apply_video_probe(
            &id,
            VideoProbe {
                duration_seconds: Some(12.2),
                width: Some(1920),
                height: Some(1080),
            },
        );
        assert_eq!(session.doc.timeline()[0].duration_seconds, 13.0);
        let element = session.doc.find_element(&id).unwrap();
        assert!(element.full_canvas);
        assert_eq!(element.bounds(), Bounds::new(0.0, 0.0, 1280.0, 720.0));
        assert_eq!(session.quick_defaults.duration_seconds, 13.0);
        assert_eq!(session.quick_defaults.width, 1280.0);
    }

    #[tokio::test]
    async fn test_probe_with_other_aspect_keeps_geometry() {
        let mut session = session();
        let id = session.add_dropped_file(&video("f1"), (10.0, 10.0));
        session.apply_video_probe(
            &id,
            VideoProbe {
                duration_seconds: Some(3.0),
                width: Some(1080),
                height: Some(1920),
            },
        );
        let element = session.doc.find_element(&id).unwrap();
        assert!(!element.full_canvas);
        assert_eq!(element.w, 200.0);
    }

    #[tokio::test]
    async fn test_save_is_not_reentrant_and_failure_keeps_dirty() {
        let mut session = session();
        session.rename("Lobby");
        let record = session.begin_save().unwrap();
        assert_eq!(record.name, "Lobby");
        assert!(session.begin_save().is_none());
        assert!(session.is_saving());

        session.finish_save(false);
        assert!(session.is_dirty());
        assert!(!session.is_saving());

        session.begin_save().unwrap();
        session.finish_save(true);
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_edit_during_save_stays_dirty() {
        let mut session = session();
        session.rename("A");
        session.begin_save().unwrap();
        session.rename("B");
        session.finish_save(true);
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_save_survives_switching_canvas() {
        let mut session = session();
        session.rename("A");
        session.begin_save().unwrap();

        session.new_document("B");
        session.rename("B2");
        assert!(session.is_saving());
        assert!(session.begin_save().is_none());

        // The save of A lands after B was opened; B stays dirty.
        session.finish_save(true);
        assert!(!session.is_saving());
        assert!(session.is_dirty());

        let record = session.begin_save().unwrap();
        assert_eq!(record.name, "B2");
        session.finish_save(false);
        assert!(session.is_dirty());
        session.begin_save().unwrap();
        session.finish_save(true);
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_missing_canvas_opens_empty_with_id() {
        let mut session = session();
        session
            .open_loaded("canvas-42", Err(StorageError::not_found("canvas", "canvas-42")))
            .unwrap();
        assert_eq!(session.doc.id, "canvas-42");
        assert!(session.doc.is_empty());

        let err = session.open_loaded("x", Err(StorageError::Unavailable("offline".into())));
        assert!(err.is_err());
        assert_eq!(session.doc.id, "canvas-42");
    }

    #[tokio::test]
    async fn test_dimension_inputs() {
        let mut session = session();
        session.set_dimensions_input("1920", "1080");
        assert_eq!((session.doc.width, session.doc.height), (1920, 1080));
        session.set_dimensions_input("wide", "");
        assert_eq!((session.doc.width, session.doc.height), (640, 360));
        session.set_dimensions_input("0", "99999");
        assert_eq!((session.doc.width, session.doc.height), (1, 10_000));
    }

    #[tokio::test]
    async fn test_quick_add_confirm_and_remove_selected() {
        let mut session = session();
        session.open_quick_add(&video("f1"));
        let id = session.confirm_quick_add().unwrap();
        assert!(session.quick_add.is_none());
        assert_eq!(session.doc.find_element(&id).unwrap().x, 540.0);

        assert!(session.remove_selected());
        assert!(session.doc.is_empty());
        assert!(!session.remove_selected());
    }

    #[tokio::test]
    async fn test_gesture_marks_dirty() {
        let mut session = session();
        let id = session.add_dropped_file(&video("f1"), (0.0, 0.0));
        session.begin_save().unwrap();
        session.finish_save(true);

        session.begin_resize(&id, ResizeHandle::Br, (100.0, 100.0));
        session.begin_move(&id, (100.0, 100.0));
        session.pointer_move((120.0, 110.0));
        session.end_gesture();
        assert!(session.is_dirty());
        assert_eq!(session.doc.find_element(&id).unwrap().bounds(), Bounds::new(0.0, 0.0, 220.0, 130.0));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut session = session();
        session.add_dropped_file(&video("f1"), (0.0, 0.0));
        session.add_dropped_file(&video("f2"), (0.0, 0.0));
        session.toggle_play();
        session.reset();
        assert!(session.doc.is_empty());
        assert!(!session.playback.is_playing());
        assert!(session.selection.primary_element().is_none());
    }
}
