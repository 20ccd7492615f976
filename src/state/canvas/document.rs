use uuid::Uuid;

use crate::constants::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, MAX_CANVAS_DIMENSION, MIN_ITEM_DURATION_SECONDS,
};
use super::{Bounds, BoundsEdit, Element, ResizeHandle, TimedElement, TimelineItem};

/// A named, sized layout template plus its playback timeline.
///
/// Elements are stored in timeline order, so the position of a
/// [`TimedElement`] in `items` *is* its `order`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDocument {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    items: Vec<TimedElement>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            id: format!("canvas-{}", Uuid::new_v4()),
            name: "Untitled".to_string(),
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            items: Vec::new(),
        }
    }
}

impl CanvasDocument {
    /// Create an empty template with the default 1280x720 size.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a document from already paired items (timeline order).
    pub fn from_parts(id: String, name: String, width: u32, height: u32, items: Vec<TimedElement>) -> Self {
        Self {
            id,
            name,
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[TimedElement] {
        &self.items
    }

    /// Geometry view, in timeline order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.items.iter().map(|item| &item.element)
    }

    /// Geometry view sorted by paint order.
    pub fn elements_by_layer(&self) -> Vec<&Element> {
        let mut elements: Vec<&Element> = self.elements().collect();
        elements.sort_by_key(|element| element.layer);
        elements
    }

    /// Timeline view with dense `order` values.
    pub fn timeline(&self) -> Vec<TimelineItem> {
        self.items
            .iter()
            .enumerate()
            .map(|(order, item)| item.timeline_item(order))
            .collect()
    }

    pub fn find_element(&self, id: &str) -> Option<&Element> {
        self.items.iter().map(|item| &item.element).find(|element| element.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn item_at(&self, index: usize) -> Option<&TimedElement> {
        self.items.get(index)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.items
            .iter_mut()
            .map(|item| &mut item.element)
            .find(|element| element.id == id)
    }

    // =========================================================================
    // Canvas
    // =========================================================================

    /// Change the canvas size, each dimension clamped to `1..=10000`.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = clamp_dimension(width);
        self.height = clamp_dimension(height);
    }

    /// Remove every element and timeline slot.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Move relative to the gesture-start snapshot.
    pub fn move_element(&mut self, id: &str, start: &Element, dx: f64, dy: f64) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.apply_move(start, dx, dy);
                true
            }
            None => false,
        }
    }

    /// Resize relative to the gesture-start snapshot.
    pub fn resize_element(
        &mut self,
        id: &str,
        start: &Element,
        handle: ResizeHandle,
        dx: f64,
        dy: f64,
        aspect_locked: bool,
    ) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.apply_resize(start, handle, dx, dy, aspect_locked);
                true
            }
            None => false,
        }
    }

    /// Flip the full-canvas flag of an element.
    pub fn toggle_full_canvas(&mut self, id: &str) -> bool {
        let (width, height) = (self.width, self.height);
        match self.element_mut(id) {
            Some(element) => {
                let enabled = !element.full_canvas;
                element.set_full_canvas(enabled, width, height);
                true
            }
            None => false,
        }
    }

    /// Force an element to cover the whole canvas.
    pub fn expand_to_full_canvas(&mut self, id: &str) -> bool {
        let (width, height) = (self.width, self.height);
        match self.element_mut(id) {
            Some(element) => {
                element.set_full_canvas(true, width, height);
                true
            }
            None => false,
        }
    }

    pub fn set_explicit_bounds(&mut self, id: &str, edit: BoundsEdit) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.set_explicit_bounds(edit);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    /// Append a new element with its timeline slot. Returns the shared id.
    pub fn append_item(&mut self, file_id: impl Into<String>, bounds: Bounds, duration_seconds: f64) -> String {
        let element = Element::new(file_id, bounds, self.items.len() as i64);
        let id = element.id.clone();
        self.items.push(TimedElement::new(element, duration_seconds));
        id
    }

    /// Move the slot at `from` to `to`; orders are reassigned densely.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() {
            return false;
        }
        let to = to.min(self.items.len() - 1);
        if from == to {
            return false;
        }
        let moved = self.items.remove(from);
        self.items.insert(to, moved);
        true
    }

    /// Set the display duration of a slot, clamped to at least one second.
    pub fn set_duration(&mut self, id: &str, seconds: f64) -> bool {
        let seconds = if seconds.is_finite() { seconds } else { MIN_ITEM_DURATION_SECONDS };
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.duration_seconds = seconds.max(MIN_ITEM_DURATION_SECONDS);
                true
            }
            None => false,
        }
    }

    /// Delete a slot together with its element.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let len = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() < len
    }

    /// Milliseconds before the slot at `index` starts.
    pub fn cumulative_offset_ms(&self, index: usize) -> f64 {
        self.items.iter().take(index).map(TimedElement::duration_ms).sum()
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.cumulative_offset_ms(self.items.len())
    }

    pub fn duration_ms_at(&self, index: usize) -> Option<f64> {
        self.items.get(index).map(TimedElement::duration_ms)
    }

    /// Slot whose `[offset, offset + duration)` interval contains `ms`.
    pub fn index_at_ms(&self, ms: f64) -> Option<usize> {
        let mut cursor = 0.0;
        for (index, item) in self.items.iter().enumerate() {
            let item_ms = item.duration_ms();
            if ms < cursor + item_ms {
                return Some(index);
            }
            cursor += item_ms;
        }
        None
    }
}

fn clamp_dimension(value: u32) -> u32 {
    value.clamp(1, MAX_CANVAS_DIMENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn doc_with_durations(durations: &[f64]) -> CanvasDocument {
        let mut doc = CanvasDocument::new("Test");
        for (i, duration) in durations.iter().enumerate() {
            doc.append_item(format!("f{i}"), Bounds::new(0.0, 0.0, 100.0, 100.0), *duration);
        }
        doc
    }

    fn ids_match(doc: &CanvasDocument) -> bool {
        let element_ids: BTreeSet<String> = doc.elements().map(|e| e.id.clone()).collect();
        let timeline_ids: BTreeSet<String> = doc.timeline().into_iter().map(|t| t.id).collect();
        element_ids == timeline_ids
    }

    #[test]
    fn test_new_document_defaults() {
        let doc = CanvasDocument::new("Lobby");
        assert_eq!((doc.width, doc.height), (1280, 720));
        assert!(doc.is_empty());
        assert_eq!(doc.total_duration_ms(), 0.0);
    }

    #[test]
    fn test_append_pairs_element_and_slot() {
        let mut doc = doc_with_durations(&[2.0]);
        let id = doc.append_item("f9", Bounds::new(5.0, 5.0, 50.0, 50.0), 4.0);
        let timeline = doc.timeline();
        assert_eq!(timeline[1].id, id);
        assert_eq!(timeline[1].order, 1);
        assert_eq!(timeline[1].file_id, "f9");
        assert_eq!(doc.find_element(&id).map(|e| e.layer), Some(1));
        assert!(ids_match(&doc));
    }

    #[test]
    fn test_reorder_sequences_keep_dense_orders() {
        let mut doc = doc_with_durations(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let moves = [(0, 4), (3, 1), (4, 0), (2, 2), (1, 3), (9, 0), (0, 99)];
        for (from, to) in moves {
            doc.reorder(from, to);
            let orders: Vec<i64> = doc.timeline().iter().map(|t| t.order).collect();
            assert_eq!(orders, vec![0, 1, 2, 3, 4]);
            assert!(ids_match(&doc));
        }
    }

    #[test]
    fn test_reorder_moves_item() {
        let mut doc = doc_with_durations(&[1.0, 2.0, 3.0]);
        let first = doc.timeline()[0].id.clone();
        assert!(doc.reorder(0, 2));
        assert_eq!(doc.timeline()[2].id, first);
        assert_eq!(doc.timeline()[0].duration_seconds, 2.0);
    }

    #[test]
    fn test_remove_drops_both_views() {
        let mut doc = doc_with_durations(&[1.0, 2.0, 3.0]);
        let middle = doc.timeline()[1].id.clone();
        assert!(doc.remove_item(&middle));
        assert!(doc.find_element(&middle).is_none());
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.timeline()[1].order, 1);
        assert!(ids_match(&doc));
        assert!(!doc.remove_item("missing"));
    }

    #[test]
    fn test_set_duration_clamps_to_one_second() {
        let mut doc = doc_with_durations(&[3.0]);
        let id = doc.timeline()[0].id.clone();
        doc.set_duration(&id, 0.2);
        assert_eq!(doc.timeline()[0].duration_seconds, 1.0);
        doc.set_duration(&id, 12.0);
        assert_eq!(doc.timeline()[0].duration_seconds, 12.0);
    }

    #[test]
    fn test_offsets_and_totals() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        assert_eq!(doc.cumulative_offset_ms(0), 0.0);
        assert_eq!(doc.cumulative_offset_ms(1), 2000.0);
        assert_eq!(doc.cumulative_offset_ms(2), 5000.0);
        assert_eq!(doc.cumulative_offset_ms(doc.len()), doc.total_duration_ms());
        assert_eq!(doc.total_duration_ms(), 6000.0);
    }

    #[test]
    fn test_index_at_ms_covers_each_interval() {
        let doc = doc_with_durations(&[2.0, 3.0, 1.0]);
        for i in 0..doc.len() {
            let start = doc.cumulative_offset_ms(i);
            let end = doc.cumulative_offset_ms(i + 1);
            assert_eq!(doc.index_at_ms(start), Some(i));
            assert_eq!(doc.index_at_ms(end - 1.0), Some(i));
        }
        assert_eq!(doc.index_at_ms(6000.0), None);
        assert_eq!(CanvasDocument::new("Empty").index_at_ms(0.0), None);
    }

    #[test]
    fn test_dimensions_are_clamped() {
        let mut doc = CanvasDocument::new("Big");
        doc.set_dimensions(0, 50_000);
        assert_eq!((doc.width, doc.height), (1, 10_000));
    }

    #[test]
    fn test_toggle_full_canvas_uses_document_size() {
        let mut doc = doc_with_durations(&[1.0]);
        doc.set_dimensions(1920, 1080);
        let id = doc.timeline()[0].id.clone();
        assert!(doc.toggle_full_canvas(&id));
        let element = doc.find_element(&id).unwrap();
        assert!(element.full_canvas);
        assert_eq!(element.bounds(), Bounds::new(0.0, 0.0, 1920.0, 1080.0));
    }
}
