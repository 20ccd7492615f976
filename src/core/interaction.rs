//! Pointer gestures on the canvas surface.
//!
//! A gesture snapshots the element and pointer position when it starts; every
//! later pointer move is applied as a delta from that snapshot.

use crate::state::{Bounds, CanvasDocument, Element, QuickAddDefaults, ResizeHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    Resize(ResizeHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub element_id: String,
    pub kind: GestureKind,
    start_x: f64,
    start_y: f64,
    snapshot: Element,
}

/// Holds at most one active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionController {
    active: Option<Gesture>,
}

impl InteractionController {
    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Pointer down on an element body. Ignored while another gesture runs,
    /// so a resize is never turned into a move.
    pub fn begin_move(&mut self, doc: &CanvasDocument, element_id: &str, pointer_x: f64, pointer_y: f64) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.begin(doc, element_id, GestureKind::Move, pointer_x, pointer_y)
    }

    /// Pointer down on a corner handle. Replaces any move in progress.
    pub fn begin_resize(
        &mut self,
        doc: &CanvasDocument,
        element_id: &str,
        handle: ResizeHandle,
        pointer_x: f64,
        pointer_y: f64,
    ) -> bool {
        if matches!(self.active.as_ref().map(|g| g.kind), Some(GestureKind::Resize(_))) {
            return false;
        }
        self.begin(doc, element_id, GestureKind::Resize(handle), pointer_x, pointer_y)
    }

    fn begin(&mut self, doc: &CanvasDocument, element_id: &str, kind: GestureKind, x: f64, y: f64) -> bool {
        let Some(snapshot) = doc.find_element(element_id) else {
            return false;
        };
        self.active = Some(Gesture {
            element_id: element_id.to_string(),
            kind,
            start_x: x,
            start_y: y,
            snapshot: snapshot.clone(),
        });
        true
    }

    /// Apply the pointer position to the gesture's element. Returns true when
    /// the document changed.
    pub fn pointer_move(&self, doc: &mut CanvasDocument, pointer_x: f64, pointer_y: f64, aspect_locked: bool) -> bool {
        let Some(gesture) = self.active.as_ref() else {
            return false;
        };
        let dx = pointer_x - gesture.start_x;
        let dy = pointer_y - gesture.start_y;
        match gesture.kind {
            GestureKind::Move => doc.move_element(&gesture.element_id, &gesture.snapshot, dx, dy),
            GestureKind::Resize(handle) => {
                doc.resize_element(&gesture.element_id, &gesture.snapshot, handle, dx, dy, aspect_locked)
            }
        }
    }

    /// Pointer up. Returns the finished gesture, if any.
    pub fn end(&mut self) -> Option<Gesture> {
        self.active.take()
    }
}

/// Translate a client-space point into canvas-local space.
pub fn canvas_local_point(client: (f64, f64), surface_origin: (f64, f64)) -> (f64, f64) {
    (client.0 - surface_origin.0, client.1 - surface_origin.1)
}

/// Bounds for a gallery file dropped at a canvas-local point.
pub fn drop_bounds(local: (f64, f64), defaults: &QuickAddDefaults, canvas_width: u32, canvas_height: u32) -> Bounds {
    let (w, h) = defaults.drop_size(canvas_width, canvas_height);
    let finite_or_zero = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };
    Bounds::new(finite_or_zero(local.0), finite_or_zero(local.1), w, h)
}
