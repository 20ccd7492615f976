use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::constants::{MIN_EXPLICIT_SIZE_PX, MIN_RESIZE_SIZE_PX};

/// Corner handle used to resize an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top-left corner (bottom-right stays put)
    Tl,
    /// Top-right corner (bottom-left stays put)
    Tr,
    /// Bottom-left corner (top-right stays put)
    Bl,
    /// Bottom-right corner (top-left stays put)
    Br,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Tl,
        ResizeHandle::Tr,
        ResizeHandle::Bl,
        ResizeHandle::Br,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResizeHandle::Tl => "tl",
            ResizeHandle::Tr => "tr",
            ResizeHandle::Bl => "bl",
            ResizeHandle::Br => "br",
        }
    }

    /// CSS cursor shown while hovering the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::Tl | ResizeHandle::Br => "nwse-resize",
            ResizeHandle::Tr | ResizeHandle::Bl => "nesw-resize",
        }
    }
}

/// Position and size of an element in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Translate relative to a gesture-start snapshot, never past the top/left edge.
    pub fn moved(start: Bounds, dx: f64, dy: f64) -> Bounds {
        Bounds {
            x: (start.x + dx).max(0.0),
            y: (start.y + dy).max(0.0),
            ..start
        }
    }

    /// Resize relative to a gesture-start snapshot.
    ///
    /// Each handle moves its own corner; sizes are floored at
    /// [`MIN_RESIZE_SIZE_PX`]. With `aspect_locked` the width wins and the
    /// height is recomputed from the starting aspect ratio.
    pub fn resized(start: Bounds, handle: ResizeHandle, dx: f64, dy: f64, aspect_locked: bool) -> Bounds {
        let (mut x, mut y) = (start.x, start.y);
        let (w, mut h) = match handle {
            ResizeHandle::Tl => {
                x = start.x + dx;
                y = start.y + dy;
                (start.w - dx, start.h - dy)
            }
            ResizeHandle::Tr => {
                y = start.y + dy;
                (start.w + dx, start.h - dy)
            }
            ResizeHandle::Bl => {
                x = start.x + dx;
                (start.w - dx, start.h + dy)
            }
            ResizeHandle::Br => (start.w + dx, start.h + dy),
        };
        let w = w.max(MIN_RESIZE_SIZE_PX);
        h = h.max(MIN_RESIZE_SIZE_PX);

        if aspect_locked {
            let aspect = if start.w > 0.0 && start.h > 0.0 {
                start.w / start.h
            } else {
                1.0
            };
            h = (w / aspect).round().max(MIN_RESIZE_SIZE_PX);
        }

        Bounds { x, y, w, h }
    }

    /// Replace non-finite values so geometry can always be rendered.
    pub fn sanitized(self) -> Bounds {
        let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
        Bounds {
            x: finite_or(self.x, 0.0),
            y: finite_or(self.y, 0.0),
            w: finite_or(self.w, MIN_EXPLICIT_SIZE_PX).max(MIN_EXPLICIT_SIZE_PX),
            h: finite_or(self.h, MIN_EXPLICIT_SIZE_PX).max(MIN_EXPLICIT_SIZE_PX),
        }
    }

    /// Aspect ratio (w / h), if the height is non-zero.
    pub fn aspect(&self) -> Option<f64> {
        (self.h > 0.0).then(|| self.w / self.h)
    }
}

/// Independent field edits coming from the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundsEdit {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
}

/// One placed media item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique within the owning canvas; shared with the timeline slot.
    pub id: String,
    /// Media file shown by this element
    #[serde(alias = "file_id")]
    pub file_id: String,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub x: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub y: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub w: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub h: f64,
    /// Paint order (higher draws on top)
    #[serde(default)]
    pub layer: i64,
    #[serde(default)]
    pub full_canvas: bool,
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

/// Numbers and numeric strings parse; null and anything else become NaN
/// and are replaced by `sanitize` on load.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(f64::NAN))
}

impl Element {
    /// Create a new element with a fresh id.
    pub fn new(file_id: impl Into<String>, bounds: Bounds, layer: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), file_id, bounds, layer)
    }

    pub fn with_id(id: impl Into<String>, file_id: impl Into<String>, bounds: Bounds, layer: i64) -> Self {
        let mut element = Self {
            id: id.into(),
            file_id: file_id.into(),
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            layer,
            full_canvas: false,
        };
        element.set_bounds(bounds.sanitized());
        element
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.w = bounds.w;
        self.h = bounds.h;
    }

    /// Apply a move delta measured from `start`.
    pub fn apply_move(&mut self, start: &Element, dx: f64, dy: f64) {
        self.set_bounds(Bounds::moved(start.bounds(), dx, dy));
    }

    /// Apply a resize delta measured from `start`.
    pub fn apply_resize(&mut self, start: &Element, handle: ResizeHandle, dx: f64, dy: f64, aspect_locked: bool) {
        self.set_bounds(Bounds::resized(start.bounds(), handle, dx, dy, aspect_locked));
    }

    /// Set the full-canvas flag. Enabling snaps the element to the canvas;
    /// disabling keeps whatever geometry it has.
    pub fn set_full_canvas(&mut self, enabled: bool, canvas_width: u32, canvas_height: u32) {
        self.full_canvas = enabled;
        if enabled {
            self.set_bounds(Bounds::new(0.0, 0.0, canvas_width as f64, canvas_height as f64));
        }
    }

    /// Apply numeric inspector edits, each field clamped on its own.
    pub fn set_explicit_bounds(&mut self, edit: BoundsEdit) {
        let keep_finite = |value: f64| value.is_finite().then_some(value);
        if let Some(x) = edit.x.and_then(keep_finite) {
            self.x = x.max(0.0);
        }
        if let Some(y) = edit.y.and_then(keep_finite) {
            self.y = y.max(0.0);
        }
        if let Some(w) = edit.w.and_then(keep_finite) {
            self.w = w.max(MIN_EXPLICIT_SIZE_PX);
        }
        if let Some(h) = edit.h.and_then(keep_finite) {
            self.h = h.max(MIN_EXPLICIT_SIZE_PX);
        }
    }

    /// Distance from the right edge of the element to the right canvas edge.
    pub fn right_margin(&self, canvas_width: u32) -> f64 {
        (canvas_width as f64 - self.x - self.w).round().max(0.0)
    }

    pub(crate) fn sanitize(&mut self) {
        let bounds = self.bounds().sanitized();
        self.set_bounds(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Bounds {
        Bounds::new(10.0, 10.0, 100.0, 50.0)
    }

    #[test]
    fn test_resize_bottom_right() {
        let result = Bounds::resized(start(), ResizeHandle::Br, 20.0, 10.0, false);
        assert_eq!(result, Bounds::new(10.0, 10.0, 120.0, 60.0));
    }

    #[test]
    fn test_resize_top_left_keeps_opposite_corner() {
        let result = Bounds::resized(start(), ResizeHandle::Tl, 20.0, 10.0, false);
        assert_eq!(result, Bounds::new(30.0, 20.0, 80.0, 40.0));
        assert_eq!(result.x + result.w, 110.0);
        assert_eq!(result.y + result.h, 60.0);
    }

    #[test]
    fn test_resize_top_right_and_bottom_left() {
        let tr = Bounds::resized(start(), ResizeHandle::Tr, 20.0, 10.0, false);
        assert_eq!(tr, Bounds::new(10.0, 20.0, 120.0, 40.0));

        let bl = Bounds::resized(start(), ResizeHandle::Bl, 20.0, 10.0, false);
        assert_eq!(bl, Bounds::new(30.0, 10.0, 80.0, 60.0));
    }

    #[test]
    fn test_aspect_locked_width_wins() {
        let result = Bounds::resized(Bounds::new(0.0, 0.0, 100.0, 50.0), ResizeHandle::Br, 50.0, 999.0, true);
        assert_eq!(result.w, 150.0);
        assert_eq!(result.h, 75.0);
    }

    #[test]
    fn test_resize_floors_at_minimum() {
        let result = Bounds::resized(start(), ResizeHandle::Br, -500.0, -500.0, false);
        assert_eq!(result.w, MIN_RESIZE_SIZE_PX);
        assert_eq!(result.h, MIN_RESIZE_SIZE_PX);
    }

    #[test]
    fn test_move_clamps_to_origin_without_upper_bound() {
        let moved = Bounds::moved(start(), -50.0, 5000.0);
        assert_eq!(moved.x, 0.0);
        assert_eq!(moved.y, 5010.0);
        assert_eq!(moved.w, 100.0);
    }

    #[test]
    fn test_full_canvas_toggle_keeps_geometry_when_disabled() {
        let mut element = Element::new("f1", start(), 0);
        element.set_full_canvas(true, 1280, 720);
        assert_eq!(element.bounds(), Bounds::new(0.0, 0.0, 1280.0, 720.0));

        element.set_full_canvas(false, 1280, 720);
        assert!(!element.full_canvas);
        assert_eq!(element.bounds(), Bounds::new(0.0, 0.0, 1280.0, 720.0));
    }

    #[test]
    fn test_explicit_bounds_clamp_each_field() {
        let mut element = Element::new("f1", start(), 0);
        element.set_explicit_bounds(BoundsEdit {
            x: Some(-4.0),
            w: Some(0.0),
            h: Some(f64::NAN),
            ..Default::default()
        });
        assert_eq!(element.x, 0.0);
        assert_eq!(element.y, 10.0);
        assert_eq!(element.w, MIN_EXPLICIT_SIZE_PX);
        assert_eq!(element.h, 50.0);
    }

    #[test]
    fn test_element_json_uses_camel_case() {
        let element = Element::with_id("a", "f1", Bounds::new(0.0, 0.0, 1280.0, 720.0), 0);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["fileId"], "f1");
        assert_eq!(json["fullCanvas"], false);

        let legacy: Element = serde_json::from_str(r#"{"id":"b","fileId":"f2","x":1,"y":2,"w":3,"h":4}"#).unwrap();
        assert_eq!(legacy.layer, 0);
        assert!(!legacy.full_canvas);
    }
}
