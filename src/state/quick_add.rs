//! Quick-add modal state: preset placement for a gallery file.

use crate::constants::{
    DEFAULT_ITEM_DURATION_SECONDS, MIN_EXPLICIT_SIZE_PX, MIN_ITEM_DURATION_SECONDS, QUICK_ADD_DEFAULT_HEIGHT,
    QUICK_ADD_DEFAULT_WIDTH, QUICK_ADD_MARGIN_PX,
};
use super::{Bounds, MediaFile};

/// Horizontal anchor chosen in the quick-add modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuickAddPosition {
    Left,
    #[default]
    Center,
    Right,
}

impl QuickAddPosition {
    pub const ALL: [QuickAddPosition; 3] = [
        QuickAddPosition::Left,
        QuickAddPosition::Center,
        QuickAddPosition::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickAddPosition::Left => "Left",
            QuickAddPosition::Center => "Center",
            QuickAddPosition::Right => "Right",
        }
    }
}

/// Size and duration used for dropped files; the duration also seeds the
/// quick-add modal. Updated from confirmed quick adds and video probes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickAddDefaults {
    pub width: f64,
    pub height: f64,
    pub duration_seconds: f64,
}

impl Default for QuickAddDefaults {
    fn default() -> Self {
        Self {
            width: QUICK_ADD_DEFAULT_WIDTH,
            height: QUICK_ADD_DEFAULT_HEIGHT,
            duration_seconds: DEFAULT_ITEM_DURATION_SECONDS,
        }
    }
}

impl QuickAddDefaults {
    /// Size of a dropped element on a `canvas_width` x `canvas_height` canvas.
    pub fn drop_size(&self, canvas_width: u32, canvas_height: u32) -> (f64, f64) {
        (
            sanitize_size(self.width).min(canvas_width as f64),
            sanitize_size(self.height).min(canvas_height as f64),
        )
    }

    pub fn remember(&mut self, request: &QuickAddRequest) {
        self.width = sanitize_size(request.width);
        self.height = sanitize_size(request.height);
        self.duration_seconds = request.effective_duration();
    }
}

/// Pending quick-add for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickAddRequest {
    pub file_id: String,
    pub is_video: bool,
    pub position: QuickAddPosition,
    pub width: f64,
    pub height: f64,
    pub duration_seconds: f64,
}

impl QuickAddRequest {
    /// Defaults: 200x120 (capped to the canvas), centred, `default_duration` seconds.
    pub fn open(file: &MediaFile, canvas_width: u32, canvas_height: u32, default_duration: f64) -> Self {
        let duration = if default_duration.is_finite() && default_duration > 0.0 {
            default_duration
        } else {
            DEFAULT_ITEM_DURATION_SECONDS
        };
        Self {
            file_id: file.id.clone(),
            is_video: file.is_video(),
            position: QuickAddPosition::Center,
            width: QUICK_ADD_DEFAULT_WIDTH.min(canvas_width as f64),
            height: QUICK_ADD_DEFAULT_HEIGHT.min(canvas_height as f64),
            duration_seconds: duration,
        }
    }

    /// Duration to store, floored at one second.
    pub fn effective_duration(&self) -> f64 {
        if self.duration_seconds.is_finite() {
            self.duration_seconds.max(MIN_ITEM_DURATION_SECONDS)
        } else {
            DEFAULT_ITEM_DURATION_SECONDS
        }
    }

    /// Where the element lands on a `canvas_width` x `canvas_height` canvas.
    pub fn placement(&self, canvas_width: u32, canvas_height: u32) -> Bounds {
        let (cw, ch) = (canvas_width as f64, canvas_height as f64);
        let w = sanitize_size(self.width);
        let h = sanitize_size(self.height);

        if self.is_video && w == cw && h == ch {
            return Bounds::new(0.0, 0.0, w, h);
        }

        let x = match self.position {
            QuickAddPosition::Left => QUICK_ADD_MARGIN_PX,
            QuickAddPosition::Right => (cw - w - QUICK_ADD_MARGIN_PX).max(QUICK_ADD_MARGIN_PX),
            QuickAddPosition::Center => ((cw - w) / 2.0).max(QUICK_ADD_MARGIN_PX),
        };
        let y = ((ch - h) / 2.0).max(QUICK_ADD_MARGIN_PX);
        Bounds::new(x, y, w, h)
    }
}

fn sanitize_size(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_EXPLICIT_SIZE_PX)
    } else {
        MIN_EXPLICIT_SIZE_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(mime: &str) -> MediaFile {
        MediaFile {
            id: "f1".into(),
            name: "clip".into(),
            mime_type: mime.into(),
            url: String::new(),
        }
    }

    #[test]
    fn test_open_caps_size_to_canvas() {
        let request = QuickAddRequest::open(&file("image/png"), 150, 100, 5.0);
        assert_eq!((request.width, request.height), (150.0, 100.0));
        assert_eq!(request.position, QuickAddPosition::Center);
        assert_eq!(request.duration_seconds, 5.0);
    }

    #[test]
    fn test_placement_per_position() {
        let mut request = QuickAddRequest::open(&file("image/png"), 1280, 720, 5.0);
        request.position = QuickAddPosition::Left;
        assert_eq!(request.placement(1280, 720), Bounds::new(8.0, 300.0, 200.0, 120.0));
        request.position = QuickAddPosition::Right;
        assert_eq!(request.placement(1280, 720), Bounds::new(1072.0, 300.0, 200.0, 120.0));
        request.position = QuickAddPosition::Center;
        assert_eq!(request.placement(1280, 720), Bounds::new(540.0, 300.0, 200.0, 120.0));
    }

    #[test]
    fn test_placement_keeps_margin_when_oversized() {
        let mut request = QuickAddRequest::open(&file("image/png"), 1280, 720, 5.0);
        request.width = 2000.0;
        request.height = 1000.0;
        request.position = QuickAddPosition::Right;
        let bounds = request.placement(1280, 720);
        assert_eq!((bounds.x, bounds.y), (8.0, 8.0));
    }

    #[test]
    fn test_canvas_sized_video_goes_to_origin() {
        let mut request = QuickAddRequest::open(&file("video/mp4"), 1280, 720, 5.0);
        request.width = 1280.0;
        request.height = 720.0;
        assert_eq!(request.placement(1280, 720), Bounds::new(0.0, 0.0, 1280.0, 720.0));

        let mut image = QuickAddRequest::open(&file("image/png"), 1280, 720, 5.0);
        image.width = 1280.0;
        image.height = 720.0;
        assert_eq!(image.placement(1280, 720).x, 8.0);
    }

    #[test]
    fn test_defaults_drop_size_capped_and_remembered() {
        let mut defaults = QuickAddDefaults::default();
        assert_eq!(defaults.drop_size(150, 100), (150.0, 100.0));
        assert_eq!(defaults.drop_size(1280, 720), (200.0, 120.0));

        let mut request = QuickAddRequest::open(&file("image/png"), 1280, 720, 5.0);
        request.width = 320.0;
        request.duration_seconds = 9.0;
        defaults.remember(&request);
        assert_eq!(defaults.drop_size(1280, 720), (320.0, 120.0));
        assert_eq!(defaults.duration_seconds, 9.0);
    }

    #[test]
    fn test_effective_duration_floor() {
        let mut request = QuickAddRequest::open(&file("image/png"), 1280, 720, 12.0);
        assert_eq!(request.effective_duration(), 12.0);
        request.duration_seconds = 0.1;
        assert_eq!(request.effective_duration(), 1.0);
    }
}
