//! Shared constants: UI colors and sizing, canvas and timeline limits,
//! playback timing and storage defaults.

pub const BG_DEEPEST: &str = "#09090b";
pub const BG_BASE: &str = "#0a0a0b";
pub const BG_ELEVATED: &str = "#141414";
pub const BG_SURFACE: &str = "#1a1a1a";
pub const BG_HOVER: &str = "#262626";

pub const BORDER_SUBTLE: &str = "#1f1f1f";
pub const BORDER_DEFAULT: &str = "#27272a";
pub const BORDER_STRONG: &str = "#3f3f46";
pub const BORDER_ACCENT: &str = "#3b82f6";

pub const TEXT_PRIMARY: &str = "#fafafa";
pub const TEXT_SECONDARY: &str = "#a1a1aa";
pub const TEXT_MUTED: &str = "#71717a";
pub const TEXT_DIM: &str = "#52525b";

pub const ACCENT_PRIMARY: &str = "#3b82f6";
pub const ACCENT_WARNING: &str = "#f97316";
pub const ACCENT_VIDEO: &str = "#22c55e";
pub const ACCENT_DANGER: &str = "#ef4444";

pub const PANEL_DEFAULT_WIDTH: f64 = 250.0;
pub const INSPECTOR_WIDTH: f64 = 260.0;
pub const TIMELINE_DEFAULT_HEIGHT: f64 = 200.0;

// Canvas geometry
pub const DEFAULT_CANVAS_WIDTH: u32 = 1280;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 720;
pub const FALLBACK_CANVAS_WIDTH: u32 = 640;
pub const FALLBACK_CANVAS_HEIGHT: u32 = 360;
pub const MAX_CANVAS_DIMENSION: u32 = 10_000;
pub const MIN_RESIZE_SIZE_PX: f64 = 20.0;
pub const MIN_EXPLICIT_SIZE_PX: f64 = 1.0;
pub const RESIZE_HANDLE_SIZE_PX: f64 = 10.0;

// Timeline
pub const DEFAULT_ITEM_DURATION_SECONDS: f64 = 5.0;
pub const MIN_ITEM_DURATION_SECONDS: f64 = 1.0;
pub const DEFAULT_PIXELS_PER_SECOND: f64 = 23.0;
pub const MIN_PIXELS_PER_SECOND: f64 = 2.0;
pub const MAX_PIXELS_PER_SECOND: f64 = 500.0;
pub const MIN_MANUAL_PIXELS_PER_SECOND: f64 = 5.0;
pub const TIMELINE_ZOOM_FACTOR: f64 = 1.25;
pub const TIMELINE_MIN_RULER_SECONDS: f64 = 10.0;
pub const CARD_LABEL_MIN_WIDTH_PX: f64 = 80.0;

// Playback
pub const PLAYBACK_FRAME_INTERVAL_MS: u64 = 16;

// Quick add
pub const QUICK_ADD_DEFAULT_WIDTH: f64 = 200.0;
pub const QUICK_ADD_DEFAULT_HEIGHT: f64 = 120.0;
pub const QUICK_ADD_MARGIN_PX: f64 = 8.0;
pub const ASPECT_MATCH_TOLERANCE: f64 = 0.03;
pub const MEDIA_PROBE_TIMEOUT_SECS: u64 = 30;

// Storage
pub const MAX_PLAYER_CODE_ATTEMPTS: usize = 10;
pub const PLAYER_CODE_MIN: u32 = 100_000;
pub const PLAYER_CODE_MAX: u32 = 999_999;
pub const UPLOADS_BUCKET: &str = "uploads";

/// Long-lived script that applies media-sync commands to `<video>` nodes.
/// Messages: `{ kind: "restart" | "rewind", id }`, where `id` is the element id.
pub const MEDIA_SYNC_SCRIPT: &str = r#"
function videoFor(id) {
    return document.querySelector('video[data-element-id="' + id + '"]');
}

while (true) {
    const msg = await dioxus.recv();
    if (!msg || !msg.id) {
        continue;
    }
    const video = videoFor(msg.id);
    if (!video) {
        continue;
    }
    try {
        video.currentTime = 0;
        if (msg.kind === "restart") {
            const pending = video.play();
            if (pending && pending.catch) {
                pending.catch(() => {});
            }
        } else {
            video.pause();
        }
    } catch (_) {
        // Media not ready yet.
    }
}
"#;
