//! Timeline strip geometry: zoom steps, ruler ticks and card widths.

use crate::constants::{
    CARD_LABEL_MIN_WIDTH_PX, DEFAULT_PIXELS_PER_SECOND, MAX_PIXELS_PER_SECOND, MIN_MANUAL_PIXELS_PER_SECOND,
    MIN_PIXELS_PER_SECOND, TIMELINE_MIN_RULER_SECONDS, TIMELINE_ZOOM_FACTOR,
};

pub fn zoom_in(pixels_per_second: f64) -> f64 {
    (pixels_per_second * TIMELINE_ZOOM_FACTOR).round().min(MAX_PIXELS_PER_SECOND)
}

pub fn zoom_out(pixels_per_second: f64) -> f64 {
    (pixels_per_second / TIMELINE_ZOOM_FACTOR).round().max(MIN_PIXELS_PER_SECOND)
}

/// Value typed into the zoom field; unparsable input keeps the default.
pub fn manual_zoom(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.round().max(MIN_MANUAL_PIXELS_PER_SECOND),
        _ => DEFAULT_PIXELS_PER_SECOND,
    }
}

/// Seconds between ruler ticks at the given zoom.
pub fn ruler_step_seconds(pixels_per_second: f64) -> u32 {
    if pixels_per_second > 100.0 {
        1
    } else if pixels_per_second > 40.0 {
        2
    } else if pixels_per_second > 20.0 {
        5
    } else {
        10
    }
}

/// Seconds covered by the ruler.
pub fn ruler_seconds(total_duration_ms: f64) -> u32 {
    (total_duration_ms / 1000.0).ceil().max(TIMELINE_MIN_RULER_SECONDS) as u32
}

/// Tick positions in seconds, inclusive of both ends of the ruler.
pub fn ruler_ticks(total_duration_ms: f64, pixels_per_second: f64) -> Vec<u32> {
    let step = ruler_step_seconds(pixels_per_second) as usize;
    (0..=ruler_seconds(total_duration_ms)).step_by(step).collect()
}

pub fn card_width(duration_seconds: f64, pixels_per_second: f64) -> f64 {
    duration_seconds * pixels_per_second
}

pub fn shows_card_label(card_width_px: f64) -> bool {
    card_width_px >= CARD_LABEL_MIN_WIDTH_PX
}

/// Timeline position for a click `x` pixels into the strip.
pub fn ms_at_offset(x: f64, pixels_per_second: f64) -> f64 {
    if pixels_per_second <= 0.0 {
        return 0.0;
    }
    (x / pixels_per_second * 1000.0).max(0.0)
}
