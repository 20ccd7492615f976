use dioxus::prelude::{spawn, Signal, WritableExt};
use serde::Deserialize;
use std::process::Command;
use std::time::Duration;

use crate::constants::{ASPECT_MATCH_TOLERANCE, MEDIA_PROBE_TIMEOUT_SECS, MIN_ITEM_DURATION_SECONDS};
use crate::core::session::EditorSession;

/// Natural duration and frame size of a video.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoProbe {
    pub duration_seconds: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl VideoProbe {
    /// Duration rounded up to whole seconds, at least one.
    pub fn rounded_duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .map(|seconds| seconds.ceil().max(MIN_ITEM_DURATION_SECONDS))
    }

    /// True when the frame aspect is within 3% of the canvas aspect.
    pub fn matches_aspect(&self, canvas_width: u32, canvas_height: u32) -> bool {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => aspect_matches(w, h, canvas_width, canvas_height),
            _ => false,
        }
    }
}

pub fn aspect_matches(video_width: u32, video_height: u32, canvas_width: u32, canvas_height: u32) -> bool {
    if video_height == 0 || canvas_height == 0 || canvas_width == 0 {
        return false;
    }
    let video_aspect = video_width as f64 / video_height as f64;
    let canvas_aspect = canvas_width as f64 / canvas_height as f64;
    (video_aspect - canvas_aspect).abs() / canvas_aspect < ASPECT_MATCH_TOLERANCE
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Parse `ffprobe -of json` output.
pub fn parse_probe_output(json: &str) -> Option<VideoProbe> {
    let output: ProbeOutput = serde_json::from_str(json).ok()?;
    let stream = output.streams.iter().find(|stream| stream.width.is_some() && stream.height.is_some());
    let duration_seconds = output
        .format
        .and_then(|format| format.duration)
        .and_then(|value| value.trim().parse::<f64>().ok());
    Some(VideoProbe {
        duration_seconds,
        width: stream.and_then(|stream| stream.width),
        height: stream.and_then(|stream| stream.height),
    })
}

/// Probe a local path or URL with ffprobe. Blocking.
pub fn probe_video(source: &str) -> Option<VideoProbe> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("format=duration:stream=width,height")
        .arg("-of")
        .arg("json")
        .arg(source)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// [`probe_video`] on the blocking pool, abandoned after 30 seconds.
pub async fn probe_video_with_timeout(source: String) -> Option<VideoProbe> {
    let task = tokio::task::spawn_blocking(move || probe_video(&source));
    match tokio::time::timeout(Duration::from_secs(MEDIA_PROBE_TIMEOUT_SECS), task).await {
        Ok(joined) => joined.ok().flatten(),
        Err(_) => {
            tracing::warn!("Video probe timed out");
            None
        }
    }
}

/// Probe the video behind a freshly dropped element without blocking the
/// drop; the result is applied to the session when it arrives.
pub fn spawn_video_probe(mut session: Signal<EditorSession>, element_id: String, source: String) {
    spawn(async move {
        let probe = probe_video_with_timeout(source.clone()).await;
        match probe {
            Some(probe) => {
                tracing::info!(%element_id, ?probe, "Video probed");
                session.write().apply_video_probe(&element_id, probe);
            }
            None => tracing::warn!(%element_id, %source, "Could not probe video"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{"programs":[],"streams":[{"width":1920,"height":1080}],"format":{"duration":"12.400000"}}"#;
        let probe = parse_probe_output(json).unwrap();
        assert_eq!(probe.width, Some(1920));
        assert_eq!(probe.height, Some(1080));
        assert_eq!(probe.duration_seconds, Some(12.4));
        assert_eq!(probe.rounded_duration_seconds(), Some(13.0));
    }

    #[test]
    fn test_parse_probe_output_without_streams() {
        let probe = parse_probe_output(r#"{"format":{}}"#).unwrap();
        assert_eq!(probe, VideoProbe::default());
        assert!(parse_probe_output("not json").is_none());
    }

    #[test]
    fn test_rounded_duration_has_floor() {
        let probe = VideoProbe {
            duration_seconds: Some(0.2),
            ..Default::default()
        };
        assert_eq!(probe.rounded_duration_seconds(), Some(1.0));
    }

    #[test]
    fn test_aspect_tolerance() {
        assert!(aspect_matches(1920, 1080, 1280, 720));
        assert!(aspect_matches(1900, 1080, 1280, 720));
        assert!(!aspect_matches(1080, 1080, 1280, 720));
        assert!(!aspect_matches(1920, 0, 1280, 720));
    }
}
