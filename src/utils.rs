use std::path::Path;
use urlencoding;

/// URL the webview can load a local file from.
///
/// Root-relative paths are resolved by the desktop asset handler against the
/// filesystem, so each path segment is percent-encoded and joined with `/`.
pub fn get_local_file_url(path: &Path) -> String {
    let p_str = path.to_string_lossy().replace('\\', "/");
    let encoded: Vec<String> = p_str
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("/{}", encoded.join("/"))
}

/// `src` for a gallery file: remote URLs pass through, local paths are mapped.
pub fn media_src(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || lower.starts_with("blob:")
    {
        return url.to_string();
    }
    get_local_file_url(Path::new(url))
}

pub fn parse_f64_input(value: &str, fallback: f64) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return fallback;
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => fallback,
    }
}

/// Seconds as `m:ss.t` for the toolbar clock.
pub fn format_clock(ms: f64) -> String {
    let tenths = (ms.max(0.0) / 100.0).floor() as u64;
    let seconds = tenths / 10;
    format!("{}:{:02}.{}", seconds / 60, seconds % 60, tenths % 10)
}
