use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DEFAULT_ITEM_DURATION_SECONDS;
use super::Element;

/// Temporal view of an element: its slot in the playback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    /// Same id as the element this slot plays
    #[serde(default)]
    pub id: String,
    #[serde(alias = "file_id")]
    pub file_id: String,
    #[serde(default)]
    pub order: i64,
    #[serde(
        rename = "duration_seconds",
        alias = "duration",
        default = "default_duration_seconds",
        deserialize_with = "lenient_duration"
    )]
    pub duration_seconds: f64,
}

impl TimelineItem {
    /// Duration to schedule with; malformed values fall back to the default.
    pub fn effective_duration_seconds(&self) -> f64 {
        effective_duration(self.duration_seconds)
    }
}

fn default_duration_seconds() -> f64 {
    DEFAULT_ITEM_DURATION_SECONDS
}

/// Accept numbers, numeric strings and null; anything else becomes the default.
fn lenient_duration<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(effective_duration(parsed.unwrap_or(DEFAULT_ITEM_DURATION_SECONDS)))
}

fn effective_duration(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        DEFAULT_ITEM_DURATION_SECONDS
    }
}

/// An element together with its timing. Geometry and timeline slot share one
/// id and live and die together.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedElement {
    pub element: Element,
    pub duration_seconds: f64,
}

impl TimedElement {
    pub fn new(element: Element, duration_seconds: f64) -> Self {
        Self {
            element,
            duration_seconds: effective_duration(duration_seconds),
        }
    }

    pub fn id(&self) -> &str {
        &self.element.id
    }

    pub fn duration_ms(&self) -> f64 {
        effective_duration(self.duration_seconds) * 1000.0
    }

    /// Timeline view of this slot at the given position.
    pub fn timeline_item(&self, order: usize) -> TimelineItem {
        TimelineItem {
            id: self.element.id.clone(),
            file_id: self.element.file_id.clone(),
            order: order as i64,
            duration_seconds: self.duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_durations_default() {
        let rows = r#"[
            {"id":"a","fileId":"f","order":0,"duration_seconds":7},
            {"id":"b","fileId":"f","order":1,"duration_seconds":"3"},
            {"id":"c","fileId":"f","order":2,"duration_seconds":null},
            {"id":"d","fileId":"f","order":3},
            {"id":"e","file_id":"f","order":4,"duration":-2},
            {"id":"g","fileId":"f","order":5,"duration_seconds":"soon"}
        ]"#;
        let items: Vec<TimelineItem> = serde_json::from_str(rows).unwrap();
        let durations: Vec<f64> = items.iter().map(|item| item.duration_seconds).collect();
        assert_eq!(durations, vec![7.0, 3.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(items[4].file_id, "f");
    }

    #[test]
    fn test_timeline_item_wire_names() {
        let item = TimelineItem {
            id: "a".into(),
            file_id: "f1".into(),
            order: 0,
            duration_seconds: 7.0,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["fileId"], "f1");
        assert_eq!(json["duration_seconds"], 7.0);
    }
}
