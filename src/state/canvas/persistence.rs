use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_ITEM_DURATION_SECONDS};
use super::{CanvasDocument, Element, TimedElement, TimelineItem};

/// Layout column as found in storage.
///
/// Older canvases stored a bare element array; current ones store the canvas
/// size next to the elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutEncoding {
    Array(Vec<Element>),
    Sized {
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
        #[serde(default)]
        elements: Vec<Element>,
    },
}

impl LayoutEncoding {
    /// Split into `(width, height, elements)`, defaulting missing sizes.
    pub fn normalize(self) -> (u32, u32, Vec<Element>) {
        match self {
            LayoutEncoding::Array(elements) => (DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, elements),
            LayoutEncoding::Sized { width, height, elements } => (
                width.unwrap_or(DEFAULT_CANVAS_WIDTH),
                height.unwrap_or(DEFAULT_CANVAS_HEIGHT),
                elements,
            ),
        }
    }
}

impl Default for LayoutEncoding {
    fn default() -> Self {
        LayoutEncoding::Array(Vec::new())
    }
}

/// Persistable form of a canvas: one upsert carries layout and timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layout: LayoutEncoding,
    #[serde(default)]
    pub timeline: Vec<TimelineItem>,
}

/// Entry of the canvas list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl CanvasDocument {
    /// Serialize for storage; the layout is always written in the sized form.
    pub fn to_record(&self) -> CanvasRecord {
        CanvasRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            layout: LayoutEncoding::Sized {
                width: Some(self.width),
                height: Some(self.height),
                elements: self.elements().cloned().collect(),
            },
            timeline: self.timeline(),
        }
    }

    /// Rebuild a document from storage, pairing timeline rows with elements.
    pub fn from_record(record: CanvasRecord) -> Self {
        let CanvasRecord { id, name, layout, mut timeline } = record;
        let (width, height, elements) = layout.normalize();

        let mut by_id: HashMap<String, Element> = HashMap::new();
        let mut element_order: Vec<String> = Vec::new();
        for mut element in elements {
            element.sanitize();
            if by_id.contains_key(&element.id) {
                tracing::warn!(canvas_id = %id, element_id = %element.id, "Duplicate element id in layout; keeping the first");
                continue;
            }
            element_order.push(element.id.clone());
            by_id.insert(element.id.clone(), element);
        }

        timeline.sort_by_key(|item| item.order);
        let mut items = Vec::with_capacity(by_id.len());
        for row in timeline {
            match by_id.remove(&row.id) {
                Some(element) => items.push(TimedElement::new(element, row.effective_duration_seconds())),
                None => {
                    tracing::warn!(canvas_id = %id, item_id = %row.id, "Dropping timeline row without a matching element");
                }
            }
        }

        // Elements without a slot (legacy layouts) play after the rest.
        for element_id in element_order {
            if let Some(element) = by_id.remove(&element_id) {
                items.push(TimedElement::new(element, DEFAULT_ITEM_DURATION_SECONDS));
            }
        }

        let name = if name.trim().is_empty() { "Untitled".to_string() } else { name };
        CanvasDocument::from_parts(id, name, width, height, items)
    }
}
