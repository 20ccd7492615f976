//! Canvas data model
//!
//! A canvas is a sized layout of media elements plus the timeline that plays
//! them one after another. Geometry and timing share one aggregate
//! ([`TimedElement`]) so the two views cannot drift apart.

mod element;
mod timed_element;
mod document;
mod persistence;

pub use element::{Bounds, BoundsEdit, Element, ResizeHandle};
pub use timed_element::{TimedElement, TimelineItem};
pub use document::CanvasDocument;
pub use persistence::{CanvasRecord, CanvasSummary, LayoutEncoding};
