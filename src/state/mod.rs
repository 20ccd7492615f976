//! State management module
//!
//! Core data structures of the editor:
//! - Canvas: layout template, its elements and their timeline slots
//! - Media: uploaded files and registered players
//! - Selection: what is selected across views
//! - Quick add: pending preset placement of a gallery file

mod canvas;
mod media;
mod selection;
mod quick_add;

pub use canvas::*;
pub use media::*;
pub use selection::*;
pub use quick_add::*;
