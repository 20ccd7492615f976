//! Timeline strip: ruler, item cards and the playback toolbar.

mod item_card;
mod panel;
mod playback_controls;
mod ruler;

pub use panel::TimelinePanel;
