//! Editing, playback and storage engine behind the UI.

pub mod interaction;
pub mod media;
pub mod paths;
pub mod playback;
pub mod session;
pub mod storage;
pub mod timeline_view;
