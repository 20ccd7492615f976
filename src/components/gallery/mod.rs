mod gallery_panel;
mod media_item;

pub use gallery_panel::GalleryPanelContent;
pub use media_item::MediaItem;
