//! UI components grouped by feature domain.
pub mod common;
pub mod gallery;

mod canvas_list;
mod canvas_surface;
mod inspector;
mod players_panel;
mod quick_add_modal;
mod side_panel;
mod status_bar;
mod title_bar;

pub use canvas_list::CanvasListContent;
pub use canvas_surface::CanvasSurface;
pub use inspector::InspectorPanelContent;
pub use players_panel::PlayersPanelContent;
pub use quick_add_modal::QuickAddModal;
pub use side_panel::SidePanel;
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;
