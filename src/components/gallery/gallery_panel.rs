use dioxus::prelude::*;
use crate::components::gallery::MediaItem;
use crate::constants::*;
use crate::state::MediaFile;

/// Uploaded media. Items are dragged onto the canvas or clicked for quick add.
#[component]
pub fn GalleryPanelContent(
    files: Vec<MediaFile>,
    selected_file: Option<String>,
    uploading: bool,
    on_upload: EventHandler<()>,
    on_refresh: EventHandler<()>,
    on_quick_add: EventHandler<MediaFile>,
    on_drag_start: EventHandler<MediaFile>,
) -> Element {
    let upload_label = if uploading { "Uploading..." } else { "📁 Upload Media..." };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100%; padding: 8px;",

            div {
                style: "display: flex; gap: 4px; margin-bottom: 8px;",
                button {
                    style: "
                        flex: 1; padding: 8px 12px;
                        background-color: {BG_SURFACE}; border: 1px dashed {BORDER_DEFAULT};
                        border-radius: 6px; color: {TEXT_SECONDARY}; font-size: 12px;
                        cursor: pointer; transition: all 0.15s ease;
                    ",
                    disabled: uploading,
                    onclick: move |_| on_upload.call(()),
                    "{upload_label}"
                }
                button {
                    class: "collapse-btn",
                    style: "
                        width: 32px; border: 1px solid {BORDER_DEFAULT}; border-radius: 6px;
                        background: transparent; color: {TEXT_MUTED}; font-size: 12px; cursor: pointer;
                    ",
                    title: "Reload",
                    onclick: move |_| on_refresh.call(()),
                    "↻"
                }
            }

            div {
                style: "flex: 1; overflow-y: auto;",

                if files.is_empty() {
                    div {
                        style: "
                            display: flex; flex-direction: column; align-items: center; justify-content: center;
                            height: 120px; border: 1px dashed {BORDER_DEFAULT}; border-radius: 6px;
                            color: {TEXT_DIM}; font-size: 12px; text-align: center; padding: 12px;
                        ",
                        div { style: "font-size: 24px; margin-bottom: 8px;", "📂" }
                        "No media yet"
                        div { style: "font-size: 10px; color: {TEXT_DIM}; margin-top: 4px;", "Upload images or videos" }
                    }
                } else {
                    for file in files.iter() {
                        MediaItem {
                            key: "{file.id}",
                            file: file.clone(),
                            selected: selected_file.as_deref() == Some(file.id.as_str()),
                            on_click: move |file| on_quick_add.call(file),
                            on_drag_start: move |file| on_drag_start.call(file),
                        }
                    }
                }
            }
        }
    }
}
