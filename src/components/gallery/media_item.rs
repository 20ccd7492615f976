use dioxus::prelude::*;
use crate::constants::*;
use crate::state::{MediaFile, MediaKind};
use crate::utils::media_src;

#[component]
pub fn MediaItem(
    file: MediaFile,
    selected: bool,
    on_click: EventHandler<MediaFile>,
    on_drag_start: EventHandler<MediaFile>,
) -> Element {
    let (icon, accent) = match file.kind() {
        MediaKind::Video => ("🎬", ACCENT_VIDEO),
        MediaKind::Image => ("🖼️", ACCENT_PRIMARY),
        MediaKind::Other => ("📄", TEXT_MUTED),
    };
    let border = if selected { BORDER_ACCENT } else { BORDER_SUBTLE };
    let src = media_src(&file.url);
    let file_for_click = file.clone();
    let file_for_drag = file.clone();

    rsx! {
        div {
            style: "
                display: flex; align-items: center; gap: 8px;
                padding: 8px; margin-bottom: 4px;
                background-color: {BG_SURFACE}; border: 1px solid {border}; border-radius: 4px;
                cursor: grab; transition: background-color 0.1s ease;
                user-select: none;
            ",
            title: "Drag onto the canvas, or click for quick add",
            onmousedown: move |e| {
                // Our own drag; the webview's native drag would swallow mouseup.
                e.prevent_default();
                on_drag_start.call(file_for_drag.clone());
            },
            onclick: move |_| on_click.call(file_for_click.clone()),

            div {
                style: "width: 3px; height: 24px; border-radius: 2px; background-color: {accent};",
            }
            div {
                style: "
                    width: 36px; height: 24px; border-radius: 3px; overflow: hidden;
                    background-color: {BG_BASE}; border: 1px solid {BORDER_SUBTLE};
                    display: flex; align-items: center; justify-content: center;
                    position: relative; flex-shrink: 0;
                ",
                match file.kind() {
                    MediaKind::Image => rsx! {
                        img {
                            src: "{src}",
                            style: "width: 100%; height: 100%; object-fit: cover; pointer-events: none;",
                            draggable: "false",
                        }
                    },
                    MediaKind::Video => rsx! {
                        video {
                            src: "{src}",
                            muted: true,
                            preload: "metadata",
                            style: "width: 100%; height: 100%; object-fit: cover; pointer-events: none;",
                        }
                        span {
                            style: "
                                position: absolute; right: 2px; bottom: 2px;
                                font-size: 9px; color: {TEXT_PRIMARY};
                                background-color: rgba(0,0,0,0.6); padding: 1px 3px;
                                border-radius: 3px; pointer-events: none;
                            ",
                            "{icon}"
                        }
                    },
                    MediaKind::Other => rsx! {
                        span { style: "font-size: 12px; color: {TEXT_MUTED}; pointer-events: none;", "{icon}" }
                    },
                }
            }
            span {
                style: "
                    flex: 1; min-width: 0; font-size: 12px; color: {TEXT_SECONDARY};
                    white-space: nowrap; overflow: hidden; text-overflow: ellipsis;
                ",
                "{file.name}"
            }
        }
    }
}
