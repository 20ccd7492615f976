use dioxus::prelude::*;
use std::rc::Rc;

use crate::constants::*;
use crate::core::interaction::canvas_local_point;
use crate::core::media::spawn_video_probe;
use crate::core::session::EditorSession;
use crate::state::{Bounds, MediaFile, MediaKind, ResizeHandle};
use crate::utils::media_src;

#[derive(Clone, PartialEq)]
struct ElementView {
    id: String,
    file: Option<MediaFile>,
    bounds: Bounds,
    layer: i64,
    visible: bool,
    selected: bool,
}

/// The fixed-size canvas. Elements are positioned in canvas pixels at 1:1;
/// pointer moves and releases are routed by the app root so gestures survive
/// leaving the surface.
#[component]
pub fn CanvasSurface(
    session: Signal<EditorSession>,
    files: Signal<Vec<MediaFile>>,
    dragged_file: Signal<Option<MediaFile>>,
) -> Element {
    let mut session = session;
    let mut surface = use_signal(|| None::<Rc<MountedData>>);

    let (width, height, views) = {
        let session_ref = session.read();
        let files_ref = files.read();
        let doc = &session_ref.doc;
        let views: Vec<ElementView> = doc
            .elements_by_layer()
            .into_iter()
            .map(|element| ElementView {
                id: element.id.clone(),
                file: files_ref.iter().find(|file| file.id == element.file_id).cloned(),
                bounds: element.bounds(),
                layer: element.layer,
                visible: session_ref.playback.is_element_visible(doc, &element.id),
                selected: session_ref.selection.is_element_selected(&element.id),
            })
            .collect();
        (doc.width, doc.height, views)
    };
    let drop_highlight = if dragged_file.read().is_some() { BORDER_ACCENT } else { BORDER_STRONG };

    rsx! {
        div {
            style: "
                flex: 1; overflow: auto; padding: 24px;
                background-color: {BG_DEEPEST};
            ",
            div {
                style: "
                    position: relative; width: {width}px; height: {height}px;
                    background-color: #000; outline: 1px solid {drop_highlight};
                    overflow: hidden; flex-shrink: 0;
                ",
                onmounted: move |e| surface.set(Some(e.data())),
                onmousedown: move |_| session.write().selection.clear(),
                onmouseup: move |e| {
                    let Some(file) = dragged_file() else {
                        return;
                    };
                    let client = (e.client_coordinates().x, e.client_coordinates().y);
                    let mounted = surface();
                    spawn(async move {
                        let origin = match mounted {
                            Some(mounted) => match mounted.get_client_rect().await {
                                Ok(rect) => (rect.origin.x, rect.origin.y),
                                Err(err) => {
                                    tracing::warn!(?err, "Canvas bounds unavailable; dropping at origin");
                                    client
                                }
                            },
                            None => client,
                        };
                        let local = canvas_local_point(client, origin);
                        let element_id = session.write().add_dropped_file(&file, local);
                        if file.is_video() {
                            spawn_video_probe(session, element_id, file.url.clone());
                        }
                    });
                },

                if views.is_empty() {
                    div {
                        style: "
                            position: absolute; inset: 0; display: flex; align-items: center; justify-content: center;
                            color: {TEXT_DIM}; font-size: 13px; pointer-events: none;
                        ",
                        "Drag media here"
                    }
                }

                for view in views {
                    CanvasElement { key: "{view.id}", session, view }
                }
            }
        }
    }
}

#[component]
fn CanvasElement(session: Signal<EditorSession>, view: ElementView) -> Element {
    let mut session = session;
    let bounds = view.bounds;
    let display = if view.visible { "block" } else { "none" };
    let outline = if view.selected {
        format!("2px solid {BORDER_ACCENT}")
    } else {
        "none".to_string()
    };
    let id = view.id.clone();

    rsx! {
        div {
            style: "
                position: absolute; display: {display};
                left: {bounds.x}px; top: {bounds.y}px; width: {bounds.w}px; height: {bounds.h}px;
                z-index: {view.layer}; outline: {outline}; outline-offset: -1px;
                cursor: move; background-color: {BG_SURFACE};
            ",
            onmousedown: move |e| {
                e.prevent_default();
                e.stop_propagation();
                let pointer = e.client_coordinates();
                session.write().begin_move(&id, (pointer.x, pointer.y));
            },

            match view.file.as_ref() {
                Some(file) if file.kind() == MediaKind::Video => rsx! {
                    video {
                        "data-element-id": "{view.id}",
                        src: "{media_src(&file.url)}",
                        muted: true,
                        playsinline: true,
                        preload: "auto",
                        style: "width: 100%; height: 100%; object-fit: cover; pointer-events: none;",
                    }
                },
                Some(file) => rsx! {
                    img {
                        src: "{media_src(&file.url)}",
                        draggable: "false",
                        style: "width: 100%; height: 100%; object-fit: cover; pointer-events: none;",
                    }
                },
                None => rsx! {
                    div {
                        style: "
                            width: 100%; height: 100%; display: flex; align-items: center; justify-content: center;
                            color: {TEXT_DIM}; font-size: 11px; border: 1px dashed {BORDER_STRONG};
                        ",
                        "Missing media"
                    }
                },
            }

            if view.selected {
                for handle in ResizeHandle::ALL {
                    ResizeHandleKnob { session, element_id: view.id.clone(), handle }
                }
            }
        }
    }
}

#[component]
fn ResizeHandleKnob(session: Signal<EditorSession>, element_id: String, handle: ResizeHandle) -> Element {
    let mut session = session;
    let offset = -RESIZE_HANDLE_SIZE_PX / 2.0;
    let position = match handle {
        ResizeHandle::Tl => format!("left: {offset}px; top: {offset}px;"),
        ResizeHandle::Tr => format!("right: {offset}px; top: {offset}px;"),
        ResizeHandle::Bl => format!("left: {offset}px; bottom: {offset}px;"),
        ResizeHandle::Br => format!("right: {offset}px; bottom: {offset}px;"),
    };

    rsx! {
        div {
            "data-handle": "{handle.label()}",
            style: "
                position: absolute; {position}
                width: {RESIZE_HANDLE_SIZE_PX}px; height: {RESIZE_HANDLE_SIZE_PX}px;
                background-color: {TEXT_PRIMARY}; border: 1px solid {BORDER_ACCENT}; border-radius: 2px;
                cursor: {handle.cursor()}; z-index: 1;
            ",
            onmousedown: move |e| {
                e.prevent_default();
                e.stop_propagation();
                let pointer = e.client_coordinates();
                session.write().begin_resize(&element_id, handle, (pointer.x, pointer.y));
            },
        }
    }
}
