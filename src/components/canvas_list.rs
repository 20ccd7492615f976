use dioxus::prelude::*;
use crate::constants::*;
use crate::state::CanvasSummary;

/// Saved canvases: open, create, delete.
#[component]
pub fn CanvasListContent(
    canvases: Vec<CanvasSummary>,
    current_id: String,
    on_open: EventHandler<String>,
    on_new: EventHandler<()>,
    on_delete: EventHandler<String>,
    on_refresh: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100%; padding: 8px; gap: 4px;",

            div {
                style: "display: flex; gap: 4px; margin-bottom: 4px;",
                button {
                    style: "
                        flex: 1; padding: 8px 12px;
                        background-color: {BG_SURFACE}; border: 1px dashed {BORDER_DEFAULT};
                        border-radius: 6px; color: {TEXT_SECONDARY}; font-size: 12px; cursor: pointer;
                    ",
                    onclick: move |_| on_new.call(()),
                    "＋ New canvas"
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

            if canvases.is_empty() {
                div {
                    style: "padding: 12px; font-size: 12px; color: {TEXT_DIM}; text-align: center;",
                    "No saved canvases"
                }
            }

            for canvas in canvases {
                CanvasRow {
                    key: "{canvas.id}",
                    active: canvas.id == current_id,
                    canvas: canvas.clone(),
                    on_open,
                    on_delete,
                }
            }
        }
    }
}

#[component]
fn CanvasRow(
    canvas: CanvasSummary,
    active: bool,
    on_open: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let background = if active { BG_HOVER } else { BG_SURFACE };
    let id_for_open = canvas.id.clone();
    let id_for_delete = canvas.id.clone();

    rsx! {
        div {
            style: "
                display: flex; align-items: center; gap: 8px;
                padding: 8px; border-radius: 4px; cursor: pointer;
                background-color: {background}; border: 1px solid {BORDER_SUBTLE};
            ",
            onclick: move |_| on_open.call(id_for_open.clone()),
            span {
                style: "flex: 1; min-width: 0; font-size: 12px; color: {TEXT_PRIMARY}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                "{canvas.name}"
            }
            button {
                style: "border: none; background: transparent; color: {TEXT_MUTED}; cursor: pointer; font-size: 12px;",
                title: "Delete canvas",
                onclick: move |e| {
                    e.stop_propagation();
                    on_delete.call(id_for_delete.clone());
                },
                "✕"
            }
        }
    }
}
