use dioxus::prelude::*;

use crate::components::common::NumericField;
use crate::constants::*;
use crate::core::session::EditorSession;
use crate::state::{BoundsEdit, MediaFile, MediaKind};
use crate::utils::media_src;

#[derive(Clone, Copy)]
enum BoundsField {
    X,
    Y,
    W,
    H,
}

impl BoundsField {
    fn edit(self, value: f64) -> BoundsEdit {
        let mut edit = BoundsEdit::default();
        match self {
            BoundsField::X => edit.x = Some(value),
            BoundsField::Y => edit.y = Some(value),
            BoundsField::W => edit.w = Some(value),
            BoundsField::H => edit.h = Some(value),
        }
        edit
    }
}

/// Properties of the selected element.
#[component]
pub fn InspectorPanelContent(session: Signal<EditorSession>, files: Signal<Vec<MediaFile>>) -> Element {
    let mut session = session;

    let selected = {
        let session_ref = session.read();
        session_ref
            .selection
            .primary_element()
            .and_then(|id| session_ref.doc.find_element(id))
            .cloned()
            .map(|element| {
                let duration = session_ref
                    .doc
                    .index_of(&element.id)
                    .and_then(|index| session_ref.doc.item_at(index))
                    .map(|item| item.duration_seconds)
                    .unwrap_or(DEFAULT_ITEM_DURATION_SECONDS);
                let right_margin = element.right_margin(session_ref.doc.width);
                (element, duration, right_margin)
            })
    };
    let aspect_locked = session.read().aspect_locked;

    let Some((element, duration, right_margin)) = selected else {
        return rsx! {
            div {
                style: "padding: 16px; font-size: 12px; color: {TEXT_DIM}; text-align: center;",
                "Select an element on the canvas"
            }
        };
    };

    let file = files.read().iter().find(|file| file.id == element.file_id).cloned();
    let element_id = element.id.clone();
    let edit = move |field: BoundsField| {
        let id = element_id.clone();
        move |value: f64| session.write().set_explicit_bounds(&id, field.edit(value))
    };
    let id_for_full = element.id.clone();
    let id_for_duration = element.id.clone();
    let id_for_delete = element.id.clone();
    let key = element.id.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px; padding: 12px;",

            // Preview
            div {
                style: "
                    width: 100%; aspect-ratio: 16 / 9; border-radius: 4px; overflow: hidden;
                    background-color: {BG_BASE}; border: 1px solid {BORDER_SUBTLE};
                    display: flex; align-items: center; justify-content: center;
                ",
                match file.as_ref() {
                    Some(file) if file.kind() == MediaKind::Video => rsx! {
                        video {
                            src: "{media_src(&file.url)}",
                            muted: true,
                            controls: true,
                            style: "width: 100%; height: 100%; object-fit: contain;",
                        }
                    },
                    Some(file) => rsx! {
                        img {
                            src: "{media_src(&file.url)}",
                            style: "width: 100%; height: 100%; object-fit: contain;",
                        }
                    },
                    None => rsx! {
                        span { style: "font-size: 11px; color: {TEXT_DIM};", "Missing media" }
                    },
                }
            }
            div {
                style: "font-size: 12px; color: {TEXT_SECONDARY}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                {file.as_ref().map(|file| file.name.clone()).unwrap_or_else(|| element.file_id.clone())}
            }

            div {
                style: "display: grid; grid-template-columns: 1fr 1fr; gap: 8px;",
                NumericField {
                    key: "{key}-x",
                    label: "X",
                    value: element.x,
                    step: "1",
                    clamp_min: Some(0.0),
                    on_commit: edit(BoundsField::X),
                }
                NumericField {
                    key: "{key}-y",
                    label: "Y",
                    value: element.y,
                    step: "1",
                    clamp_min: Some(0.0),
                    on_commit: edit(BoundsField::Y),
                }
                NumericField {
                    key: "{key}-w",
                    label: "Width",
                    value: element.w,
                    step: "1",
                    clamp_min: Some(MIN_EXPLICIT_SIZE_PX),
                    on_commit: edit(BoundsField::W),
                }
                NumericField {
                    key: "{key}-h",
                    label: "Height",
                    value: element.h,
                    step: "1",
                    clamp_min: Some(MIN_EXPLICIT_SIZE_PX),
                    on_commit: edit(BoundsField::H),
                }
            }
            div {
                style: "font-size: 11px; color: {TEXT_MUTED};",
                "Right margin: {right_margin} px"
            }

            NumericField {
                key: "{key}-duration",
                label: "Duration (s)",
                value: duration,
                step: "1",
                clamp_min: Some(MIN_ITEM_DURATION_SECONDS),
                on_commit: move |seconds| session.write().set_duration(&id_for_duration, seconds),
            }

            label {
                style: "display: flex; align-items: center; gap: 6px; font-size: 12px; color: {TEXT_SECONDARY};",
                input {
                    r#type: "checkbox",
                    checked: element.full_canvas,
                    onchange: move |_| session.write().toggle_full_canvas(&id_for_full),
                }
                "Full canvas"
            }
            label {
                style: "display: flex; align-items: center; gap: 6px; font-size: 12px; color: {TEXT_SECONDARY};",
                input {
                    r#type: "checkbox",
                    checked: aspect_locked,
                    onchange: move |e| session.write().aspect_locked = e.checked(),
                }
                "Lock aspect ratio while resizing"
            }

            button {
                style: "
                    padding: 8px; border-radius: 4px; cursor: pointer; font-size: 12px;
                    background: transparent; border: 1px solid {ACCENT_DANGER}; color: {ACCENT_DANGER};
                ",
                onclick: move |_| {
                    session.write().remove_element(&id_for_delete);
                },
                "Delete element"
            }
        }
    }
}
