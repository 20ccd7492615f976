use dioxus::prelude::*;

use crate::components::common::NumericField;
use crate::constants::*;
use crate::core::session::EditorSession;
use crate::state::{QuickAddPosition, QuickAddRequest};

/// Preset placement for a gallery file: size, horizontal position, duration.
#[component]
pub fn QuickAddModal(session: Signal<EditorSession>) -> Element {
    let mut session = session;
    let request = session.read().quick_add.clone();
    let Some(request) = request else {
        return rsx! {};
    };

    let positions: Vec<(QuickAddPosition, &'static str)> = QuickAddPosition::ALL
        .into_iter()
        .map(|position| (position, position_background(request.position == position)))
        .collect();

    let mut update = move |apply: fn(&mut QuickAddRequest, f64), value: f64| {
        if let Some(request) = session.write().quick_add.as_mut() {
            apply(request, value);
        }
    };

    rsx! {
        div {
            style: "
                position: fixed; top: 0; left: 0; right: 0; bottom: 0;
                background-color: rgba(0, 0, 0, 0.5);
                display: flex; align-items: center; justify-content: center;
                z-index: 2000;
            ",
            onclick: move |_| session.write().cancel_quick_add(),
            div {
                style: "
                    width: 360px; background-color: {BG_ELEVATED};
                    border: 1px solid {BORDER_DEFAULT}; border-radius: 8px;
                    padding: 24px; box-shadow: 0 10px 25px rgba(0,0,0,0.5);
                    display: flex; flex-direction: column; gap: 16px;
                ",
                onclick: move |e| e.stop_propagation(),

                h3 { style: "margin: 0; font-size: 16px; color: {TEXT_PRIMARY};", "Quick add" }

                div {
                    style: "display: flex; gap: 4px;",
                    for (position, background) in positions {
                        button {
                            style: "
                                flex: 1; padding: 6px 8px; border-radius: 4px; font-size: 12px; cursor: pointer;
                                background: {background};
                                border: 1px solid {BORDER_DEFAULT}; color: {TEXT_PRIMARY};
                            ",
                            onclick: move |_| {
                                if let Some(request) = session.write().quick_add.as_mut() {
                                    request.position = position;
                                }
                            },
                            "{position.label()}"
                        }
                    }
                }

                div {
                    style: "display: grid; grid-template-columns: 1fr 1fr; gap: 8px;",
                    NumericField {
                        label: "Width",
                        value: request.width,
                        step: "1",
                        clamp_min: Some(MIN_EXPLICIT_SIZE_PX),
                        on_commit: move |value| update(|request, value| request.width = value, value),
                    }
                    NumericField {
                        label: "Height",
                        value: request.height,
                        step: "1",
                        clamp_min: Some(MIN_EXPLICIT_SIZE_PX),
                        on_commit: move |value| update(|request, value| request.height = value, value),
                    }
                }
                NumericField {
                    label: "Duration (s)",
                    value: request.duration_seconds,
                    step: "1",
                    clamp_min: Some(MIN_ITEM_DURATION_SECONDS),
                    on_commit: move |value| update(|request, value| request.duration_seconds = value, value),
                }

                div {
                    style: "display: flex; justify-content: flex-end; gap: 8px;",
                    button {
                        style: "padding: 8px 14px; background: transparent; border: 1px solid {BORDER_DEFAULT}; border-radius: 4px; color: {TEXT_SECONDARY}; cursor: pointer;",
                        onclick: move |_| session.write().cancel_quick_add(),
                        "Cancel"
                    }
                    button {
                        style: "padding: 8px 14px; background: {ACCENT_PRIMARY}; border: none; border-radius: 4px; color: white; cursor: pointer;",
                        onclick: move |_| {
                            if let Some(id) = session.write().confirm_quick_add() {
                                tracing::info!(element_id = %id, "Element added");
                            }
                        },
                        "Add to canvas"
                    }
                }
            }
        }
    }
}

fn position_background(active: bool) -> &'static str {
    if active {
        BG_HOVER
    } else {
        "transparent"
    }
}
