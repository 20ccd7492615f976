use dioxus::prelude::*;
use crate::constants::*;
use crate::state::{MediaFile, Player};

/// Registered players and the files assigned to each.
#[component]
pub fn PlayersPanelContent(
    players: Vec<Player>,
    files: Vec<MediaFile>,
    selected_code: Option<String>,
    on_select: EventHandler<Option<String>>,
    on_create: EventHandler<()>,
    on_toggle_file: EventHandler<(String, String)>,
) -> Element {
    let selected = selected_code
        .as_deref()
        .and_then(|code| players.iter().find(|player| player.code == code))
        .cloned();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100%; padding: 8px; gap: 4px;",

            button {
                style: "
                    width: 100%; padding: 8px 12px; margin-bottom: 4px;
                    background-color: {BG_SURFACE}; border: 1px dashed {BORDER_DEFAULT};
                    border-radius: 6px; color: {TEXT_SECONDARY}; font-size: 12px; cursor: pointer;
                ",
                onclick: move |_| on_create.call(()),
                "＋ Register player"
            }

            for player in players.iter() {
                div {
                    key: "{player.code}",
                    style: "
                        display: flex; align-items: center; justify-content: space-between;
                        padding: 8px; border-radius: 4px; cursor: pointer; font-size: 12px;
                        background-color: {row_background(selected_code.as_deref() == Some(player.code.as_str()))};
                        border: 1px solid {BORDER_SUBTLE};
                    ",
                    onclick: {
                        let code = player.code.clone();
                        move |_| on_select.call(Some(code.clone()))
                    },
                    span { style: "color: {TEXT_PRIMARY};", "{player.name}" }
                    span {
                        style: "font-family: 'SF Mono', Consolas, monospace; color: {TEXT_MUTED};",
                        "{player.code} · {player.files.len()}"
                    }
                }
            }

            if let Some(player) = selected {
                div {
                    style: "margin-top: 8px; padding-top: 8px; border-top: 1px solid {BORDER_DEFAULT};",
                    div {
                        style: "font-size: 10px; color: {TEXT_DIM}; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 6px;",
                        "Files on {player.name}"
                    }
                    for file in files.iter() {
                        label {
                            key: "{file.id}",
                            style: "display: flex; align-items: center; gap: 6px; padding: 3px 0; font-size: 12px; color: {TEXT_SECONDARY};",
                            input {
                                r#type: "checkbox",
                                checked: player.has_file(&file.id),
                                onchange: {
                                    let payload = (player.code.clone(), file.id.clone());
                                    move |_| on_toggle_file.call(payload.clone())
                                },
                            }
                            "{file.name}"
                        }
                    }
                }
            }
        }
    }
}

fn row_background(active: bool) -> &'static str {
    if active {
        BG_HOVER
    } else {
        BG_SURFACE
    }
}
