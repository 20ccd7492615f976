use dioxus::prelude::*;
use crate::components::common::TextField;
use crate::constants::{BG_HOVER, BORDER_DEFAULT, TEXT_DIM, TEXT_MUTED, TEXT_SECONDARY};
use crate::core::session::EditorSession;
use crate::utils::format_clock;

/// Playback button
#[component]
pub(crate) fn PlaybackBtn(
    icon: &'static str,
    title: &'static str,
    #[props(default = false)] primary: bool,
    on_click: EventHandler<MouseEvent>,
) -> Element {
    let bg = if primary { BG_HOVER } else { "transparent" };
    rsx! {
        button {
            class: "collapse-btn",
            title: "{title}",
            style: "width: 26px; height: 26px; border: none; border-radius: 4px; background-color: {bg}; color: {TEXT_MUTED}; font-size: 10px; cursor: pointer; display: flex; align-items: center; justify-content: center; transition: all 0.12s ease;",
            onclick: move |e| on_click.call(e),
            "{icon}"
        }
    }
}

/// Toolbar above the strip: transport, loop, canvas name, clock and zoom.
#[component]
pub(crate) fn PlaybackToolbar(session: Signal<EditorSession>, status: String) -> Element {
    let mut session = session;
    let (is_playing, looping, elapsed_ms, total_ms, name, pixels_per_second) = {
        let session_ref = session.read();
        let state = session_ref.playback.state();
        (
            state.is_playing,
            state.looping,
            state.elapsed_ms,
            session_ref.doc.total_duration_ms(),
            session_ref.doc.name.clone(),
            session_ref.pixels_per_second,
        )
    };
    let play_icon = if is_playing { "⏸" } else { "▶" };

    rsx! {
        div {
            style: "
                display: flex; align-items: center; gap: 8px;
                height: 36px; padding: 0 10px; flex-shrink: 0;
                border-bottom: 1px solid {BORDER_DEFAULT};
            ",
            PlaybackBtn {
                icon: play_icon,
                title: "Play / pause (Space)",
                primary: true,
                on_click: move |_| session.write().toggle_play(),
            }
            PlaybackBtn {
                icon: "■",
                title: "Stop",
                on_click: move |_| session.write().stop(),
            }
            label {
                style: "display: flex; align-items: center; gap: 4px; font-size: 11px; color: {TEXT_SECONDARY};",
                input {
                    r#type: "checkbox",
                    checked: looping,
                    onchange: move |e| session.write().playback.set_loop(e.checked()),
                }
                "Loop"
            }
            span {
                style: "font-size: 11px; color: {TEXT_DIM}; font-family: 'SF Mono', Consolas, monospace;",
                "{format_clock(elapsed_ms)} / {format_clock(total_ms)}"
            }

            TextField {
                label: "",
                value: name,
                width: Some("200px"),
                on_commit: move |name: String| session.write().rename(&name),
            }
            span {
                style: "flex: 1; font-size: 11px; color: {TEXT_MUTED}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                "{status}"
            }

            PlaybackBtn {
                icon: "−",
                title: "Zoom out (-)",
                on_click: move |_| session.write().zoom_out(),
            }
            TextField {
                label: "",
                value: format!("{pixels_per_second:.0}"),
                width: Some("52px"),
                on_commit: move |text: String| session.write().set_zoom_input(&text),
            }
            span { style: "font-size: 10px; color: {TEXT_DIM};", "px/s" }
            PlaybackBtn {
                icon: "+",
                title: "Zoom in (+)",
                on_click: move |_| session.write().zoom_in(),
            }
        }
    }
}
