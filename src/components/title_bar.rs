use dioxus::prelude::*;
use crate::components::common::TextField;
use crate::constants::*;
use crate::core::session::EditorSession;

/// Canvas-level actions and settings: new, reset, size, save.
#[component]
pub fn TitleBar(session: Signal<EditorSession>, on_new: EventHandler<()>, on_save: EventHandler<()>) -> Element {
    let mut session = session;
    let (width, height, dirty, saving) = {
        let session_ref = session.read();
        (
            session_ref.doc.width,
            session_ref.doc.height,
            session_ref.is_dirty(),
            session_ref.is_saving(),
        )
    };
    let save_label = if saving { "Saving..." } else { "Save" };
    let save_state = if dirty { "Unsaved changes" } else { "All changes saved" };
    let button_style = format!(
        "background: transparent; border: none; color: {TEXT_PRIMARY}; \
         font-size: 12px; cursor: pointer; padding: 4px 8px; border-radius: 4px;"
    );

    rsx! {
        div {
            style: "
                display: flex; align-items: center; justify-content: space-between;
                height: 40px; padding: 0 16px;
                background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                user-select: none;
            ",
            div {
                style: "display: flex; align-items: center; gap: 20px;",
                span { style: "font-size: 13px; font-weight: 600; color: {TEXT_SECONDARY};", "Signage Studio" }
                button {
                    class: "collapse-btn",
                    style: "{button_style}",
                    onclick: move |_| on_new.call(()),
                    "New Canvas"
                }
                button {
                    class: "collapse-btn",
                    style: "{button_style}",
                    title: "Remove every element",
                    onclick: move |_| session.write().reset(),
                    "Reset"
                }
            }
            div {
                style: "display: flex; align-items: center; gap: 6px; font-size: 11px; color: {TEXT_MUTED};",
                span { "Canvas" }
                TextField {
                    label: "",
                    value: width.to_string(),
                    width: Some("72px"),
                    on_commit: move |text: String| {
                        let height = session.read().doc.height.to_string();
                        session.write().set_dimensions_input(&text, &height);
                    },
                }
                span { "×" }
                TextField {
                    label: "",
                    value: height.to_string(),
                    width: Some("72px"),
                    on_commit: move |text: String| {
                        let width = session.read().doc.width.to_string();
                        session.write().set_dimensions_input(&width, &text);
                    },
                }
                span { "px" }
            }
            div {
                style: "display: flex; align-items: center; justify-content: flex-end; gap: 12px; min-width: 220px;",
                span { style: "font-size: 11px; color: {TEXT_DIM};", "{save_state}" }
                button {
                    class: "collapse-btn",
                    style: "
                        background: {ACCENT_PRIMARY}; border: none; color: white;
                        font-size: 12px; cursor: pointer; padding: 4px 12px; border-radius: 4px;
                    ",
                    disabled: saving,
                    onclick: move |_| on_save.call(()),
                    "{save_label}"
                }
            }
        }
    }
}
