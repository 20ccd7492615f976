use dioxus::prelude::*;
use crate::constants::*;

/// Fixed-width panel with a tab strip. Content for the active tab is passed
/// as children.
#[component]
pub fn SidePanel(
    tabs: Vec<&'static str>,
    active_tab: usize,
    width: f64,
    side: &'static str,
    on_select_tab: EventHandler<usize>,
    children: Element,
) -> Element {
    let border = if side == "left" {
        format!("border-right: 1px solid {BORDER_DEFAULT};")
    } else {
        format!("border-left: 1px solid {BORDER_DEFAULT};")
    };

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column;
                width: {width}px; min-width: {width}px;
                background-color: {BG_ELEVATED}; {border}
                overflow: hidden;
            ",
            div {
                style: "
                    display: flex; align-items: stretch;
                    height: 32px; padding: 0 4px;
                    background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                    flex-shrink: 0;
                ",
                for (index, title) in tabs.iter().copied().enumerate() {
                    button {
                        class: "collapse-btn",
                        style: "
                            flex: 1; border: none; background: transparent; cursor: pointer;
                            font-size: 11px; font-weight: 500; text-transform: uppercase; letter-spacing: 0.5px;
                            color: {tab_color(index == active_tab)};
                            border-bottom: 2px solid {tab_underline(index == active_tab)};
                        ",
                        onclick: move |_| on_select_tab.call(index),
                        "{title}"
                    }
                }
            }
            div {
                style: "flex: 1; overflow-y: auto;",
                {children}
            }
        }
    }
}

fn tab_color(active: bool) -> &'static str {
    if active {
        TEXT_PRIMARY
    } else {
        TEXT_MUTED
    }
}

fn tab_underline(active: bool) -> &'static str {
    if active {
        BORDER_ACCENT
    } else {
        "transparent"
    }
}
