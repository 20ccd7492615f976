use dioxus::prelude::*;
use crate::constants::{ACCENT_PRIMARY, ACCENT_VIDEO, BG_HOVER, BG_SURFACE, BORDER_ACCENT, BORDER_DEFAULT, TEXT_MUTED, TEXT_PRIMARY};
use crate::core::timeline_view::{card_width, shows_card_label};

/// One timeline slot. Width is proportional to its display duration.
#[component]
pub(crate) fn ItemCard(
    index: usize,
    name: String,
    duration_seconds: f64,
    pixels_per_second: f64,
    is_video: bool,
    selected: bool,
    active: bool,
    drop_target: bool,
    on_press: EventHandler<usize>,
    on_release: EventHandler<usize>,
) -> Element {
    let width = card_width(duration_seconds, pixels_per_second);
    let accent = if is_video { ACCENT_VIDEO } else { ACCENT_PRIMARY };
    let border = if selected || drop_target { BORDER_ACCENT } else { BORDER_DEFAULT };
    let background = if active { BG_HOVER } else { BG_SURFACE };

    rsx! {
        div {
            style: "
                position: relative; flex-shrink: 0; box-sizing: border-box;
                width: {width}px; height: 48px; overflow: hidden;
                background-color: {background}; border: 1px solid {border};
                border-left: 3px solid {accent}; border-radius: 4px;
                padding: 4px 6px; cursor: pointer; user-select: none;
            ",
            title: "{name} ({duration_seconds}s)",
            onmousedown: move |e| {
                e.prevent_default();
                on_press.call(index);
            },
            onmouseup: move |_| on_release.call(index),

            if shows_card_label(width) {
                div {
                    style: "font-size: 11px; color: {TEXT_PRIMARY}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; pointer-events: none;",
                    "{name}"
                }
                div {
                    style: "font-size: 10px; color: {TEXT_MUTED}; pointer-events: none;",
                    "{duration_seconds}s"
                }
            }
        }
    }
}
