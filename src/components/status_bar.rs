use dioxus::prelude::*;
use crate::constants::*;
use crate::utils::format_clock;

#[component]
pub fn StatusBar(message: String, remote_enabled: bool, elapsed_ms: f64, total_ms: f64) -> Element {
    let storage = if remote_enabled { "Remote storage (local fallback)" } else { "Local storage" };
    rsx! {
        div {
            style: "display: flex; align-items: center; justify-content: space-between; height: 22px; padding: 0 14px; background-color: {BG_SURFACE}; border-top: 1px solid {BORDER_DEFAULT}; font-size: 11px; color: {TEXT_DIM};",
            span { "{message}" }
            div {
                style: "display: flex; gap: 16px; font-family: 'SF Mono', Consolas, monospace;",
                span { "{storage}" }
                span { "{format_clock(elapsed_ms)} / {format_clock(total_ms)}" }
            }
        }
    }
}
