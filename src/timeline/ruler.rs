use dioxus::prelude::*;
use crate::constants::{BORDER_STRONG, TEXT_DIM};
use crate::core::timeline_view::ruler_ticks;

/// Second ticks with `m:ss` labels. Clicks pass through to the parent strip.
#[component]
pub(crate) fn TimeRuler(total_ms: f64, pixels_per_second: f64) -> Element {
    let ticks = ruler_ticks(total_ms, pixels_per_second);

    rsx! {
        div {
            style: "position: absolute; left: 0; top: 0; width: 100%; height: 100%; pointer-events: none;",
            for seconds in ticks {
                {
                    let x = seconds as f64 * pixels_per_second;
                    let label_x = x + 4.0;
                    let label = format!("{}:{:02}", seconds / 60, seconds % 60);
                    rsx! {
                        div {
                            key: "tick-{seconds}",
                            div {
                                style: "
                                    position: absolute; left: {x}px; bottom: 0;
                                    width: 1px; height: 10px;
                                    background-color: {BORDER_STRONG}; pointer-events: none;
                                ",
                            }
                            div {
                                style: "
                                    position: absolute; left: {label_x}px; top: 3px;
                                    font-size: 9px; color: {TEXT_DIM};
                                    font-family: 'SF Mono', Consolas, monospace;
                                    user-select: none; pointer-events: none;
                                ",
                                "{label}"
                            }
                        }
                    }
                }
            }
        }
    }
}
