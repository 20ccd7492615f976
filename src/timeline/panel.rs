use dioxus::prelude::*;

use crate::constants::{ACCENT_WARNING, BG_ELEVATED, BG_SURFACE, BORDER_DEFAULT, BORDER_SUBTLE, TEXT_DIM};
use crate::core::session::EditorSession;
use crate::core::timeline_view::{card_width, ms_at_offset, ruler_seconds};
use crate::state::MediaFile;

use super::item_card::ItemCard;
use super::playback_controls::PlaybackToolbar;
use super::ruler::TimeRuler;

struct CardView {
    id: String,
    name: String,
    duration_seconds: f64,
    is_video: bool,
    selected: bool,
}

/// Timeline strip with its toolbar. Cards are clicked to jump and dragged
/// onto another card to reorder.
#[component]
pub fn TimelinePanel(
    session: Signal<EditorSession>,
    files: Signal<Vec<MediaFile>>,
    height: f64,
    status: String,
) -> Element {
    let mut session = session;
    let mut pressed_card = use_signal(|| None::<usize>);
    let mut hovered_card = use_signal(|| None::<usize>);

    let (cards, pixels_per_second, total_ms, elapsed_ms, current_index, show_playhead) = {
        let session_ref = session.read();
        let files_ref = files.read();
        let cards: Vec<CardView> = session_ref
            .doc
            .items()
            .iter()
            .map(|item| {
                let file = files_ref.iter().find(|file| file.id == item.element.file_id);
                CardView {
                    id: item.id().to_string(),
                    name: file
                        .map(|file| file.name.clone())
                        .unwrap_or_else(|| item.element.file_id.clone()),
                    duration_seconds: item.duration_seconds,
                    is_video: file.is_some_and(MediaFile::is_video),
                    selected: session_ref.selection.is_element_selected(item.id()),
                }
            })
            .collect();
        let state = session_ref.playback.state();
        (
            cards,
            session_ref.pixels_per_second,
            session_ref.doc.total_duration_ms(),
            state.elapsed_ms,
            state.current_index,
            state.is_playing || state.current_index.is_some(),
        )
    };
    let content_width = ruler_seconds(total_ms) as f64 * pixels_per_second + 40.0;
    let playhead_x = elapsed_ms / 1000.0 * pixels_per_second;
    let is_empty = cards.is_empty();
    let strip_width: f64 = cards
        .iter()
        .map(|card| card_width(card.duration_seconds, pixels_per_second))
        .sum();

    rsx! {
        div {
            style: "
                display: flex; flex-direction: column;
                height: {height}px; min-height: {height}px;
                background-color: {BG_ELEVATED}; border-top: 1px solid {BORDER_DEFAULT};
            ",
            onmouseup: move |_| pressed_card.set(None),
            onmouseleave: move |_| hovered_card.set(None),

            PlaybackToolbar { session, status }

            div {
                style: "flex: 1; overflow-x: auto; overflow-y: hidden; position: relative;",
                div {
                    style: "position: relative; width: {content_width}px; height: 100%;",

                    // Ruler: click to seek
                    div {
                        style: "
                            position: relative; height: 24px; cursor: pointer;
                            background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_SUBTLE};
                        ",
                        onclick: move |e| {
                            let ms = ms_at_offset(e.element_coordinates().x, pixels_per_second);
                            session.write().seek(ms);
                        },
                        TimeRuler { total_ms, pixels_per_second }
                    }

                    div {
                        style: "display: flex; gap: 0; padding: 8px 0; width: {strip_width}px;",
                        if is_empty {
                            div {
                                style: "padding: 12px; font-size: 12px; color: {TEXT_DIM}; white-space: nowrap;",
                                "Timeline is empty"
                            }
                        }
                        for (index, card) in cards.into_iter().enumerate() {
                            div {
                                key: "{card.id}",
                                onmouseenter: move |_| hovered_card.set(Some(index)),
                                ItemCard {
                                    index,
                                    name: card.name,
                                    duration_seconds: card.duration_seconds,
                                    pixels_per_second,
                                    is_video: card.is_video,
                                    selected: card.selected,
                                    active: current_index == Some(index),
                                    drop_target: pressed_card().is_some_and(|from| from != index)
                                        && hovered_card() == Some(index),
                                    on_press: move |index| pressed_card.set(Some(index)),
                                    on_release: move |to| {
                                        match pressed_card() {
                                            Some(from) if from != to => session.write().reorder(from, to),
                                            _ => session.write().select_card(to),
                                        }
                                    },
                                }
                            }
                        }
                    }

                    if show_playhead {
                        div {
                            style: "
                                position: absolute; top: 0; bottom: 0; left: {playhead_x}px;
                                width: 2px; background-color: {ACCENT_WARNING}; pointer-events: none;
                            ",
                        }
                    }
                }
            }
        }
    }
}
