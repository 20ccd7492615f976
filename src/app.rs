//! Root application component
//!
//! Owns the editor session, the storage handle and the media, player and
//! canvas lists, and lays out the panels around the canvas.

use dioxus::prelude::*;
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::components::common::FieldFocus;
use crate::components::gallery::GalleryPanelContent;
use crate::components::{
    CanvasListContent, CanvasSurface, InspectorPanelContent, PlayersPanelContent, QuickAddModal, SidePanel,
    StatusBar, TitleBar,
};
use crate::constants::*;
use crate::core::playback::{MediaCommand, PlaybackEvent};
use crate::core::session::EditorSession;
use crate::core::storage::{FallbackStore, SignageStore, StorageConfig, UploadRequest};
use crate::hotkeys::{handle_hotkey, HotkeyAction, HotkeyContext, HotkeyResult};
use crate::state::{CanvasSummary, MediaFile, Player};
use crate::timeline::TimelinePanel;

const LEFT_TABS: [&str; 3] = ["Canvases", "Media", "Players"];
const TAB_CANVASES: usize = 0;
const TAB_MEDIA: usize = 1;

#[derive(Serialize)]
struct MediaSyncMessage {
    kind: &'static str,
    id: String,
}

impl From<MediaCommand> for MediaSyncMessage {
    fn from(command: MediaCommand) -> Self {
        match command {
            MediaCommand::Restart(id) => Self { kind: "restart", id },
            MediaCommand::PauseAndRewind(id) => Self { kind: "rewind", id },
        }
    }
}

#[component]
pub fn App() -> Element {
    let store = use_context_provider(|| Arc::new(FallbackStore::from_config(&StorageConfig::from_env())));
    let remote_enabled = store.has_remote();

    // Editor session; the playback channel is drained below.
    let playback_rx = use_hook(|| Rc::new(RefCell::new(None::<UnboundedReceiver<PlaybackEvent>>)));
    let mut session = use_signal({
        let playback_rx = playback_rx.clone();
        move || {
            let (events, receiver) = unbounded_channel();
            *playback_rx.borrow_mut() = Some(receiver);
            EditorSession::new(events)
        }
    });

    // Collections from storage
    let mut files = use_signal(Vec::<MediaFile>::new);
    let mut players = use_signal(Vec::<Player>::new);
    let mut canvases = use_signal(Vec::<CanvasSummary>::new);
    let mut status = use_signal(|| "Ready".to_string());
    let mut uploading = use_signal(|| false);

    // Panel and drag state
    let mut left_tab = use_signal(|| TAB_MEDIA);
    let mut dragged_file = use_signal(|| None::<MediaFile>);
    let mut mouse_pos = use_signal(|| (0.0, 0.0));
    let field_focused = use_signal(|| false);
    use_context_provider(|| FieldFocus(field_focused));
    let mut media_eval = use_signal(|| None::<document::Eval>);

    // =========================================================================
    // Storage actions
    // =========================================================================

    let load_files = use_callback({
        let store = store.clone();
        move |()| {
            let store = store.clone();
            spawn(async move {
                match store.list_files().await {
                    Ok(list) => files.set(list),
                    Err(err) => {
                        tracing::warn!(error = %err, "Could not list media");
                        status.set(format!("Could not load media: {err}"));
                    }
                }
            });
        }
    });

    let load_players = use_callback({
        let store = store.clone();
        move |()| {
            let store = store.clone();
            spawn(async move {
                match store.list_players().await {
                    Ok(list) => players.set(list),
                    Err(err) => {
                        tracing::warn!(error = %err, "Could not list players");
                        status.set(format!("Could not load players: {err}"));
                    }
                }
            });
        }
    });

    let load_canvases = use_callback({
        let store = store.clone();
        move |()| {
            let store = store.clone();
            spawn(async move {
                match store.list_canvases().await {
                    Ok(list) => canvases.set(list),
                    Err(err) => {
                        tracing::warn!(error = %err, "Could not list canvases");
                        status.set(format!("Could not load canvases: {err}"));
                    }
                }
            });
        }
    });

    let open_canvas = use_callback({
        let store = store.clone();
        move |id: String| {
            let store = store.clone();
            spawn(async move {
                let loaded = store.get_canvas(&id).await;
                let opened = session.write().open_loaded(&id, loaded);
                match opened {
                    Ok(()) => {
                        tracing::info!(canvas_id = %id, "Canvas opened");
                        status.set(format!("Opened {}", session.peek().doc.name));
                    }
                    Err(err) => {
                        tracing::warn!(canvas_id = %id, error = %err, "Could not open canvas");
                        status.set(format!("Could not open canvas: {err}"));
                    }
                }
            });
        }
    });

    let new_canvas = use_callback(move |()| {
        session.write().new_document("Untitled");
        status.set("New canvas".to_string());
    });

    let delete_canvas = use_callback({
        let store = store.clone();
        move |id: String| {
            let store = store.clone();
            spawn(async move {
                match store.delete_canvas(&id).await {
                    Ok(()) => {
                        tracing::info!(canvas_id = %id, "Canvas deleted");
                        if session.peek().doc.id == id {
                            session.write().new_document("Untitled");
                        }
                        status.set("Canvas deleted".to_string());
                        load_canvases.call(());
                    }
                    Err(err) => {
                        tracing::warn!(canvas_id = %id, error = %err, "Could not delete canvas");
                        status.set(format!("Could not delete canvas: {err}"));
                    }
                }
            });
        }
    });

    let save_canvas = use_callback({
        let store = store.clone();
        move |()| {
            let Some(record) = session.write().begin_save() else {
                return;
            };
            let store = store.clone();
            status.set("Saving...".to_string());
            spawn(async move {
                let result = store.upsert_canvas(&record).await;
                session.write().finish_save(result.is_ok());
                match result {
                    Ok(id) => {
                        tracing::info!(canvas_id = %id, "Canvas saved");
                        status.set(format!("Saved {}", record.name));
                        load_canvases.call(());
                    }
                    Err(err) => {
                        tracing::warn!(canvas_id = %record.id, error = %err, "Save failed");
                        status.set(format!("Save failed: {err}"));
                    }
                }
            });
        }
    });

    let upload_media = use_callback({
        let store = store.clone();
        move |()| {
            let Some(paths) = rfd::FileDialog::new()
                .add_filter("Media", &["png", "jpg", "jpeg", "gif", "webp", "svg", "mp4", "mov", "webm", "mkv"])
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "svg"])
                .add_filter("Video", &["mp4", "mov", "webm", "mkv"])
                .set_title("Upload Media")
                .pick_files()
            else {
                return;
            };
            let store = store.clone();
            uploading.set(true);
            spawn(async move {
                let mut uploaded = 0usize;
                for path in paths {
                    match upload_path(store.as_ref(), &path).await {
                        Ok(file) => {
                            uploaded += 1;
                            files.write().insert(0, file);
                        }
                        Err(message) => {
                            tracing::warn!(path = %path.display(), %message, "Upload failed");
                            status.set(message);
                        }
                    }
                }
                if uploaded > 0 {
                    status.set(format!("Uploaded {uploaded} file(s)"));
                }
                uploading.set(false);
            });
        }
    });

    let create_player = use_callback({
        let store = store.clone();
        move |()| {
            let store = store.clone();
            spawn(async move {
                match store.create_player().await {
                    Ok(player) => {
                        status.set(format!("Registered player {}", player.code));
                        session.write().selection.select_player(Some(player.code.clone()));
                        players.write().insert(0, player);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Could not create player");
                        status.set(format!("Could not register player: {err}"));
                    }
                }
            });
        }
    });

    let toggle_player_file = use_callback({
        let store = store.clone();
        move |(code, file_id): (String, String)| {
            let Some(assigned) = players
                .peek()
                .iter()
                .find(|player| player.code == code)
                .map(|player| player.toggled_files(&file_id))
            else {
                return;
            };
            let store = store.clone();
            spawn(async move {
                match store.set_player_files(&code, assigned).await {
                    Ok(updated) => {
                        if let Some(player) = players.write().iter_mut().find(|player| player.code == updated.code) {
                            *player = updated;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%code, error = %err, "Could not update player files");
                        status.set(format!("Could not update player: {err}"));
                    }
                }
            });
        }
    });

    // =========================================================================
    // Background wiring
    // =========================================================================

    use_hook(move || {
        load_files.call(());
        load_players.call(());
        load_canvases.call(());
    });

    use_future(move || {
        let playback_rx = playback_rx.clone();
        async move {
            let Some(mut receiver) = playback_rx.borrow_mut().take() else {
                return;
            };
            while let Some(event) = receiver.recv().await {
                session.write().handle_playback_event(event);
            }
        }
    });

    use_effect(move || {
        if media_eval().is_some() {
            return;
        }
        media_eval.set(Some(document::eval(MEDIA_SYNC_SCRIPT)));
    });

    // Rewind and restart <video> nodes whenever the playing item changes.
    use_effect(move || {
        let Some(eval) = media_eval() else {
            return;
        };
        if !session.read().needs_media_sync() {
            return;
        }
        let commands = {
            let files = files.peek();
            session.write().take_media_sync(&files)
        };
        for command in commands.into_iter().flatten() {
            if let Err(err) = eval.send(MediaSyncMessage::from(command)) {
                tracing::debug!(?err, "Media sync message not delivered");
            }
        }
    });

    // =========================================================================
    // Layout
    // =========================================================================

    let (elapsed_ms, total_ms, current_id, selected_player, selected_file) = {
        let session_ref = session.read();
        (
            session_ref.playback.elapsed_ms(),
            session_ref.doc.total_duration_ms(),
            session_ref.doc.id.clone(),
            session_ref.selection.player_code.clone(),
            session_ref.selection.primary_file().map(str::to_string),
        )
    };
    let ghost_name = dragged_file.read().as_ref().map(|file| file.name.clone());
    let (ghost_x, ghost_y) = {
        let (x, y) = mouse_pos();
        (x + 15.0, y + 15.0)
    };
    let drag_cursor = if ghost_name.is_some() {
        "grabbing"
    } else if session.read().interaction.is_active() {
        "move"
    } else {
        "default"
    };

    rsx! {
        style {
            r#"
            *, *::before, *::after {{ box-sizing: border-box; }}
            html, body {{ margin: 0; padding: 0; overflow: hidden; background-color: {BG_BASE}; }}
            body {{ -webkit-font-smoothing: antialiased; }}
            ::-webkit-scrollbar {{ width: 6px; height: 6px; }}
            ::-webkit-scrollbar-track {{ background: transparent; }}
            ::-webkit-scrollbar-thumb {{ background: {BORDER_DEFAULT}; border-radius: 3px; }}
            ::-webkit-scrollbar-thumb:hover {{ background: {BORDER_STRONG}; }}
            .collapse-btn {{ opacity: 0.8; transition: opacity 0.15s ease, background-color 0.15s ease; }}
            .collapse-btn:hover {{ opacity: 1; background-color: {BG_HOVER} !important; }}
            button:disabled {{ opacity: 0.5; cursor: default !important; }}
            "#
        }

        div {
            class: "app-container",
            style: "
                display: flex; flex-direction: column;
                width: 100vw; height: 100vh;
                background-color: {BG_BASE}; color: {TEXT_PRIMARY};
                font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
                overflow: hidden; position: fixed; top: 0; left: 0;
                user-select: none;
                cursor: {drag_cursor};
            ",
            tabindex: "0",

            onmousemove: move |e| {
                let pointer = (e.client_coordinates().x, e.client_coordinates().y);
                if dragged_file.peek().is_some() {
                    mouse_pos.set(pointer);
                }
                if session.peek().interaction.is_active() {
                    e.prevent_default();
                    session.write().pointer_move(pointer);
                }
            },
            onmouseup: move |_| {
                dragged_file.set(None);
                if session.peek().interaction.is_active() {
                    session.write().end_gesture();
                }
            },
            onkeydown: move |e: KeyboardEvent| {
                let context = HotkeyContext {
                    has_selection: session.peek().selection.primary_element().is_some(),
                    input_focused: *field_focused.peek(),
                };
                let modifiers = e.modifiers();
                let HotkeyResult::Action(action) = handle_hotkey(&e.key(), modifiers.ctrl(), modifiers.meta(), &context) else {
                    return;
                };
                e.prevent_default();
                match action {
                    HotkeyAction::TimelineZoomIn => session.write().zoom_in(),
                    HotkeyAction::TimelineZoomOut => session.write().zoom_out(),
                    HotkeyAction::PlayPause => session.write().toggle_play(),
                    HotkeyAction::SaveCanvas => save_canvas.call(()),
                    HotkeyAction::DeleteSelection => {
                        session.write().remove_selected();
                    }
                    HotkeyAction::Cancel => {
                        let mut session = session.write();
                        if session.quick_add.is_some() {
                            session.cancel_quick_add();
                        } else {
                            session.selection.clear();
                        }
                    }
                }
            },

            if let Some(name) = ghost_name {
                div {
                    style: "
                        position: fixed; left: {ghost_x}px; top: {ghost_y}px;
                        background-color: {BG_ELEVATED}; border: 1px solid {ACCENT_VIDEO};
                        border-radius: 4px; padding: 6px 10px; font-size: 12px; pointer-events: none;
                        z-index: 10000; box-shadow: 0 4px 12px rgba(0,0,0,0.3); opacity: 0.9;
                        color: {TEXT_PRIMARY};
                    ",
                    "{name}"
                }
            }

            TitleBar {
                session,
                on_new: move |_| new_canvas.call(()),
                on_save: move |_| save_canvas.call(()),
            }

            div {
                style: "display: flex; flex: 1; min-height: 0;",

                SidePanel {
                    tabs: LEFT_TABS.to_vec(),
                    active_tab: left_tab(),
                    width: PANEL_DEFAULT_WIDTH,
                    side: "left",
                    on_select_tab: move |index| left_tab.set(index),

                    match left_tab() {
                        TAB_CANVASES => rsx! {
                            CanvasListContent {
                                canvases: canvases(),
                                current_id: current_id.clone(),
                                on_open: move |id| open_canvas.call(id),
                                on_new: move |_| new_canvas.call(()),
                                on_delete: move |id| delete_canvas.call(id),
                                on_refresh: move |_| load_canvases.call(()),
                            }
                        },
                        TAB_MEDIA => rsx! {
                            GalleryPanelContent {
                                files: files(),
                                selected_file: selected_file.clone(),
                                uploading: uploading(),
                                on_upload: move |_| upload_media.call(()),
                                on_refresh: move |_| load_files.call(()),
                                on_quick_add: move |file: MediaFile| session.write().open_quick_add(&file),
                                on_drag_start: move |file| dragged_file.set(Some(file)),
                            }
                        },
                        _ => rsx! {
                            PlayersPanelContent {
                                players: players(),
                                files: files(),
                                selected_code: selected_player.clone(),
                                on_select: move |code| session.write().selection.select_player(code),
                                on_create: move |_| create_player.call(()),
                                on_toggle_file: move |payload| toggle_player_file.call(payload),
                            }
                        },
                    }
                }

                CanvasSurface { session, files, dragged_file }

                SidePanel {
                    tabs: vec!["Inspector"],
                    active_tab: 0,
                    width: INSPECTOR_WIDTH,
                    side: "right",
                    on_select_tab: move |_| {},
                    InspectorPanelContent { session, files }
                }
            }

            TimelinePanel {
                session,
                files,
                height: TIMELINE_DEFAULT_HEIGHT,
                status: status(),
            }

            StatusBar {
                message: status(),
                remote_enabled,
                elapsed_ms,
                total_ms,
            }

            QuickAddModal { session }
        }
    }
}

/// Read a picked file and hand it to the store. Errors come back as a
/// status line.
async fn upload_path(store: &FallbackStore, path: &Path) -> Result<MediaFile, String> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| format!("Could not read {name}: {err}"))?;
    let file = store
        .upload_file(UploadRequest::new(bytes, name.clone(), None))
        .await
        .map_err(|err| format!("Could not upload {name}: {err}"))?;
    tracing::info!(id = %file.id, name = %file.name, "Media uploaded");
    Ok(file)
}
