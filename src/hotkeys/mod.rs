//! Hotkey system
//!
//! Keyboard shortcuts for the signage editor.
//!
//! # Architecture
//!
//! - **HotkeyAction**: what a shortcut does, independent of the key
//! - **HotkeyContext**: editor state that enables or suppresses shortcuts
//! - **handle_hotkey()**: maps a key event to an action
//!
//! # Adding New Hotkeys
//!
//! 1. Add a variant to `HotkeyAction`
//! 2. Add the key binding in `handle_hotkey()`
//! 3. Handle the action in the App component's hotkey handler

use dioxus::prelude::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    // ═══════════════════════════════════════════════════════════════
    // Timeline
    // ═══════════════════════════════════════════════════════════════
    /// Increase pixels per second.
    TimelineZoomIn,
    /// Decrease pixels per second.
    TimelineZoomOut,
    /// Start, pause or resume the slideshow.
    PlayPause,

    // ═══════════════════════════════════════════════════════════════
    // Document
    // ═══════════════════════════════════════════════════════════════
    SaveCanvas,
    /// Remove the selected element and its timeline slot.
    DeleteSelection,
    /// Close the quick-add modal, or clear the selection.
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct HotkeyContext {
    /// An element is selected on the canvas.
    pub has_selection: bool,
    /// A text field, select or editable element has focus.
    pub input_focused: bool,
}

#[derive(Debug, Clone)]
pub enum HotkeyResult {
    Action(HotkeyAction),
    NoMatch,
    /// Would match, but typing into a field takes precedence.
    Suppressed,
}

/// Maps a key event to an action for the current context.
pub fn handle_hotkey(key: &Key, ctrl: bool, meta: bool, context: &HotkeyContext) -> HotkeyResult {
    let action = match key {
        Key::Character(c) if (ctrl || meta) && c.eq_ignore_ascii_case("s") => Some(HotkeyAction::SaveCanvas),
        Key::Character(c) if c == "+" || c == "=" => Some(HotkeyAction::TimelineZoomIn),
        Key::Character(c) if c == "-" => Some(HotkeyAction::TimelineZoomOut),
        Key::Character(c) if c == " " => Some(HotkeyAction::PlayPause),
        Key::Delete | Key::Backspace if context.has_selection => Some(HotkeyAction::DeleteSelection),
        Key::Escape => Some(HotkeyAction::Cancel),
        _ => None,
    };

    match action {
        Some(_) if context.input_focused => HotkeyResult::Suppressed,
        Some(action) => HotkeyResult::Action(action),
        None => HotkeyResult::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key, ctrl: bool, context: &HotkeyContext) -> HotkeyResult {
        handle_hotkey(&key, ctrl, false, context)
    }

    #[test]
    fn test_plus_and_minus_zoom() {
        let ctx = HotkeyContext::default();
        assert!(matches!(
            press(Key::Character("+".to_string()), false, &ctx),
            HotkeyResult::Action(HotkeyAction::TimelineZoomIn)
        ));
        assert!(matches!(
            press(Key::Character("-".to_string()), false, &ctx),
            HotkeyResult::Action(HotkeyAction::TimelineZoomOut)
        ));
    }

    #[test]
    fn test_ctrl_or_cmd_s_saves() {
        let ctx = HotkeyContext::default();
        let result = press(Key::Character("S".to_string()), true, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::SaveCanvas)));

        let result = handle_hotkey(&Key::Character("s".to_string()), false, true, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::SaveCanvas)));
    }

    #[test]
    fn test_space_toggles_playback() {
        let ctx = HotkeyContext::default();
        let result = press(Key::Character(" ".to_string()), false, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::PlayPause)));
    }

    #[test]
    fn test_delete_needs_selection() {
        let ctx = HotkeyContext::default();
        assert!(matches!(press(Key::Delete, false, &ctx), HotkeyResult::NoMatch));

        let ctx = HotkeyContext {
            has_selection: true,
            ..Default::default()
        };
        assert!(matches!(
            press(Key::Backspace, false, &ctx),
            HotkeyResult::Action(HotkeyAction::DeleteSelection)
        ));
    }

    #[test]
    fn test_suppressed_when_input_focused() {
        let ctx = HotkeyContext {
            has_selection: true,
            input_focused: true,
        };
        assert!(matches!(
            press(Key::Character(" ".to_string()), false, &ctx),
            HotkeyResult::Suppressed
        ));
        assert!(matches!(press(Key::Backspace, false, &ctx), HotkeyResult::Suppressed));
        assert!(matches!(
            press(Key::Character("s".to_string()), true, &ctx),
            HotkeyResult::Suppressed
        ));
    }

    #[test]
    fn test_escape_cancels() {
        let ctx = HotkeyContext::default();
        assert!(matches!(
            press(Key::Escape, false, &ctx),
            HotkeyResult::Action(HotkeyAction::Cancel)
        ));
    }
}
