//! Selection state shared across views.

/// Tracks the current selection across the canvas, gallery and players list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selected element ids on the canvas.
    pub element_ids: Vec<String>,
    /// Selected file ids in the gallery.
    pub file_ids: Vec<String>,
    /// Player whose playlist is being edited.
    pub player_code: Option<String>,
}

impl SelectionState {
    /// Clear canvas and gallery selections. The player stays selected.
    pub fn clear(&mut self) {
        self.element_ids.clear();
        self.file_ids.clear();
    }

    /// Replace the selection with a single element.
    pub fn select_element(&mut self, element_id: impl Into<String>) {
        self.clear();
        self.element_ids.push(element_id.into());
    }

    /// Remove an element from selection, if present.
    pub fn remove_element(&mut self, element_id: &str) {
        self.element_ids.retain(|id| id != element_id);
    }

    /// Return the primary selected element, if any.
    pub fn primary_element(&self) -> Option<&str> {
        self.element_ids.first().map(String::as_str)
    }

    pub fn is_element_selected(&self, element_id: &str) -> bool {
        self.element_ids.iter().any(|id| id == element_id)
    }

    /// Replace the selection with a single gallery file.
    pub fn select_file(&mut self, file_id: impl Into<String>) {
        self.clear();
        self.file_ids.push(file_id.into());
    }

    pub fn primary_file(&self) -> Option<&str> {
        self.file_ids.first().map(String::as_str)
    }

    pub fn select_player(&mut self, code: Option<String>) {
        self.player_code = code;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_selection_replaces_previous() {
        let mut selection = SelectionState::default();
        selection.select_file("f1");
        selection.select_element("a");
        assert_eq!(selection.primary_element(), Some("a"));
        assert_eq!(selection.primary_file(), None);

        selection.remove_element("a");
        assert_eq!(selection.primary_element(), None);
    }

    #[test]
    fn test_clear_keeps_player() {
        let mut selection = SelectionState::default();
        selection.select_player(Some("123456".into()));
        selection.select_element("a");
        selection.clear();
        assert!(selection.element_ids.is_empty());
        assert_eq!(selection.player_code.as_deref(), Some("123456"));
    }
}
