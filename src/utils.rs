use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editable single-line text with a selection range, the model behind a pin input.
///
/// Positions are character indices. Everything stored here is ASCII, so they
/// are also byte indices.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TextField {
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
    /// End of the selection that stays put while shift-moving the other one.
    anchor: usize,
}

impl TextField {
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection_start == self.selection_end
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.value.as_bytes().get(idx).map(|b| *b as char)
    }

    /// Replace the whole value, keeping the selection inside the new bounds.
    pub fn set_value(&mut self, value: String) {
        self.value = value;
        self.clamp_selection();
    }

    pub fn set_caret(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        self.selection_start = pos;
        self.selection_end = pos;
        self.anchor = pos;
    }

    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.len();
        self.selection_start = start.min(len);
        self.selection_end = end.min(len).max(self.selection_start);
        self.anchor = self.selection_start;
    }

    /// The end of the selection that shift-moves act on.
    fn head(&self) -> usize {
        if self.anchor == self.selection_start {
            self.selection_end
        } else {
            self.selection_start
        }
    }

    /// Move the head to `pos`, keeping the anchor.
    fn extend_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        self.selection_start = self.anchor.min(pos);
        self.selection_end = self.anchor.max(pos);
    }

    pub fn insert(&mut self, ch: char) {
        self.remove_selection();
        self.value.insert(self.selection_start, ch);
        self.set_caret(self.selection_start + 1);
    }

    pub fn backspace(&mut self) {
        if !self.is_collapsed() {
            self.remove_selection();
        } else if self.selection_start > 0 {
            let pos = self.selection_start - 1;
            self.value.remove(pos);
            self.set_caret(pos);
        }
    }

    pub fn delete(&mut self) {
        if !self.is_collapsed() {
            self.remove_selection();
        } else if self.selection_start < self.len() {
            self.value.remove(self.selection_start);
        }
    }

    /// Run the default editing action for a key.
    ///
    /// Returns false when the key means nothing to a text field.
    pub fn apply_key(&mut self, key: KeyEvent) -> bool {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                if extend {
                    self.extend_to(self.head().saturating_sub(1));
                } else if self.is_collapsed() {
                    self.set_caret(self.selection_start.saturating_sub(1));
                } else {
                    self.set_caret(self.selection_start);
                }
            }
            KeyCode::Right => {
                if extend {
                    self.extend_to(self.head() + 1);
                } else if self.is_collapsed() {
                    self.set_caret(self.selection_end + 1);
                } else {
                    self.set_caret(self.selection_end);
                }
            }
            KeyCode::Home => {
                if extend {
                    self.extend_to(0);
                } else {
                    self.set_caret(0);
                }
            }
            KeyCode::End => {
                if extend {
                    self.extend_to(self.len());
                } else {
                    self.set_caret(self.len());
                }
            }
            _ => return false,
        }
        true
    }

    fn remove_selection(&mut self) {
        if !self.is_collapsed() {
            self.value
                .replace_range(self.selection_start..self.selection_end, "");
            self.set_caret(self.selection_start);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.len();
        self.selection_start = self.selection_start.min(len);
        self.selection_end = self.selection_end.min(len).max(self.selection_start);
        self.anchor = self.anchor.clamp(self.selection_start, self.selection_end);
    }
}

impl From<String> for TextField {
    fn from(value: String) -> Self {
        TextField {
            value,
            selection_start: 0,
            selection_end: 0,
            anchor: 0,
        }
    }
}
