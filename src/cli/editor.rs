//! Prompt Editor Module
//!
//! Single-line text editor backing the prompt box, with cursor movement and
//! the usual readline-style deletions. Cursor positions are in characters.

/// Cursor movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Default)]
pub struct PromptEditor {
    text: String,
    cursor: usize,
}

impl PromptEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor holding `text`, cursor at the end
    pub fn from_text(text: &str) -> Self {
        let text = text.replace('\n', " ");
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at the current cursor position
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.text.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_cursor(&mut self, direction: CursorDirection) {
        match direction {
            CursorDirection::Left => self.cursor = self.cursor.saturating_sub(1),
            CursorDirection::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            CursorDirection::Home => self.cursor = 0,
            CursorDirection::End => self.cursor = self.char_len(),
        }
    }

    /// Clear the whole prompt (Ctrl+U)
    pub fn delete_line(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Delete word backward (Ctrl+W)
    pub fn delete_word_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.text.chars().collect();
        let mut new_cursor = self.cursor;

        while new_cursor > 0 && chars[new_cursor - 1].is_whitespace() {
            new_cursor -= 1;
        }
        while new_cursor > 0 && !chars[new_cursor - 1].is_whitespace() {
            new_cursor -= 1;
        }

        let start = self.byte_index(new_cursor);
        let end = self.byte_index(self.cursor);
        self.text.drain(start..end);
        self.cursor = new_cursor;
    }
}
