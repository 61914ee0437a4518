//! Composing buffer with cursor tracking.
//!
//! The buffer stores the raw phonetic input (e.g. "nga’ay") and the cursor
//! position within it. Cursor and every edit offset count Unicode scalar
//! values, never bytes, so multi-byte characters such as `’` edit cleanly.

/// Input buffer tracking raw input and cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputBuffer {
    text: String,
    cursor: usize, // char offset, not byte offset
}

impl InputBuffer {
    /// Create a new empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from text with the cursor clamped to its length.
    pub fn with_cursor<T: Into<String>>(text: T, cursor: usize) -> Self {
        let text = text.into();
        let cursor = cursor.min(text.chars().count());
        Self { text, cursor }
    }

    /// Get the raw input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the cursor position (char offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the buffer in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.len()
    }

    /// Byte offset of the char at `index` (or the end of the text).
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    /// Text with `ch` inserted at the cursor, leaving the buffer untouched.
    pub fn text_with_inserted(&self, ch: char) -> String {
        let mut text = self.text.clone();
        text.insert(self.byte_offset(self.cursor), ch);
        text
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let offset = self.byte_offset(self.cursor);
        self.text.insert(offset, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor (backspace).
    /// Returns true if a character was deleted.
    pub fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let offset = self.byte_offset(self.cursor - 1);
        self.text.remove(offset);
        self.cursor -= 1;
        true
    }

    /// Delete the character under the cursor (delete key).
    /// Returns true if a character was deleted.
    pub fn delete_after(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        self.text.remove(offset);
        true
    }

    /// Remove one leading space, if present, keeping the cursor on the same char.
    /// Returns true if a space was removed.
    pub fn strip_leading_space(&mut self) -> bool {
        if !self.text.starts_with(' ') {
            return false;
        }
        self.text.remove(0);
        self.cursor = self.cursor.saturating_sub(1);
        true
    }

    /// Move cursor to the left by one character.
    /// Returns true if cursor moved.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move cursor to the right by one character.
    /// Returns true if cursor moved.
    pub fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move cursor to the beginning.
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to the end.
    pub fn move_to_end(&mut self) {
        self.cursor = self.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_counts_chars_not_bytes() {
        let mut buf = InputBuffer::new();
        buf.insert_char('n');
        buf.insert_char('’');
        buf.insert_char('a');
        assert_eq!(buf.text(), "n’a");
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.len(), 3);

        buf.move_left();
        buf.insert_char('x');
        assert_eq!(buf.text(), "n’xa");
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn delete_around_multibyte_char() {
        let mut buf = InputBuffer::with_cursor("a’b", 2);
        assert!(buf.delete_before());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 1);

        let mut buf = InputBuffer::with_cursor("a’b", 1);
        assert!(buf.delete_after());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn edits_at_boundaries_are_refused() {
        let mut buf = InputBuffer::with_cursor("ab", 0);
        assert!(!buf.delete_before());
        assert!(!buf.move_left());
        buf.move_to_end();
        assert!(!buf.delete_after());
        assert!(!buf.move_right());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn with_cursor_clamps() {
        let buf = InputBuffer::with_cursor("’’", 9);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn strip_leading_space_shifts_cursor() {
        let mut buf = InputBuffer::with_cursor(" bc", 2);
        assert!(buf.strip_leading_space());
        assert_eq!(buf.text(), "bc");
        assert_eq!(buf.cursor(), 1);
        assert!(!buf.strip_leading_space());
    }

    #[test]
    fn text_with_inserted_leaves_buffer_alone() {
        let buf = InputBuffer::with_cursor("a’c", 2);
        assert_eq!(buf.text_with_inserted('.'), "a’.c");
        assert_eq!(buf.text(), "a’c");
    }
}
