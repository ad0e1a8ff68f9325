//! UTF-8 safe single-line text input state with cursor management.
//!
//! Each text field of the composition form (service names, expected value,
//! interval) is edited through one of these buffers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Display column of the cursor, accounting for wide characters.
    pub fn cursor_column(&self) -> u16 {
        u16::try_from(self.input[..self.cursor].width()).unwrap_or(u16::MAX)
    }

    /// First display column shown in a box `width` columns wide. The window
    /// slides right only as far as needed to keep the cursor inside it.
    pub fn scroll_offset(&self, width: u16) -> u16 {
        self.cursor_column().saturating_sub(width.saturating_sub(1))
    }

    // ----- Setters -----

    /// Replace the buffer and place the cursor at its end.
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Place the cursor at a display column, e.g. where the user clicked.
    /// Columns past the end land at the end; any column covered by a wide
    /// character lands before it.
    pub fn set_cursor_from_column(&mut self, column: u16) {
        let mut width = 0usize;
        let byte_index = self
            .input
            .char_indices()
            .find_map(|(index, c)| {
                width += c.width().unwrap_or(0);
                (width > column as usize).then_some(index)
            })
            .unwrap_or(self.input.len());
        self.set_cursor(byte_index);
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - prev.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char immediately after the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::default();
        st.set_input("h🙂llo");
        st.set_cursor(1);
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right();
        st.backspace();
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
    }

    #[test]
    fn delete_removes_char_after_cursor() {
        let mut st = TextInputState::default();
        st.set_input("svcA");
        st.set_cursor(0);
        st.delete();
        assert_eq!(st.input(), "vcA");
        assert_eq!(st.cursor_column(), 0);
        st.set_cursor(3);
        st.delete();
        assert_eq!(st.input(), "vcA");
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut st = TextInputState::default();
        st.set_input("ab");
        assert_eq!(st.cursor_column(), 2);
        st.set_input("日本");
        assert_eq!(st.cursor_column(), 4);
    }

    #[test]
    fn cursor_from_column_respects_wide_characters() {
        let mut st = TextInputState::default();
        st.set_input("a日b");
        st.set_cursor_from_column(0);
        assert_eq!(st.cursor_column(), 0);
        st.set_cursor_from_column(2);
        assert_eq!(st.cursor_column(), 1);
        st.set_cursor_from_column(3);
        assert_eq!(st.cursor_column(), 3);
        st.set_cursor_from_column(40);
        assert_eq!(st.cursor_column(), 4);
    }

    #[test]
    fn scroll_offset_keeps_cursor_in_view() {
        let mut st = TextInputState::default();
        st.set_input("0123456789");
        assert_eq!(st.scroll_offset(20), 0);
        assert_eq!(st.scroll_offset(4), 7);
        st.set_cursor(2);
        assert_eq!(st.scroll_offset(4), 0);
        assert_eq!(st.scroll_offset(0), 2);
    }
}
