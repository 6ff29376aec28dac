use ratatui::{
    style::{Color, Style},
    text::Span,
};

/// Char-indexed line editing shared by the input bars and the input modal.
#[derive(Default)]
pub struct TextEdit {
    text: String,
    cursor: usize,
}

impl TextEdit {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.text = text;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let byte = self.byte_index(self.cursor);
        self.text.insert(byte, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_index(self.cursor - 1);
        let end = self.byte_index(self.cursor);
        self.text.drain(start..end);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.drain(start..end);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Deletes the word before the cursor.
    pub fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let byte_start = self.byte_index(start);
        let byte_end = self.byte_index(self.cursor);
        self.text.drain(byte_start..byte_end);
        self.cursor = start;
    }

    /// Deletes from the cursor to the end of the line.
    pub fn kill_to_end(&mut self) {
        let byte_start = self.byte_index(self.cursor);
        self.text.truncate(byte_start);
    }

    /// Completes the identifier under the cursor against `vocabulary`,
    /// returning whether anything was filled in. The token starts after the
    /// last structural character so `{ stock.st` completes on `stock.st`.
    pub fn complete(&mut self, vocabulary: &[String]) -> bool {
        let prefix: String = self
            .text
            .chars()
            .take(self.cursor)
            .collect::<String>()
            .rsplit(['{', ',', ' ', '"', '\''])
            .next()
            .unwrap_or_default()
            .to_string();
        if prefix.is_empty() {
            return false;
        }
        let Some(candidate) = vocabulary
            .iter()
            .find(|key| key.starts_with(&prefix) && key.as_str() != prefix)
        else {
            return false;
        };
        let rest = &candidate[prefix.len()..];
        for c in rest.chars() {
            self.insert(c);
        }
        true
    }

    /// The text split around a block cursor for rendering.
    pub fn cursor_spans(&self) -> Vec<Span<'_>> {
        let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
        let total = self.text.chars().count();
        if self.cursor >= total {
            return vec![Span::raw(&self.text), Span::styled(" ", cursor_style)];
        }
        let before: String = self.text.chars().take(self.cursor).collect();
        let at: String = self.text.chars().skip(self.cursor).take(1).collect();
        let after: String = self.text.chars().skip(self.cursor + 1).collect();
        vec![
            Span::raw(before),
            Span::styled(at, cursor_style),
            Span::raw(after),
        ]
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .chars()
            .take(char_index)
            .map(|c| c.len_utf8())
            .sum()
    }
}
