//! # TextField
//!
//! Single-line text buffer with a byte-offset cursor. Backs every input on
//! the screen: the new-list row, each list's add-task row and the task being
//! edited.
//!
//! The field only edits text. What Enter means is up to the owner, so
//! `Submit` is reported but the buffer is left alone.
//!
//! The cursor is drawn as a reversed cell inside the text rather than with
//! the terminal cursor, because fields also appear inside the scroll view.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Buffer contents changed
    Changed,
    /// Cursor moved without changing text
    Moved,
    /// Enter pressed
    Submit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    buffer: String,
    /// Byte offset, always on a char boundary
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field holding `text` with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Take the contents, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Spans for drawing the field, with a reversed cell at the cursor when
    /// `show_cursor` is set. An empty, unfocused field shows `placeholder`.
    pub fn spans(&self, style: Style, show_cursor: bool, placeholder: &str) -> Vec<Span<'static>> {
        if !show_cursor {
            if self.buffer.is_empty() {
                return vec![Span::styled(
                    placeholder.to_string(),
                    style.add_modifier(Modifier::DIM),
                )];
            }
            return vec![Span::styled(self.buffer.clone(), style)];
        }

        let cursor_style = style.add_modifier(Modifier::REVERSED);
        let (before, rest) = self.buffer.split_at(self.cursor);
        let mut spans = Vec::with_capacity(3);
        if !before.is_empty() {
            spans.push(Span::styled(before.to_string(), style));
        }
        match rest.chars().next() {
            Some(c) => {
                spans.push(Span::styled(c.to_string(), cursor_style));
                let after = &rest[c.len_utf8()..];
                if !after.is_empty() {
                    spans.push(Span::styled(after.to_string(), style));
                }
            }
            None => spans.push(Span::styled(" ", cursor_style)),
        }
        spans
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf));
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                // Single line: fold newlines into spaces
                let flat: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                if flat.is_empty() {
                    return None;
                }
                self.insert(&flat);
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(FieldEvent::Changed)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(FieldEvent::Changed)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                FieldEvent::Moved
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                FieldEvent::Moved
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                FieldEvent::Moved
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                FieldEvent::Moved
            }),
            TuiEvent::Submit => Some(FieldEvent::Submit),
            _ => None,
        }
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
