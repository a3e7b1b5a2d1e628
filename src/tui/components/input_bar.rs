//! # InputBar Component
//!
//! Single-line text control plus an action button.
//!
//! ## Responsibilities
//!
//! - Capture text input into a local draft (typing, paste, cursor movement)
//! - Emit the draft on Enter or on a click on the action button
//! - Ignore empty / whitespace-only questions on both paths (the access form
//!   submits any code, blank included)
//! - Go inert while `disabled` (a request is in flight)
//!
//! The same component backs the chat input and the access form; the access
//! form runs it masked and keeps the draft after submitting.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows the bar occupies (1 content line + borders).
pub const INPUT_BAR_HEIGHT: u16 = 3;
/// Border + padding consumed horizontally inside the text field.
const FIELD_OVERHEAD: u16 = 4;
const MASK_CHAR: char = '•';

/// High-level events emitted by the InputBar
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the draft (Enter or button click)
    Submit(String),
    /// Draft or cursor changed
    ContentChanged,
}

/// Text input with an action button.
///
/// # Props
///
/// - `disabled`: set by the parent while a request is in flight
///
/// # State
///
/// - `buffer`: current draft
/// - `cursor`: byte offset into `buffer`
/// - `button_area`: where the button was last drawn, for click hit-testing
pub struct InputBar {
    pub buffer: String,
    pub disabled: bool,
    cursor: usize,
    title: &'static str,
    placeholder: &'static str,
    button_label: &'static str,
    masked: bool,
    clear_on_submit: bool,
    /// Whether an empty or whitespace-only draft may be submitted
    allow_blank: bool,
    button_area: Option<Rect>,
}

impl InputBar {
    /// The chat question input.
    pub fn question() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            cursor: 0,
            title: "Question",
            placeholder: "Ask about ATP players, matches, tournaments...",
            button_label: "Ask",
            masked: false,
            clear_on_submit: true,
            allow_blank: false,
            button_area: None,
        }
    }

    /// The masked access-code field. Keeps its content after submitting so a
    /// rejected code can be corrected. Any code, blank included, goes to the
    /// backend for a verdict.
    pub fn access_code() -> Self {
        Self {
            title: "Access code",
            placeholder: "Access code",
            button_label: "Enter",
            masked: true,
            clear_on_submit: false,
            allow_blank: true,
            ..Self::question()
        }
    }

    /// Whether the action button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.disabled && (self.allow_blank || !self.buffer.trim().is_empty())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn try_submit(&mut self) -> Option<InputEvent> {
        if !self.can_submit() {
            return None;
        }
        let text = if self.clear_on_submit {
            self.cursor = 0;
            std::mem::take(&mut self.buffer)
        } else {
            self.buffer.clone()
        };
        Some(InputEvent::Submit(text))
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// What the field shows: the draft, or one mask glyph per character.
    fn display_text(&self, upto: usize) -> String {
        let source = &self.buffer[..upto];
        if self.masked {
            source.chars().map(|_| MASK_CHAR).collect()
        } else {
            source.to_string()
        }
    }

    fn button_text(&self) -> &'static str {
        if self.disabled { "..." } else { self.button_label }
    }
}

/// Byte offset of the character boundary before `pos`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Pasted text lands in a single-line field: line breaks become spaces.
fn flatten_paste(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

/// Drop leading characters of `text` until at most `max_width` columns remain.
/// Returns the kept tail and its display width.
fn tail_within(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = text.width();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if width <= max_width {
            break;
        }
        width -= c.width().unwrap_or(0);
        start = i + c.len_utf8();
    }
    (&text[start..], width)
}

impl Component for InputBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let button_width = (self.button_label.len().max(3) as u16) + 4;
        let [field_area, button_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(button_width)]).areas(area);
        self.button_area = Some(button_area);

        // --- Text field ---
        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title)
            .padding(ratatui::widgets::Padding::horizontal(1));
        let inner = block.inner(field_area);
        let visible_width = field_area.width.saturating_sub(FIELD_OVERHEAD) as usize;

        // Keep the cursor in view: show the tail of the text up to the cursor,
        // then whatever fits after it.
        let before_cursor = self.display_text(self.cursor);
        let (visible_before, cursor_col) =
            tail_within(&before_cursor, visible_width.saturating_sub(1));
        let after_cursor: String = {
            let full = self.display_text(self.buffer.len());
            full[before_cursor.len()..].to_string()
        };

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(format!("{visible_before}{after_cursor}"))
                .style(Style::default().fg(if self.disabled { Color::DarkGray } else { Color::Green }))
        };
        frame.render_widget(paragraph.block(block), field_area);

        // --- Action button ---
        let button_style = if self.can_submit() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        let button = Paragraph::new(self.button_text())
            .alignment(Alignment::Center)
            .style(button_style)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(button_style),
            );
        frame.render_widget(button, button_area);

        if !self.disabled && inner.width > 0 && inner.height > 0 {
            let x = inner.x + (cursor_col as u16).min(inner.width.saturating_sub(1));
            frame.set_cursor_position(Position { x, y: inner.y });
        }
    }
}

impl EventHandler for InputBar {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_str(&flatten_paste(text));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => self.try_submit(),
            TuiEvent::MouseClick(col, row) => {
                let hit = self
                    .button_area
                    .is_some_and(|area| area.contains(Position { x: *col, y: *row }));
                if hit { self.try_submit() } else { None }
            }
            _ => None,
        }
    }
}
