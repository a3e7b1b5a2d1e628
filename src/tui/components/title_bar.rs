//! # TitleBar Component
//!
//! Single-line header above the chat window.
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"🎾 ATPInsight · 2024 ATP Match Intelligence | Thinking... | ↓ New"`
//! 2. **Status message**: `"🎾 ATPInsight · 2024 ATP Match Intelligence | Thinking..."`
//! 3. **Default**: `"🎾 ATPInsight · 2024 ATP Match Intelligence"`
//!
//! The product name always comes first so it survives truncation on narrow terminals.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const PRODUCT: &str = "🎾 ATPInsight";
const SUBTITLE: &str = "2024 ATP Match Intelligence";

/// Top status bar. All fields are props.
pub struct TitleBar {
    /// Transient status (e.g. "Thinking...", "Backend online")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(status_message: String, has_unseen_content: bool) -> Self {
        Self {
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled(
                PRODUCT,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" · {SUBTITLE}"), Style::default().fg(Color::DarkGray)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
