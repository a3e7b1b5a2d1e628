use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{Message, Role};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "ATPInsight",
    }
}

pub fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

/// The bordered block every bubble (including the typing indicator) is drawn in.
pub fn bubble_block(role: Role) -> Block<'static> {
    let border_style = role_style(role).add_modifier(Modifier::DIM);
    Block::bordered()
        .title(role_label(role))
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title_style(role_style(role).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(CONTENT_PAD_H))
}

/// A stateless component that renders one transcript entry.
///
/// Created fresh each frame by `ChatWindow` for every visible message.
/// Users get a green bubble titled "You", the assistant a blue one titled
/// "ATPInsight".
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap` options matching Ratatui's `Paragraph` wrapping, so the
/// chat window can lay out its scroll canvas before drawing anything.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Height (rows) needed to render `text` inside a bubble of `width` columns.
    pub fn calculate_height(text: &str, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still occupy a row
            return 1;
        }

        let content = text.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let role = self.message.role();
        let block = bubble_block(role);
        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.message.text().trim())
            .style(role_style(role))
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        assert_eq!(MessageBubble::calculate_height("", 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_whitespace_only_treated_as_empty() {
        assert_eq!(MessageBubble::calculate_height("  \n\t ", 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_saturates_for_huge_content() {
        let text = "x\n".repeat(70_000);
        assert_eq!(MessageBubble::calculate_height(&text, 10), u16::MAX);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(MessageBubble::calculate_height("Hello world", 0), 1);
        assert_eq!(
            MessageBubble::calculate_height("Hello world", HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_single_line_fits() {
        assert_eq!(
            MessageBubble::calculate_height("Carlos Alcaraz", 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // width 9 → content_width 5: "Hello" | "world"
        assert_eq!(
            MessageBubble::calculate_height("Hello world", 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        // width 8 → content_width 4: "abcd" | "efgh" | "ij"
        assert_eq!(
            MessageBubble::calculate_height("abcdefghij", 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    // ==========================================================================
    // Styling
    // ==========================================================================

    #[test]
    fn labels_match_roles() {
        assert_eq!(role_label(Role::User), "You");
        assert_eq!(role_label(Role::Assistant), "ATPInsight");
    }

    #[test]
    fn user_is_green_assistant_is_blue() {
        assert_eq!(role_style(Role::User).fg, Some(Color::Green));
        assert_eq!(role_style(Role::Assistant).fg, Some(Color::Blue));
    }

    #[test]
    fn renders_label_and_text() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let message = Message::assistant("Carlos Alcaraz");

        terminal
            .draw(|f| f.render_widget(MessageBubble::new(&message), f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("ATPInsight"));
        assert!(text.contains("Carlos Alcaraz"));
    }
}
