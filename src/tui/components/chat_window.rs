//! # ChatWindow Component
//!
//! Scrollable view of the conversation transcript.
//!
//! ## Responsibilities
//!
//! - Render every transcript message, oldest first, as a `MessageBubble`
//! - Append a transient typing indicator while a request is in flight
//! - Keep the newest item in view whenever the transcript or loading flag changes
//! - Cache bubble heights so long transcripts don't re-wrap every frame
//!
//! ## Architecture
//!
//! `ChatWindow` is a transient component (created each frame) that wraps
//! `&'a mut ChatWindowState` (persistent state) and the transcript (props).
//! The typing indicator is drawn from the `is_loading` prop only; it never
//! exists in the transcript.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Modifier;
use ratatui::widgets::{Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::{Message, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message_bubble::{MessageBubble, bubble_block, role_style};
use crate::tui::event::TuiEvent;

/// Rows taken by the typing indicator bubble (1 content line + borders).
pub const TYPING_INDICATOR_HEIGHT: u16 = 3;

const TYPING_FRAMES: [&str; 3] = ["●  ∙  ∙", "∙  ●  ∙", "∙  ∙  ●"];

/// Scroll and layout state for the chat window.
/// Must be persisted in the parent TuiState.
pub struct ChatWindowState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on every frame
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// True when content lies below the visible area
    pub has_unseen_content: bool,
    /// (transcript length, loading) at the previous render; a change re-pins to bottom
    last_seen: Option<(usize, bool)>,
}

impl Default for ChatWindowState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWindowState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            has_unseen_content: false,
            last_seen: None,
        }
    }

    fn max_scroll(&self, total_height: u16) -> u16 {
        total_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self, total_height: u16) {
        let max_y = self.max_scroll(total_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total = self.layout.total_height();
        let max_y = self.max_scroll(total);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Record what the transcript looks like now. Any change since the last
    /// frame pins the view to the newest item again.
    fn observe(&mut self, message_count: usize, is_loading: bool) {
        let seen = Some((message_count, is_loading));
        if self.last_seen != seen {
            self.last_seen = seen;
            self.stick_to_bottom = true;
        }
    }
}

/// Scrollable transcript view.
/// Created fresh each frame with references to state and data.
pub struct ChatWindow<'a> {
    pub state: &'a mut ChatWindowState,
    pub messages: &'a [Message],
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> ChatWindow<'a> {
    pub fn new(
        state: &'a mut ChatWindowState,
        messages: &'a [Message],
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            is_loading,
            spinner_frame,
        }
    }
}

impl<'a> Component for ChatWindow<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache. Messages are immutable, so only new ones
        // (or all of them, after a resize) need measuring.
        self.state.layout.sync(self.messages, content_width);
        let messages_height = self.state.layout.total_height();
        let indicator_height = if self.is_loading {
            TYPING_INDICATOR_HEIGHT
        } else {
            0
        };
        let canvas_height = messages_height.saturating_add(indicator_height);

        // 2. Scroll bookkeeping
        self.state.viewport_height = area.height;
        self.state.observe(self.messages.len(), self.is_loading);
        if self.state.stick_to_bottom {
            // Pin before culling so the newest bubbles are inside the visible range
            let max_y = self.state.max_scroll(canvas_height);
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        } else {
            self.state.clamp_scroll(canvas_height);
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible bubbles into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(MessageBubble::new(&self.messages[i]), rect);
            y_offset = y_offset.saturating_add(height);
        }

        if self.is_loading {
            let rect = Rect::new(0, messages_height, content_width, TYPING_INDICATOR_HEIGHT);
            scroll_view.render_widget(TypingIndicator::new(self.spinner_frame), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // 4. Unseen content indicator for the title bar
        let current_offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = canvas_height > area.height
            && current_offset < self.state.max_scroll(canvas_height);
    }
}

/// EventHandler lives on `ChatWindowState` because `ChatWindow` is recreated
/// every frame and can't hold scroll position.
impl EventHandler for ChatWindowState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// Animated "typing" bubble shown after the transcript while loading.
pub struct TypingIndicator {
    frame_index: usize,
}

impl TypingIndicator {
    pub fn new(frame_index: usize) -> Self {
        Self { frame_index }
    }

    fn dots(&self) -> &'static str {
        // Spinner ticks at ~12fps; advance the dot every third tick
        TYPING_FRAMES[(self.frame_index / 3) % TYPING_FRAMES.len()]
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = bubble_block(Role::Assistant);
        let inner_area = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.dots())
            .style(role_style(Role::Assistant).add_modifier(Modifier::BOLD))
            .render(inner_area, buf);
    }
}

/// Cached bubble heights.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Number of cached heights still valid for this render.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || message_count < self.heights.len() {
            return 0;
        }
        self.heights.len()
    }

    /// Bring the cache up to date with `messages` at `content_width`.
    pub fn sync(&mut self, messages: &[Message], content_width: u16) {
        let reusable = self.reusable_count(messages.len(), content_width);
        self.heights.truncate(reusable);
        for message in messages.iter().skip(reusable) {
            self.heights
                .push(MessageBubble::calculate_height(message.text(), content_width));
        }
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    /// Indices of messages that intersect the viewport (plus half a screen
    /// of buffer on either side).
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Transcript;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn long_transcript(n: usize) -> Transcript {
        let mut transcript = Transcript::new();
        for i in 0..n {
            transcript.push(Message::user(format!("question {i}")));
            transcript.push(Message::assistant(format!("answer {i}")));
        }
        transcript
    }

    #[test]
    fn layout_cache_reuses_heights_for_appended_messages() {
        let mut cache = LayoutCache::new();
        let transcript = long_transcript(2);
        cache.sync(transcript.messages(), 80);
        assert_eq!(cache.heights.len(), 5);
        assert_eq!(cache.reusable_count(6, 80), 5);
        // Width change invalidates everything
        assert_eq!(cache.reusable_count(5, 40), 0);
    }

    #[test]
    fn layout_cache_prefix_heights_accumulate() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 4, 5];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 7, 12]);
        assert_eq!(cache.total_height(), 12);
    }

    #[test]
    fn visible_range_covers_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 20];
        cache.rebuild_prefix_heights();
        // Viewport rows 30..40, buffer 5 → rows 25..45 → items 8..=14
        let range = cache.visible_range(30, 10);
        assert_eq!(range, 8..15);
        // Top of the transcript: rows 0..15 → items 0..=4
        assert_eq!(cache.visible_range(0, 10), 0..5);
    }

    #[test]
    fn typing_indicator_shown_only_while_loading() {
        let transcript = Transcript::new();
        let mut state = ChatWindowState::new();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), true, 0).render(f, f.area()))
            .unwrap();
        assert!(screen_text(&terminal).contains('●'));

        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), false, 0).render(f, f.area()))
            .unwrap();
        assert!(!screen_text(&terminal).contains('●'));
    }

    #[test]
    fn renders_welcome_message() {
        let transcript = Transcript::new();
        let mut state = ChatWindowState::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), false, 0).render(f, f.area()))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("ATPInsight"));
        assert!(text.contains("Welcome to ATPInsight"));
    }

    #[test]
    fn new_message_re_pins_to_bottom() {
        let mut transcript = long_transcript(10);
        let mut state = ChatWindowState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();

        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), false, 0).render(f, f.area()))
            .unwrap();
        assert!(!state.has_unseen_content);

        state.handle_event(&TuiEvent::ScrollPageUp);
        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), false, 0).render(f, f.area()))
            .unwrap();
        assert!(!state.stick_to_bottom);
        assert!(state.has_unseen_content);

        transcript.push(Message::user("newest question"));
        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), true, 0).render(f, f.area()))
            .unwrap();
        assert!(state.stick_to_bottom);
        assert!(!state.has_unseen_content);
        assert!(screen_text(&terminal).contains("newest question"));
    }

    #[test]
    fn oversized_transcript_saturates_instead_of_overflowing() {
        let mut transcript = Transcript::new();
        let tall = "x\n".repeat(40_000);
        transcript.push(Message::user(tall.clone()));
        transcript.push(Message::assistant(tall));
        let mut state = ChatWindowState::new();
        // Narrow keeps the scroll canvas small
        let mut terminal = Terminal::new(TestBackend::new(8, 10)).unwrap();
        terminal
            .draw(|f| ChatWindow::new(&mut state, transcript.messages(), true, 0).render(f, f.area()))
            .unwrap();
        assert_eq!(state.layout.total_height(), u16::MAX);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn typing_dots_cycle() {
        assert_ne!(TypingIndicator::new(0).dots(), TypingIndicator::new(3).dots());
        assert_eq!(TypingIndicator::new(0).dots(), TypingIndicator::new(9).dots());
    }
}
