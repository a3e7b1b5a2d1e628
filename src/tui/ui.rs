use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_bar::INPUT_BAR_HEIGHT;
use crate::tui::components::{AccessGate, ChatWindow, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Draw one frame. An unauthenticated session only ever sees the gate.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    if !app.authenticated {
        AccessGate::new(&mut tui.access_input, app.auth_error, app.verifying)
            .render(frame, frame.area());
        return;
    }

    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(INPUT_BAR_HEIGHT)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    ChatWindow::new(
        &mut tui.chat_window,
        app.transcript.messages(),
        app.loading,
        spinner_frame,
    )
    .render(frame, main_area);

    // Title bar reads has_unseen_content after the chat window updated it this frame
    TitleBar::new(
        app.status_message.clone(),
        tui.chat_window.has_unseen_content,
    )
    .render(frame, title_area);

    tui.question_input.disabled = app.loading;
    tui.question_input.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Message, WELCOME_TEXT};
    use crate::test_support::{authenticated_app, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn unauthenticated_session_sees_only_the_gate() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("Enter access code to continue"));
        assert!(!text.contains("Ask about ATP players"));
    }

    #[test]
    fn authenticated_session_sees_transcript_and_input() {
        let app = authenticated_app();
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("2024 ATP Match Intelligence"));
        assert!(text.contains(&WELCOME_TEXT[..30]));
        assert!(text.contains("Ask about ATP players"));
    }

    #[test]
    fn input_is_disabled_while_loading() {
        let mut app = authenticated_app();
        app.transcript.push(Message::user("Who won Wimbledon 2024?"));
        app.loading = true;
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(tui.question_input.disabled);
        assert!(text.contains("Who won Wimbledon 2024?"));
    }
}
