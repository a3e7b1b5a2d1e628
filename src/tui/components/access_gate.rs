//! # AccessGate Component
//!
//! The only screen an unauthenticated session ever sees: product name, a
//! masked access-code field and, after a failed attempt, an error line.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::input_bar::{INPUT_BAR_HEIGHT, InputBar};

pub const AUTH_ERROR_TEXT: &str = "Invalid access code";
const GATE_WIDTH: u16 = 52;

pub struct AccessGate<'a> {
    pub input: &'a mut InputBar,
    pub auth_error: bool,
    pub verifying: bool,
}

impl<'a> AccessGate<'a> {
    pub fn new(input: &'a mut InputBar, auth_error: bool, verifying: bool) -> Self {
        Self {
            input,
            auth_error,
            verifying,
        }
    }
}

impl<'a> Component for AccessGate<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [column] = Layout::horizontal([Constraint::Length(GATE_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(area);
        let [logo_area, subtitle_area, _, input_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1), // Spacer
            Constraint::Length(INPUT_BAR_HEIGHT),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(column);

        frame.render_widget(
            Paragraph::new(Line::from("🎾 ATPInsight"))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            logo_area,
        );
        frame.render_widget(
            Paragraph::new("Enter access code to continue")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            subtitle_area,
        );

        self.input.disabled = self.verifying;
        self.input.render(frame, input_area);

        let status = if self.verifying {
            Some(Paragraph::new("Verifying...").style(Style::default().fg(Color::DarkGray)))
        } else if self.auth_error {
            Some(Paragraph::new(AUTH_ERROR_TEXT).style(Style::default().fg(Color::Red)))
        } else {
            None
        };
        if let Some(status) = status {
            frame.render_widget(status.alignment(Alignment::Center), status_area);
        }
    }
}
