//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard and mouse events into `core::Action` values and
//! executes the `Effect`s the reducer hands back.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (request or verification in flight): draws every ~80ms so
//!   the typing indicator moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize or a
//!   settled background task.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::backend::{QaBackend, dispatch};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{ChatWindowState, InputBar, InputEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub chat_window: ChatWindowState,
    /// Question draft shown once authenticated
    pub question_input: InputBar,
    /// Masked field on the access gate
    pub access_input: InputBar,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            chat_window: ChatWindowState::new(),
            question_input: InputBar::question(),
            access_input: InputBar::access_code(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart from Enter.
        // Terminals without support ignore it.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Owns everything needed to carry out effects off the UI thread.
struct EffectRunner {
    backend: Arc<dyn QaBackend>,
    tx: mpsc::Sender<Action>,
    handles: Vec<AbortHandle>,
}

impl EffectRunner {
    /// Execute an effect. Returns true when the effect asks the loop to exit.
    fn execute(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::None => false,
            Effect::Quit => true,
            effect => {
                self.spawn(effect);
                false
            }
        }
    }

    fn spawn(&mut self, effect: Effect) {
        let kind = match &effect {
            Effect::Verify { .. } => "verify",
            Effect::Ask(_) => "ask",
            Effect::None | Effect::Quit => return,
        };
        info!("Spawning backend request: {}", kind);
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            if let Some(action) = dispatch::run(backend.as_ref(), effect).await
                && tx.send(action).is_err()
            {
                warn!("Failed to deliver backend result: receiver dropped");
            }
        });
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle.abort_handle());
    }

    fn spawn_health_check(&mut self) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let action = dispatch::check_health(backend.as_ref()).await;
            if tx.send(action).is_err() {
                warn!("Failed to deliver health result: receiver dropped");
            }
        });
        self.handles.push(handle.abort_handle());
    }

    fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

/// Keep each input bar's disabled prop in step with the state it mirrors.
///
/// Rendering sets these too, but several events can arrive between two
/// draws, so routing must not rely on the last frame's values.
fn sync_input_props(app: &App, tui: &mut TuiState) {
    tui.question_input.disabled = app.loading;
    tui.access_input.disabled = app.verifying;
}

/// Route one terminal event to the component that owns it and run any
/// resulting action through the reducer.
fn route_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Effect {
    sync_input_props(app, tui);
    let effect = match event {
        TuiEvent::Resize => Effect::None,
        TuiEvent::Quit => update(app, Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            if app.authenticated {
                tui.chat_window.handle_event(event);
            }
            Effect::None
        }
        _ if app.authenticated => match tui.question_input.handle_event(event) {
            Some(InputEvent::Submit(text)) => update(app, Action::Submit(text)),
            _ => Effect::None,
        },
        _ => match tui.access_input.handle_event(event) {
            Some(InputEvent::Submit(code)) => update(app, Action::SubmitAccessCode(code)),
            _ => Effect::None,
        },
    };
    sync_input_props(app, tui);
    effect
}

/// Run the interactive session until the user quits.
///
/// Must be called from within a tokio runtime; backend calls are spawned onto it.
pub fn run(config: ResolvedConfig, backend: Arc<dyn QaBackend>) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner {
        backend,
        tx,
        handles: Vec::new(),
    };

    runner.spawn_health_check();
    if let Some(code) = config.access_code.clone()
        && !app.authenticated
    {
        info!("Verifying configured access code");
        let effect = update(&mut app, Action::SubmitAccessCode(code));
        runner.execute(effect);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        let animating = app.loading || app.verifying;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain every pending event before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if runner.execute(route_event(&mut app, &mut tui, &event)) {
                break 'event_loop;
            }
        }

        // Settle background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if runner.execute(effect) {
                break 'event_loop;
            }
        }
    }

    runner.abort_all();
    ratatui::restore();
    info!("Session ended with {} messages", app.transcript.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{authenticated_app, test_app};

    fn route_all(app: &mut App, tui: &mut TuiState, events: &[TuiEvent]) -> Vec<Effect> {
        events
            .iter()
            .map(|event| route_event(app, tui, event))
            .filter(|effect| *effect != Effect::None)
            .collect()
    }

    fn typed(text: &str) -> Vec<TuiEvent> {
        text.chars().map(TuiEvent::InputChar).collect()
    }

    #[test]
    fn input_locks_as_soon_as_a_question_is_submitted() {
        let mut app = authenticated_app();
        let mut tui = TuiState::new();

        let mut batch = typed("first");
        batch.push(TuiEvent::Submit);
        batch.extend(typed("second"));
        batch.push(TuiEvent::Submit);

        let effects = route_all(&mut app, &mut tui, &batch);

        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Ask(req) if req.question == "first"));
        assert!(app.loading);
        assert!(tui.question_input.disabled);
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript.last().map(|m| m.text()), Some("first"));
        // Keystrokes during the request never reached the draft
        assert!(tui.question_input.buffer.is_empty());
    }

    #[test]
    fn input_unlocks_once_the_answer_settles() {
        let mut app = authenticated_app();
        let mut tui = TuiState::new();

        let mut batch = typed("first");
        batch.push(TuiEvent::Submit);
        route_all(&mut app, &mut tui, &batch);

        update(&mut app, Action::AnswerReceived(Ok("answer".into())));

        let mut batch = typed("second");
        batch.push(TuiEvent::Submit);
        let effects = route_all(&mut app, &mut tui, &batch);
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Ask(req) if req.question == "second"));
    }

    #[test]
    fn access_form_locks_while_verifying() {
        let mut app = test_app();
        let mut tui = TuiState::new();

        let mut batch = typed("abc");
        batch.push(TuiEvent::Submit);
        batch.push(TuiEvent::InputChar('d'));
        batch.push(TuiEvent::Submit);

        let effects = route_all(&mut app, &mut tui, &batch);
        assert_eq!(
            effects,
            vec![Effect::Verify {
                access_code: "abc".into()
            }]
        );
        assert!(app.verifying);
        assert!(tui.access_input.disabled);
        assert_eq!(tui.access_input.buffer, "abc");
    }

    #[test]
    fn gate_routes_nothing_to_the_chat() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let mut batch = typed("hi");
        batch.push(TuiEvent::ScrollUp);
        route_all(&mut app, &mut tui, &batch);
        assert_eq!(tui.access_input.buffer, "hi");
        assert!(tui.question_input.buffer.is_empty());
        assert!(tui.chat_window.stick_to_bottom);
    }
}
