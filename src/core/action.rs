//! # Actions
//!
//! Everything that can happen in ATPInsight becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::AnswerReceived(result)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing any I/O the adapter must perform.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions in, assert on state and effect.
//! And debuggable: log every action, replay the exact session.

use log::{debug, info, warn};

use crate::backend::{AskRequest, BackendError, VerifyOutcome};
use crate::core::state::{App, FALLBACK_TEXT, Message};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User submitted the access form.
    SubmitAccessCode(String),
    /// `/verify` settled.
    VerifyCompleted(Result<VerifyOutcome, BackendError>),
    /// User submitted a question.
    Submit(String),
    /// `/ask` settled.
    AnswerReceived(Result<String, BackendError>),
    /// Start-up `/health` probe settled.
    HealthChecked(Result<(), BackendError>),
    Quit,
}

/// I/O requested by `update()`. Executed by the adapter, never by the core.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Verify { access_code: String },
    Ask(AskRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SubmitAccessCode(code) => {
            if app.authenticated {
                debug!("Ignoring access code: session already authenticated");
                return Effect::None;
            }
            if app.verifying {
                debug!("Ignoring access code: verification already in flight");
                return Effect::None;
            }
            app.access_code = code.clone();
            app.verifying = true;
            app.status_message = String::from("Verifying access code...");
            Effect::Verify { access_code: code }
        }

        Action::VerifyCompleted(result) => {
            if !app.verifying {
                warn!("Discarding verify result with no verification in flight");
                return Effect::None;
            }
            app.verifying = false;
            app.status_message.clear();
            match result {
                Ok(VerifyOutcome::Accepted) => {
                    info!("Access code accepted");
                    app.authenticated = true;
                    app.auth_error = false;
                }
                Ok(VerifyOutcome::Rejected) => {
                    info!("Access code rejected");
                    app.auth_error = true;
                }
                Err(e) => {
                    warn!("Access code verification failed: {}", e);
                    app.auth_error = true;
                }
            }
            Effect::None
        }

        Action::Submit(text) => {
            if text.trim().is_empty() {
                return Effect::None;
            }
            if !app.authenticated {
                warn!("Ignoring submission from unauthenticated session");
                return Effect::None;
            }
            if app.loading {
                debug!("Ignoring submission: a request is already in flight");
                return Effect::None;
            }

            // Optimistic append happens before the request is even built
            app.transcript.push(Message::user(text.clone()));
            app.loading = true;
            app.status_message = String::from("Thinking...");

            Effect::Ask(AskRequest {
                question: text,
                access_code: app.ask_access_code(),
            })
        }

        Action::AnswerReceived(result) => {
            if !app.loading {
                warn!("Discarding answer with no request in flight");
                return Effect::None;
            }
            let message = match result {
                Ok(answer) => Message::assistant(answer),
                Err(e) => {
                    warn!("Ask request failed: {}", e);
                    Message::assistant(FALLBACK_TEXT)
                }
            };
            app.transcript.push(message);
            app.loading = false;
            app.status_message.clear();
            Effect::None
        }

        Action::HealthChecked(result) => {
            // Never clobber an in-progress status
            if app.loading || app.verifying {
                return Effect::None;
            }
            app.status_message = match result {
                Ok(()) => String::from("Backend online"),
                Err(e) => {
                    warn!("Health check failed: {}", e);
                    String::from("Backend unreachable")
                }
            };
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}
