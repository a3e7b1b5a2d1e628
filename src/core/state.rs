//! # Application State
//!
//! Core business state for ATPInsight. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── transcript: Transcript        // conversation history (append-only)
//! ├── access_code: String           // last submitted access code
//! ├── require_access_code: bool     // gate variant in use
//! ├── authenticated: bool           // gate passed
//! ├── auth_error: bool              // last verify attempt failed
//! ├── verifying: bool               // /verify in flight
//! ├── loading: bool                 // /ask in flight
//! └── status_message: String        // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use serde::{Deserialize, Serialize};

use crate::core::config::ResolvedConfig;

/// Synthetic assistant message every transcript starts with.
pub const WELCOME_TEXT: &str =
    "Welcome to ATPInsight. Ask me anything about ATP matches, players, and performance in 2024.";

/// Assistant text appended when an `/ask` call fails for any reason.
pub const FALLBACK_TEXT: &str = "Error connecting to backend.";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Fields are private so a message cannot be edited
/// after it lands in the transcript.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered, append-only list of messages. Oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Creates a transcript holding only the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(WELCOME_TEXT)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

pub struct App {
    pub transcript: Transcript,
    pub access_code: String,
    pub require_access_code: bool,
    pub authenticated: bool,
    pub auth_error: bool,
    /// True while a `/verify` call is in flight.
    pub verifying: bool,
    /// True while an `/ask` call is in flight. At most one at a time.
    pub loading: bool,
    pub status_message: String,
}

impl App {
    /// `require_access_code = false` starts the session already authenticated.
    pub fn new(require_access_code: bool) -> Self {
        Self {
            transcript: Transcript::new(),
            access_code: String::new(),
            require_access_code,
            authenticated: !require_access_code,
            auth_error: false,
            verifying: false,
            loading: false,
            status_message: String::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.require_access_code)
    }

    /// The access code to attach to `/ask`, if the gate variant is in use.
    pub fn ask_access_code(&self) -> Option<String> {
        self.require_access_code.then(|| self.access_code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(!app.loading);
        assert!(!app.authenticated);
        assert!(!app.auth_error);
        assert!(app.access_code.is_empty());
    }

    #[test]
    fn transcript_starts_with_welcome_message() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        let first = &transcript.messages()[0];
        assert_eq!(first.role(), Role::Assistant);
        assert_eq!(first.text(), WELCOME_TEXT);
    }

    #[test]
    fn gate_disabled_starts_authenticated() {
        let app = App::new(false);
        assert!(app.authenticated);
        assert_eq!(app.ask_access_code(), None);
    }

    #[test]
    fn gate_enabled_attaches_access_code() {
        let mut app = App::new(true);
        app.access_code = "secret".to_string();
        assert_eq!(app.ask_access_code().as_deref(), Some("secret"));
    }

    #[test]
    fn message_serializes_with_lowercase_role() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "text": "hi"}));
    }
}
