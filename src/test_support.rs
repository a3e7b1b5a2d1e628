//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::backend::{AskRequest, BackendError, QaBackend, VerifyOutcome};
use crate::core::state::App;

/// A canned backend for tests that don't need real HTTP.
pub struct StubBackend {
    verify: Result<VerifyOutcome, BackendError>,
    answer: Result<String, BackendError>,
    ask_calls: AtomicUsize,
}

impl StubBackend {
    /// Accepts any access code and answers every question with `answer`.
    pub fn answering(answer: &str) -> Self {
        Self {
            verify: Ok(VerifyOutcome::Accepted),
            answer: Ok(answer.to_string()),
            ask_calls: AtomicUsize::new(0),
        }
    }

    /// Rejects every access code.
    pub fn rejecting() -> Self {
        Self {
            verify: Ok(VerifyOutcome::Rejected),
            answer: Err(BackendError::Api {
                status: 401,
                message: "Invalid access code".to_string(),
            }),
            ask_calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with `error`.
    pub fn failing(error: BackendError) -> Self {
        Self {
            verify: Err(error.clone()),
            answer: Err(error),
            ask_calls: AtomicUsize::new(0),
        }
    }

    pub fn ask_calls(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QaBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn verify(&self, _access_code: &str) -> Result<VerifyOutcome, BackendError> {
        self.verify.clone()
    }

    async fn ask(&self, _request: &AskRequest) -> Result<String, BackendError> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }

    async fn health(&self) -> Result<(), BackendError> {
        self.verify.clone().map(|_| ())
    }
}

/// Creates a gated, not-yet-authenticated App.
pub fn test_app() -> App {
    App::new(true)
}

/// Creates a gated App that already passed verification with code `letmein`.
pub fn authenticated_app() -> App {
    let mut app = App::new(true);
    app.access_code = "letmein".to_string();
    app.authenticated = true;
    app
}
