//! Executes reducer effects against a backend and turns the outcome back
//! into the `Action` that settles it.

use log::debug;

use super::client::QaBackend;
use crate::core::action::{Action, Effect};

/// Perform the I/O an effect describes.
///
/// Returns `None` for effects that involve no backend call.
pub async fn run(backend: &dyn QaBackend, effect: Effect) -> Option<Action> {
    match effect {
        Effect::Verify { access_code } => {
            debug!("Dispatching verify via {}", backend.name());
            Some(Action::VerifyCompleted(backend.verify(&access_code).await))
        }
        Effect::Ask(request) => {
            debug!("Dispatching ask via {}", backend.name());
            Some(Action::AnswerReceived(backend.ask(&request).await))
        }
        Effect::None | Effect::Quit => None,
    }
}

pub async fn check_health(backend: &dyn QaBackend) -> Action {
    Action::HealthChecked(backend.health().await)
}
