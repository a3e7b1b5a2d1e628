pub mod client;
pub mod dispatch;
pub mod http;
pub mod types;

pub use client::{BackendError, QaBackend};
pub use http::HttpBackend;
pub use types::{AskRequest, AskResponse, VerifyOutcome};
