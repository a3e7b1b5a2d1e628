//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: product header with status and "↓ New" marker
//! - `MessageBubble`: one transcript entry
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBar`: single-line draft plus action button
//! - `ChatWindow`: scrollable transcript with layout caching and the typing indicator
//! - `AccessGate`: access-code screen wrapping a masked `InputBar`
//!
//! Components receive external data as props rather than reaching into
//! `App`, so each can be rendered against a `TestBackend` in isolation:
//!
//! ```rust,ignore
//! ChatWindow::new(&mut tui.chat_window, app.transcript.messages(), app.loading, frame_idx)
//!     .render(frame, area);
//! ```

pub mod access_gate;
pub mod chat_window;
pub mod input_bar;
pub mod message_bubble;
mod title_bar;

pub use access_gate::AccessGate;
pub use chat_window::{ChatWindow, ChatWindowState};
pub use input_bar::{InputBar, InputEvent};
pub use title_bar::TitleBar;
