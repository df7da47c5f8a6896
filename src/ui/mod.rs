//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that turns key presses into
//!   [`crate::core::app::AppAction`]s and runs the resulting commands.
//! - [`renderer`]: frame layout for the sidebar, transcript and input box.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod renderer;
