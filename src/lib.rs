//! Colloquy is a terminal chat client for staff talking to a hosted
//! dialogue-management assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the signed-in profile, the conversation
//!   registry and transcripts, settings, and the dialogue service adapters.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the request and trace payloads of the dialogue service.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes and dispatches into
//! [`core::app`] and [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
