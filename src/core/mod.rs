pub mod app;
pub mod config;
pub mod conversation;
pub mod dialogue;
pub mod message;
pub mod mock;
pub mod profile;
pub mod settings;
