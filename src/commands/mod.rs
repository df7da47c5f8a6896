//! Slash commands typed into the input box.
//!
//! Commands never mutate the application directly; they translate into
//! [`AppAction`]s that the event loop applies like any other input.

mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::app::{App, AppAction};

#[derive(Debug)]
pub enum CommandResult {
    Actions(Vec<AppAction>),
    ProcessAsMessage(String),
}

fn status(message: impl Into<String>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::SetStatus {
        message: message.into(),
    }])
}

pub fn process_input(app: &App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => {
            (command.handler)(app, CommandInvocation { args })
        }
        None => status(format!("Unknown command: /{command_name} (try /help)")),
    }
}

pub(super) fn handle_help(_app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    if !invocation.args.is_empty() {
        let name = invocation.args.trim_start_matches('/');
        return match find_command(name) {
            Some(command) => status(format!("{}: {}", command.usage, command.help)),
            None => status(format!("Unknown command: /{name}")),
        };
    }
    let usages: Vec<&str> = all_commands().iter().map(|c| c.usage).collect();
    status(format!("Commands: {}", usages.join("  ")))
}

pub(super) fn handle_new(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::NewChat])
}

pub(super) fn handle_open(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    let index = match invocation.args.parse::<usize>() {
        Ok(n) if n >= 1 => n - 1,
        _ => return status("Usage: /open <n>"),
    };
    match app.conversations.nth(index) {
        Some(summary) => CommandResult::Actions(vec![AppAction::SelectConversation {
            id: summary.id.clone(),
        }]),
        None => status(format!(
            "No conversation {} (there are {})",
            index + 1,
            app.conversations.len()
        )),
    }
}

pub(super) fn handle_key(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    let api_key = Some(invocation.args.to_string()).filter(|key| !key.is_empty());
    CommandResult::Actions(vec![AppAction::SaveSettings {
        settings: app.settings.with_api_key(api_key),
    }])
}

pub(super) fn handle_version(app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    let version_id = Some(invocation.args.to_string()).filter(|v| !v.is_empty());
    CommandResult::Actions(vec![AppAction::SaveSettings {
        settings: app.settings.with_version_id(version_id),
    }])
}

pub(super) fn handle_login(_app: &App, invocation: CommandInvocation<'_>) -> CommandResult {
    let mut parts = invocation.args.splitn(2, char::is_whitespace);
    let email = parts.next().unwrap_or_default().trim();
    if email.is_empty() {
        return status("Usage: /login <email> [display name]");
    }
    let display_name = parts.next().unwrap_or_default().trim();
    CommandResult::Actions(vec![AppAction::Login {
        display_name: display_name.to_string(),
        email: email.to_string(),
    }])
}

pub(super) fn handle_logout(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::Logout])
}

pub(super) fn handle_quit(_app: &App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Actions(vec![AppAction::Quit])
}
