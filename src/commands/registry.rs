use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "List available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new conversation.",
        handler: super::handle_new,
    },
    Command {
        name: "open",
        usage: "/open <n>",
        help: "Switch to conversation number n from the sidebar.",
        handler: super::handle_open,
    },
    Command {
        name: "key",
        usage: "/key [credential]",
        help: "Set the dialogue service API key, or clear it to use mock mode.",
        handler: super::handle_key,
    },
    Command {
        name: "version",
        usage: "/version [id]",
        help: "Set the version selector (defaults to production).",
        handler: super::handle_version,
    },
    Command {
        name: "login",
        usage: "/login <email> [display name]",
        help: "Sign in as another staff member.",
        handler: super::handle_login,
    },
    Command {
        name: "logout",
        usage: "/logout",
        help: "Sign out and clear all conversations.",
        handler: super::handle_logout,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Exit the application.",
        handler: super::handle_quit,
    },
];
