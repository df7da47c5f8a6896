mod input;
mod sending;
mod session;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::{App, PendingSend};
use crate::core::conversation::ConversationId;
use crate::core::dialogue::{DialogueError, DialogueService};
use crate::core::profile::UserProfile;
use crate::core::settings::Settings;

pub enum AppAction {
    Login {
        display_name: String,
        email: String,
    },
    LoginCompleted {
        profile: UserProfile,
    },
    Logout,
    NewChat,
    SelectConversation {
        id: ConversationId,
    },
    SubmitMessage {
        message: String,
    },
    ReplyReceived {
        pending: PendingSend,
        result: Result<String, DialogueError>,
    },
    SaveSettings {
        settings: Settings,
    },
    InsertIntoInput {
        text: String,
    },
    DeleteBackward,
    ClearInput,
    SetStatus {
        message: String,
    },
    ClearStatus,
    Quit,
}

impl fmt::Debug for AppAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppAction::Login { .. } => "Login",
            AppAction::LoginCompleted { .. } => "LoginCompleted",
            AppAction::Logout => "Logout",
            AppAction::NewChat => "NewChat",
            AppAction::SelectConversation { .. } => "SelectConversation",
            AppAction::SubmitMessage { .. } => "SubmitMessage",
            AppAction::ReplyReceived { .. } => "ReplyReceived",
            AppAction::SaveSettings { .. } => "SaveSettings",
            AppAction::InsertIntoInput { .. } => "InsertIntoInput",
            AppAction::DeleteBackward => "DeleteBackward",
            AppAction::ClearInput => "ClearInput",
            AppAction::SetStatus { .. } => "SetStatus",
            AppAction::ClearStatus => "ClearStatus",
            AppAction::Quit => "Quit",
        };
        f.write_str(name)
    }
}

pub struct AppActionEnvelope {
    pub action: AppAction,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope { action });
        }
    }
}

/// Side effects requested by an action, executed by the event loop.
pub enum AppCommand {
    Interact {
        pending: PendingSend,
        service: Arc<dyn DialogueService>,
    },
    Login {
        display_name: String,
        email: String,
        delay: Duration,
    },
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { .. } | AppAction::ReplyReceived { .. } => {
            sending::handle_sending_action(app, action)
        }

        AppAction::Login { .. }
        | AppAction::LoginCompleted { .. }
        | AppAction::Logout
        | AppAction::NewChat
        | AppAction::SelectConversation { .. }
        | AppAction::SaveSettings { .. } => session::handle_session_action(app, action),

        AppAction::InsertIntoInput { .. }
        | AppAction::DeleteBackward
        | AppAction::ClearInput
        | AppAction::SetStatus { .. }
        | AppAction::ClearStatus
        | AppAction::Quit => input::handle_input_action(app, action),
    }
}
