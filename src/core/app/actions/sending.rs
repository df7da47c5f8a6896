use super::{App, AppAction, AppCommand};

pub(super) fn handle_sending_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { message } => {
            let pending = app.begin_send(&message)?;
            let service = app.dialogue_service();
            Some(AppCommand::Interact { pending, service })
        }
        AppAction::ReplyReceived { pending, result } => {
            app.complete_send(pending, result);
            None
        }
        _ => unreachable!("non-sending action routed to sending handler"),
    }
}
