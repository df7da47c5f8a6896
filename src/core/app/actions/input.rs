use super::{App, AppAction, AppCommand};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::InsertIntoInput { text } => {
            app.input.push_str(&text);
            None
        }
        AppAction::DeleteBackward => {
            app.input.pop();
            None
        }
        AppAction::ClearInput => {
            app.input.clear();
            None
        }
        AppAction::SetStatus { message } => {
            app.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.clear_status();
            None
        }
        AppAction::Quit => {
            app.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}
