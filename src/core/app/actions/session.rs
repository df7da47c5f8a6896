use super::{App, AppAction, AppCommand};

pub(super) fn handle_session_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::Login {
            display_name,
            email,
        } => {
            if !app.begin_login() {
                return None;
            }
            Some(AppCommand::Login {
                display_name,
                email,
                delay: app.config.login_delay(),
            })
        }
        AppAction::LoginCompleted { profile } => {
            app.complete_login(profile);
            None
        }
        AppAction::Logout => {
            app.logout();
            None
        }
        AppAction::NewChat => {
            app.new_chat();
            None
        }
        AppAction::SelectConversation { id } => {
            app.select_conversation(&id);
            None
        }
        AppAction::SaveSettings { settings } => {
            app.save_settings(settings);
            None
        }
        _ => unreachable!("non-session action routed to session handler"),
    }
}
