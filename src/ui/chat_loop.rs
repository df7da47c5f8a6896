//! Main chat event loop
//!
//! The loop owns the [`App`]. Terminal input is translated into
//! [`AppAction`]s; actions that need I/O return an [`AppCommand`], which is
//! run on a tokio task that reports back through the action channel.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{process_input, CommandResult};
use crate::core::app::{
    apply_actions, App, AppAction, AppActionDispatcher, AppActionEnvelope, AppCommand,
};
use crate::core::dialogue::DialogueError;
use crate::core::profile;
use crate::ui::renderer::{ui, ViewState};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PAGE_LINES: u16 = 10;

type ChatTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Sign-in details to submit as soon as the loop starts.
pub struct StartupLogin {
    pub display_name: String,
    pub email: String,
}

pub async fn run_chat(app: App, login: Option<StartupLogin>) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, app, login).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    mut app: App,
    login: Option<StartupLogin>,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(tx);
    let mut view = ViewState::default();

    if let Some(StartupLogin {
        display_name,
        email,
    }) = login
    {
        dispatcher.dispatch_many([AppAction::Login {
            display_name,
            email,
        }]);
    }

    loop {
        let mut pending = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            pending.push(envelope);
        }
        if !pending.is_empty() {
            for command in apply_actions(&mut app, pending) {
                execute_command(command, dispatcher.clone());
            }
            view.follow();
        }

        if app.exit_requested {
            return Ok(());
        }

        terminal.draw(|f| ui(f, &app, &view))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key_actions(&app, key) {
                KeyOutcome::Actions(actions) => dispatcher.dispatch_many(actions),
                KeyOutcome::ScrollUp(lines) => view.scroll_up(lines),
                KeyOutcome::ScrollDown(lines) => view.scroll_down(lines),
                KeyOutcome::Ignored => {}
            },
            // Pasted or dictated text arrives as one opaque chunk.
            Event::Paste(text) => dispatcher.dispatch_many([AppAction::InsertIntoInput {
                text: text.replace(['\r', '\n'], " "),
            }]),
            _ => {}
        }
    }
}

#[derive(Debug)]
pub enum KeyOutcome {
    Actions(Vec<AppAction>),
    ScrollUp(u16),
    ScrollDown(u16),
    Ignored,
}

/// Map a key press to the actions it triggers.
pub fn key_actions(app: &App, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyOutcome::Actions(vec![AppAction::Quit]),
        KeyCode::Char('n') if ctrl => KeyOutcome::Actions(vec![AppAction::NewChat]),
        KeyCode::Char(ch) if !ctrl => KeyOutcome::Actions(vec![AppAction::InsertIntoInput {
            text: ch.to_string(),
        }]),
        KeyCode::Backspace => KeyOutcome::Actions(vec![AppAction::DeleteBackward]),
        KeyCode::Esc => KeyOutcome::Actions(vec![AppAction::ClearStatus]),
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                return KeyOutcome::Ignored;
            }
            match process_input(app, &app.input) {
                CommandResult::ProcessAsMessage(message) => {
                    KeyOutcome::Actions(vec![AppAction::SubmitMessage { message }])
                }
                CommandResult::Actions(mut actions) => {
                    actions.insert(0, AppAction::ClearInput);
                    KeyOutcome::Actions(actions)
                }
            }
        }
        KeyCode::Up => KeyOutcome::ScrollUp(1),
        KeyCode::Down => KeyOutcome::ScrollDown(1),
        KeyCode::PageUp => KeyOutcome::ScrollUp(PAGE_LINES),
        KeyCode::PageDown => KeyOutcome::ScrollDown(PAGE_LINES),
        _ => KeyOutcome::Ignored,
    }
}

/// Run a command on a background task and report its outcome as an action.
pub fn execute_command(command: AppCommand, dispatcher: AppActionDispatcher) {
    match command {
        AppCommand::Interact { pending, service } => {
            debug!(conversation = %pending.conversation_id, live = service.is_live(), "dispatching turn");
            tokio::spawn(async move {
                let request = {
                    let pending = pending.clone();
                    tokio::spawn(async move {
                        service
                            .interact(&pending.session_key, &pending.text)
                            .await
                    })
                };
                // A panicking request must still release the busy flag.
                let result = match request.await {
                    Ok(result) => result,
                    Err(err) => {
                        warn!(error = %err, "dialogue request task failed");
                        Err(DialogueError::Aborted(err.to_string()))
                    }
                };
                dispatcher.dispatch_many([AppAction::ReplyReceived { pending, result }]);
            });
        }
        AppCommand::Login {
            display_name,
            email,
            delay,
        } => {
            tokio::spawn(async move {
                let profile = profile::login(&display_name, &email, delay).await;
                dispatcher.dispatch_many([AppAction::LoginCompleted { profile }]);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dialogue::MOCK_MODE_NOTICE;
    use crate::utils::test_utils::create_test_app;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn actions(outcome: KeyOutcome) -> Vec<AppAction> {
        match outcome {
            KeyOutcome::Actions(actions) => actions,
            other => panic!("expected actions, got {other:?}"),
        }
    }

    #[test]
    fn enter_submits_plain_text() {
        let mut app = create_test_app();
        app.input = "hello".into();
        let mut actions = actions(key_actions(&app, press(KeyCode::Enter)));
        match actions.pop() {
            Some(AppAction::SubmitMessage { message }) => assert_eq!(message, "hello"),
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn enter_on_blank_input_is_ignored() {
        let mut app = create_test_app();
        app.input = "  ".into();
        assert!(matches!(
            key_actions(&app, press(KeyCode::Enter)),
            KeyOutcome::Ignored
        ));
    }

    #[test]
    fn enter_runs_commands_and_clears_input() {
        let mut app = create_test_app();
        app.input = "/new".into();
        let actions = actions(key_actions(&app, press(KeyCode::Enter)));
        assert!(matches!(actions[0], AppAction::ClearInput));
        assert!(matches!(actions[1], AppAction::NewChat));
    }

    #[test]
    fn control_keys_map_to_actions() {
        let app = create_test_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(
            actions(key_actions(&app, ctrl_c)).as_slice(),
            [AppAction::Quit]
        ));
        assert!(matches!(
            key_actions(&app, press(KeyCode::PageUp)),
            KeyOutcome::ScrollUp(PAGE_LINES)
        ));
    }

    #[tokio::test]
    async fn interact_command_reports_back_through_dispatcher() {
        let mut app = create_test_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);

        let command = crate::core::app::apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "hello".into(),
            },
        )
        .expect("send should start");
        execute_command(command, dispatcher);

        let envelope = rx.recv().await.expect("reply action");
        assert!(apply_actions(&mut app, [envelope]).is_empty());
        assert!(!app.is_busy());
        let reply = app.transcript.last().unwrap();
        assert!(reply.content.contains("hello"));
        assert!(reply.content.contains(MOCK_MODE_NOTICE));
    }

    #[tokio::test]
    async fn login_command_completes_sign_in() {
        let mut app = create_test_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);

        execute_command(
            AppCommand::Login {
                display_name: "Sam".into(),
                email: "sam@example.com".into(),
                delay: Duration::ZERO,
            },
            dispatcher,
        );

        let envelope = rx.recv().await.expect("login action");
        apply_actions(&mut app, [envelope]);
        assert_eq!(app.profile.as_ref().map(|p| p.id.as_str()), Some("sam"));
        assert_eq!(app.conversations.len(), 3);
    }
}
