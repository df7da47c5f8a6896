//! TUI-less "say" command

use std::error::Error;
use std::time::Duration;

use crate::cli::startup_login;
use crate::core::app::App;
use crate::core::config::Config;
use crate::core::dialogue::{DialogueError, DialogueService};
use crate::core::profile;
use crate::core::settings::Settings;

pub async fn run_say(
    text: Vec<String>,
    config: Config,
    settings: Settings,
) -> Result<(), Box<dyn Error>> {
    let text = text.join(" ");
    if text.trim().is_empty() {
        eprintln!("Usage: colloquy say <message>");
        std::process::exit(1);
    }

    let mut app = App::new(config, settings);
    if let Some(login) = startup_login(&app.config) {
        let profile = profile::login(&login.display_name, &login.email, Duration::ZERO).await;
        app.complete_login(profile);
    }

    let service = app.dialogue_service();
    match say_once(&mut app, service.as_ref(), &text).await {
        Some(Ok(reply)) => {
            println!("{reply}");
            Ok(())
        }
        Some(Err(err)) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
        None => Ok(()),
    }
}

/// Run one turn; `None` when the text was blank.
pub async fn say_once(
    app: &mut App,
    service: &dyn DialogueService,
    text: &str,
) -> Option<Result<String, DialogueError>> {
    app.send_message(text, service).await
}
