//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cli::say::run_say;
use crate::core::app::App;
use crate::core::config::Config;
use crate::core::settings::Settings;
use crate::ui::chat_loop::{run_chat, StartupLogin};
use crate::utils::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(version)]
#[command(about = "A terminal chat client for a hosted dialogue assistant")]
#[command(
    long_about = "Colloquy is a full-screen terminal chat client for staff talking to a hosted \
dialogue-management assistant. Each conversation keeps its own session on the service, \
so the assistant remembers context within a conversation.\n\n\
Without an API key Colloquy runs in mock mode and echoes your messages back.\n\n\
Environment Variables:\n\
  COLLOQUY_API_KEY  Credential for the dialogue service (enables live mode)\n\
  RUST_LOG          Log filter used with --log (default: info)\n\n\
Controls:\n\
  Enter             Send the message or run a /command\n\
  Up/Down/PgUp/PgDn Scroll the transcript\n\
  Ctrl+N            Start a new conversation\n\
  Esc               Dismiss the status line\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             List the available commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write logs to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<PathBuf>,

    /// Dialogue service credential (omit for mock mode)
    #[arg(short = 'k', long, global = true, env = "COLLOQUY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Version selector sent with each request
    #[arg(long = "version-id", global = true)]
    pub version_id: Option<String>,

    /// Dialogue service root URL
    #[arg(short = 'b', long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words for display-name)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Config => {
            Config::load()?.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let value = value.join(" ");
            if let Err(err) = config.set(&key, &value) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(err) = config.unset(&key) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Say { text } => {
            let config = resolve_config(Config::load()?, args.base_url);
            let settings = resolve_settings(&config, args.api_key, args.version_id);
            run_say(text, config, settings).await
        }
        Commands::Chat => {
            let config = resolve_config(Config::load()?, args.base_url);
            let settings = resolve_settings(&config, args.api_key, args.version_id);
            let login = startup_login(&config);
            info!(
                live = settings.is_live(),
                version = %settings.version_id,
                base_url = config.base_url(),
                "starting chat"
            );
            run_chat(App::new(config, settings), login).await
        }
    }
}

/// Apply command-line overrides on top of the saved configuration.
pub fn resolve_config(mut config: Config, base_url: Option<String>) -> Config {
    if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
        config.base_url = Some(base_url);
    }
    config
}

/// Flags win over the saved version selector; the credential never comes
/// from the config file.
pub fn resolve_settings(
    config: &Config,
    api_key: Option<String>,
    version_id: Option<String>,
) -> Settings {
    Settings::new(api_key, version_id.or_else(|| config.version_id.clone()))
}

/// Saved identity to sign in with at startup, if any.
pub fn startup_login(config: &Config) -> Option<StartupLogin> {
    let email = config.email.as_deref()?.trim();
    if email.is_empty() {
        return None;
    }
    Some(StartupLogin {
        display_name: config.display_name.clone().unwrap_or_default(),
        email: email.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_is_the_default_command() {
        let args = Args::try_parse_from(["colloquy"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn say_collects_trailing_words() {
        let args = Args::try_parse_from(["colloquy", "say", "where", "is", "--the", "wiki"]).unwrap();
        match args.command {
            Some(Commands::Say { text }) => assert_eq!(text, ["where", "is", "--the", "wiki"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = Args::try_parse_from([
            "colloquy",
            "chat",
            "--version-id",
            "development",
            "--base-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert_eq!(args.version_id.as_deref(), Some("development"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn flags_override_saved_config() {
        let config = Config {
            version_id: Some("staging".into()),
            base_url: Some("https://saved.example.com".into()),
            ..Default::default()
        };
        let config = resolve_config(config, Some("http://localhost:9000".into()));
        assert_eq!(config.base_url(), "http://localhost:9000");

        let settings = resolve_settings(&config, None, None);
        assert_eq!(settings.version_id, "staging");
        assert!(!settings.is_live());

        let settings = resolve_settings(&config, Some("VF.DM.key".into()), Some("dev".into()));
        assert_eq!(settings.version_id, "dev");
        assert!(settings.is_live());
    }

    #[test]
    fn blank_base_url_flag_is_ignored() {
        let config = resolve_config(Config::default(), Some("  ".into()));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn startup_login_requires_saved_email() {
        assert!(startup_login(&Config::default()).is_none());

        let config = Config {
            email: Some("sam@example.com".into()),
            display_name: Some("Sam Rivera".into()),
            ..Default::default()
        };
        let login = startup_login(&config).unwrap();
        assert_eq!(login.email, "sam@example.com");
        assert_eq!(login.display_name, "Sam Rivera");
    }
}
