use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::Trace;
use crate::core::app::App;
use crate::core::config::Config;
use crate::core::dialogue::{extract_reply, DialogueError, DialogueService};
use crate::core::profile::UserProfile;
use crate::core::settings::Settings;

pub fn create_test_app() -> App {
    let config = Config {
        mock_delay_ms: Some(0),
        login_delay_ms: Some(0),
        ..Config::default()
    };
    App::new(config, Settings::default())
}

pub fn create_signed_in_app() -> App {
    let mut app = create_test_app();
    app.complete_login(UserProfile::from_credentials("Sam Rivera", "sam@example.com"));
    app
}

enum Script {
    Reply(String),
    Status(StatusCode, String),
}

/// Dialogue service double that answers every turn the same way and
/// records the session keys it was called with.
pub struct ScriptedService {
    script: Script,
    session_keys: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn replying(reply: &str) -> Self {
        Self::new(Script::Reply(reply.to_string()))
    }

    pub fn traces(raw: &str) -> Self {
        let traces: Vec<Trace> = serde_json::from_str(raw).expect("valid trace fixture");
        Self::new(Script::Reply(extract_reply(&traces)))
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self::new(Script::Status(status, body.to_string()))
    }

    fn new(script: Script) -> Self {
        Self {
            script,
            session_keys: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.session_keys.lock().unwrap().len()
    }

    pub fn session_keys(&self) -> Vec<String> {
        self.session_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogueService for ScriptedService {
    async fn interact(&self, session_key: &str, _text: &str) -> Result<String, DialogueError> {
        self.session_keys
            .lock()
            .unwrap()
            .push(session_key.to_string());
        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Status(status, body) => Err(DialogueError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn is_live(&self) -> bool {
        true
    }
}
