use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::conversation::{
    derive_title, ConversationId, ConversationRegistry, ConversationSummary, Transcript,
    TranscriptArchive,
};
use crate::core::dialogue::{service_for, DialogueError, DialogueService};
use crate::core::message::{IdSource, Message};
use crate::core::mock::{sample_conversations, PLACEHOLDER_HISTORY};
use crate::core::profile::UserProfile;
use crate::core::settings::Settings;

pub mod actions;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppActionEnvelope, AppCommand,
};

pub(crate) const BUSY_STATUS: &str = "Waiting for the current reply";
pub(crate) const SIGNING_IN_STATUS: &str = "Signing in...";

/// A user turn that has been appended to the transcript and is waiting on
/// the dialogue service.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub conversation_id: ConversationId,
    pub session_key: String,
    pub text: String,
}

/// Root application state. Every mutation goes through a named method here
/// (usually reached via [`AppAction`]).
pub struct App {
    pub config: Config,
    pub settings: Settings,
    pub profile: Option<UserProfile>,
    pub conversations: ConversationRegistry,
    pub transcript: Transcript,
    pub archive: TranscriptArchive,
    pub active_conversation: Option<ConversationId>,
    pub input: String,
    pub status: Option<String>,
    pub exit_requested: bool,
    busy: bool,
    login_pending: bool,
    ids: IdSource,
    client: Client,
}

impl App {
    pub fn new(config: Config, settings: Settings) -> Self {
        Self {
            config,
            settings,
            profile: None,
            conversations: ConversationRegistry::new(),
            transcript: Transcript::new(),
            archive: TranscriptArchive::new(),
            active_conversation: None,
            input: String::new(),
            status: None,
            exit_requested: false,
            busy: false,
            login_pending: false,
            ids: IdSource::new(),
            client: Client::new(),
        }
    }

    /// True while a turn is waiting on the dialogue service.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Adapter matching the current settings.
    pub fn dialogue_service(&self) -> Arc<dyn DialogueService> {
        service_for(&self.settings, &self.config, &self.client)
    }

    /// True between a login request and its completion; sends are held off.
    pub fn is_login_pending(&self) -> bool {
        self.login_pending
    }

    /// Record that a simulated sign-in is in progress.
    pub fn begin_login(&mut self) -> bool {
        if self.refuse_while_busy() {
            return false;
        }
        self.login_pending = true;
        self.set_status(SIGNING_IN_STATUS);
        true
    }

    /// Install a freshly signed-in profile and the sample conversation list.
    ///
    /// Refused while a turn is in flight: the reply belongs to the current
    /// owner's conversation.
    pub fn complete_login(&mut self, profile: UserProfile) -> bool {
        self.login_pending = false;
        if self.refuse_while_busy() {
            info!(user = %profile.id, "sign-in discarded while a reply is pending");
            return false;
        }
        self.reset_conversation_state();
        for summary in sample_conversations(Utc::now()).into_iter().rev() {
            self.conversations.register(summary);
        }
        self.set_status(format!("Signed in as {}", profile.display_name));
        self.profile = Some(profile);
        true
    }

    pub fn logout(&mut self) -> bool {
        if self.refuse_while_busy() {
            return false;
        }
        if let Some(profile) = self.profile.take() {
            info!(user = %profile.id, "signed out");
        }
        self.reset_conversation_state();
        self.set_status("Signed out");
        true
    }

    /// Return to the "new chat" state: empty transcript, no active conversation.
    pub fn new_chat(&mut self) -> bool {
        if self.refuse_while_busy() {
            return false;
        }
        self.active_conversation = None;
        self.transcript.clear();
        self.clear_status();
        true
    }

    /// Make `id` the active conversation and show its stored messages.
    ///
    /// Never touches the network. Conversations without messages from this
    /// session show a display-only placeholder.
    pub fn select_conversation(&mut self, id: &ConversationId) -> bool {
        if self.refuse_while_busy() {
            return false;
        }
        let Some(summary) = self.conversations.get(id) else {
            self.set_status(format!("Unknown conversation: {id}"));
            return false;
        };
        debug!(conversation = %id, title = %summary.title, "switching conversation");

        let messages = match self.archive.messages(id) {
            Some(messages) => messages.to_vec(),
            None => vec![Message::placeholder(self.ids.next_id(), PLACEHOLDER_HISTORY)],
        };
        self.transcript.replace(messages);
        self.active_conversation = Some(id.clone());
        self.clear_status();
        true
    }

    pub fn save_settings(&mut self, settings: Settings) {
        let mode = if settings.is_live() { "live" } else { "mock" };
        info!(mode, version = %settings.version_id, "settings updated");
        self.settings = settings;
        self.set_status(format!(
            "Settings saved ({mode} mode, version {})",
            self.settings.version_id
        ));
    }

    /// Stable key the dialogue service uses to keep per-conversation context.
    pub fn session_key(&self, conversation_id: &ConversationId) -> String {
        let owner = self
            .profile
            .as_ref()
            .map(|profile| profile.id.as_str())
            .unwrap_or("guest");
        format!("{owner}-{conversation_id}")
    }

    /// First half of a turn: validate, append the user message, mark busy.
    ///
    /// Returns `None` without touching the transcript when the trimmed input
    /// is empty, another turn is still in flight, or a sign-in is pending.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        let text = input.trim();
        if text.is_empty() || self.busy {
            return None;
        }
        if self.login_pending {
            self.set_status(SIGNING_IN_STATUS);
            return None;
        }
        let text = text.to_string();

        let conversation_id = match &self.active_conversation {
            Some(id) => id.clone(),
            None => {
                let id = ConversationId::generate();
                self.active_conversation = Some(id.clone());
                id
            }
        };

        let message = Message::user(self.ids.next_id(), text.clone());
        self.archive.append(&conversation_id, message.clone());
        self.transcript.push(message);
        self.input.clear();
        self.busy = true;
        self.set_status(BUSY_STATUS);

        let session_key = self.session_key(&conversation_id);
        debug!(conversation = %conversation_id, "turn started");
        Some(PendingSend {
            conversation_id,
            session_key,
            text,
        })
    }

    /// Second half of a turn: append the reply (or the error), update the
    /// conversation list and release the busy flag.
    pub fn complete_send(&mut self, pending: PendingSend, result: Result<String, DialogueError>) {
        match result {
            Ok(reply) => self.finish_turn(&pending, reply, true),
            Err(err) => self.finish_turn(&pending, failure_message(&pending, &err), false),
        }
    }

    /// Run a whole turn against `service`: one round trip, no retry.
    ///
    /// Returns the service outcome, or `None` when the send was not started.
    pub async fn send_message(
        &mut self,
        input: &str,
        service: &dyn DialogueService,
    ) -> Option<Result<String, DialogueError>> {
        let pending = self.begin_send(input)?;
        let result = service.interact(&pending.session_key, &pending.text).await;
        match &result {
            Ok(reply) => self.finish_turn(&pending, reply.clone(), true),
            Err(err) => self.finish_turn(&pending, failure_message(&pending, err), false),
        }
        Some(result)
    }

    fn finish_turn(&mut self, pending: &PendingSend, content: String, succeeded: bool) {
        let message = Message::assistant(self.ids.next_id(), content);
        self.archive.append(&pending.conversation_id, message.clone());
        if self.active_conversation.as_ref() == Some(&pending.conversation_id) {
            self.transcript.push(message);
        }

        let now = Utc::now();
        if !self.conversations.touch(&pending.conversation_id, now) && succeeded {
            let first_user_text = self
                .archive
                .messages(&pending.conversation_id)
                .and_then(|messages| messages.iter().find(|m| m.is_user()))
                .map(|m| m.content.clone())
                .unwrap_or_else(|| pending.text.clone());
            self.conversations.register(ConversationSummary::new(
                pending.conversation_id.clone(),
                derive_title(&first_user_text),
                now,
            ));
        }

        self.busy = false;
        self.clear_status();
    }

    fn refuse_while_busy(&mut self) -> bool {
        if self.busy {
            self.set_status(BUSY_STATUS);
        }
        self.busy
    }

    fn reset_conversation_state(&mut self) {
        self.conversations.clear();
        self.archive.clear();
        self.transcript.clear();
        self.active_conversation = None;
        self.input.clear();
    }
}

fn failure_message(pending: &PendingSend, err: &DialogueError) -> String {
    info!(conversation = %pending.conversation_id, error = %err, "turn failed");
    format!("Error: {err}")
}
