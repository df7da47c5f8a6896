use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::core::message::Message;

/// Number of characters of the first user message kept in a conversation title.
pub const TITLE_MAX_CHARS: usize = 30;
const TITLE_ELLIPSIS: &str = "...";

static CLOCK_FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    /// Mint a random 128-bit identifier rendered as lowercase hex.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        if let Err(err) = getrandom::fill(&mut bytes) {
            warn!(error = %err, "OS randomness unavailable; deriving conversation id from the clock");
            bytes = clock_id_bytes();
        }
        Self::from_bytes(&bytes)
    }

    fn from_bytes(bytes: &[u8; 16]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Clock timestamp plus a process-wide counter, so ids minted in the same
/// nanosecond still differ.
fn clock_id_bytes() -> [u8; 16] {
    let mut bytes = [0u8; 16];
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let sequence = CLOCK_FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    bytes[..8].copy_from_slice(&nanos.to_le_bytes());
    bytes[8..].copy_from_slice(&sequence.to_le_bytes());
    bytes
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSummary {
    pub fn new(id: ConversationId, title: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            updated_at,
        }
    }
}

/// Derive a conversation title from its first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] grapheme clusters of the trimmed text
/// and appends an ellipsis.
pub fn derive_title(first_message: &str) -> String {
    let head: String = first_message
        .trim()
        .graphemes(true)
        .take(TITLE_MAX_CHARS)
        .collect();
    format!("{head}{TITLE_ELLIPSIS}")
}

/// Ordered list of conversation summaries, most recently active first.
#[derive(Debug, Default, Clone)]
pub struct ConversationRegistry {
    conversations: Vec<ConversationSummary>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a summary at the front. An existing entry with the same id is replaced.
    pub fn register(&mut self, summary: ConversationSummary) {
        self.conversations.retain(|c| c.id != summary.id);
        self.conversations.insert(0, summary);
    }

    pub fn get(&self, id: &ConversationId) -> Option<&ConversationSummary> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// Refresh the last-updated timestamp and move the conversation to the front.
    /// Returns false for unknown ids.
    pub fn touch(&mut self, id: &ConversationId, now: DateTime<Utc>) -> bool {
        let Some(index) = self.conversations.iter().position(|c| &c.id == id) else {
            return false;
        };
        let mut summary = self.conversations.remove(index);
        summary.updated_at = now;
        self.conversations.insert(0, summary);
        true
    }

    pub fn nth(&self, index: usize) -> Option<&ConversationSummary> {
        self.conversations.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationSummary> {
        self.conversations.iter()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn clear(&mut self) {
        self.conversations.clear();
    }
}

/// Messages of the active conversation, in append order.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

/// Messages exchanged with each conversation during this session.
#[derive(Debug, Default, Clone)]
pub struct TranscriptArchive {
    entries: HashMap<ConversationId, Vec<Message>>,
}

impl TranscriptArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, id: &ConversationId, message: Message) {
        self.entries.entry(id.clone()).or_default().push(message);
    }

    pub fn messages(&self, id: &ConversationId) -> Option<&[Message]> {
        self.entries
            .get(id)
            .map(Vec::as_slice)
            .filter(|messages| !messages.is_empty())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::IdSource;
    use chrono::Duration;

    #[test]
    fn title_keeps_thirty_characters_and_appends_ellipsis() {
        let text = "How do I reset the password for the shared drive?";
        assert_eq!(derive_title(text), "How do I reset the password fo...");
        assert_eq!(derive_title("  hello  "), "hello...");
    }

    #[test]
    fn title_does_not_split_grapheme_clusters() {
        let text = "e\u{301}".repeat(40);
        let title = derive_title(&text);
        assert_eq!(title.graphemes(true).count(), TITLE_MAX_CHARS + 3);
        assert!(title.starts_with("e\u{301}"));
    }

    #[test]
    fn generated_ids_are_distinct_hex() {
        let a = ConversationId::generate();
        let b = ConversationId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn clock_fallback_ids_do_not_collide() {
        let a = ConversationId::from_bytes(&clock_id_bytes());
        let b = ConversationId::from_bytes(&clock_id_bytes());
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn register_prepends_and_touch_moves_to_front() {
        let now = Utc::now();
        let mut registry = ConversationRegistry::new();
        registry.register(ConversationSummary::new("a".into(), "A", now));
        registry.register(ConversationSummary::new("b".into(), "B", now));
        assert_eq!(registry.nth(0).unwrap().title, "B");

        let later = now + Duration::minutes(5);
        assert!(registry.touch(&"a".into(), later));
        assert_eq!(registry.nth(0).unwrap().title, "A");
        assert_eq!(registry.nth(0).unwrap().updated_at, later);
        assert_eq!(registry.len(), 2);
        assert!(!registry.touch(&"missing".into(), later));
    }

    #[test]
    fn register_replaces_duplicate_ids() {
        let now = Utc::now();
        let mut registry = ConversationRegistry::new();
        registry.register(ConversationSummary::new("a".into(), "First", now));
        registry.register(ConversationSummary::new("a".into(), "Second", now));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&"a".into()).unwrap().title, "Second");
    }

    #[test]
    fn archive_ignores_empty_histories() {
        let ids = IdSource::new();
        let mut archive = TranscriptArchive::new();
        let conversation: ConversationId = "c".into();
        assert!(archive.messages(&conversation).is_none());
        archive.append(&conversation, Message::user(ids.next_id(), "hi"));
        assert_eq!(archive.messages(&conversation).unwrap().len(), 1);
    }
}
