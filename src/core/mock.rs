//! Sample data standing in for a persistence backend.

use chrono::{DateTime, Duration, Utc};

use crate::core::conversation::{ConversationId, ConversationSummary};

/// Shown when switching to a conversation with no messages from this session.
pub const PLACEHOLDER_HISTORY: &str =
    "Earlier messages from this conversation are not available in this session. \
Send a message to continue it.";

const SAMPLE_CONVERSATIONS: &[(&str, i64)] = &[
    ("Expense policy for conference travel", 2),
    ("VPN setup on a new laptop", 26),
    ("Quarterly report template", 24 * 6),
];

/// Conversations seeded into the registry after sign-in, newest first.
pub fn sample_conversations(now: DateTime<Utc>) -> Vec<ConversationSummary> {
    SAMPLE_CONVERSATIONS
        .iter()
        .map(|(title, hours_ago)| {
            ConversationSummary::new(
                ConversationId::generate(),
                *title,
                now - Duration::hours(*hours_ago),
            )
        })
        .collect()
}
