use std::time::Duration;

use tracing::info;

use crate::core::conversation::ConversationId;

/// Identity of the signed-in staff member. Display purposes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Build a profile from login form values.
    ///
    /// The id is the alphanumeric part of the email's local part, lowercased;
    /// a blank display name falls back to the local part as typed.
    pub fn from_credentials(display_name: &str, email: &str) -> Self {
        let email = email.trim();
        let local_part = email.split('@').next().unwrap_or_default();
        let mut id: String = local_part
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if id.is_empty() {
            id = format!("user{}", &ConversationId::generate().as_str()[..8]);
        }

        let display_name = match display_name.trim() {
            "" if local_part.is_empty() => id.clone(),
            "" => local_part.to_string(),
            name => name.to_string(),
        };

        Self {
            id,
            display_name,
            email: email.to_string(),
            avatar: None,
        }
    }

    /// Two-letter monogram shown in place of an avatar image.
    pub fn initials(&self) -> String {
        self.display_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Simulated sign-in: waits `delay`, then accepts any credentials.
pub async fn login(display_name: &str, email: &str, delay: Duration) -> UserProfile {
    tokio::time::sleep(delay).await;
    let profile = UserProfile::from_credentials(display_name, email);
    info!(user = %profile.id, "signed in");
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_comes_from_email_local_part() {
        let profile = UserProfile::from_credentials("Sam Rivera", "Sam.Rivera@example.com");
        assert_eq!(profile.id, "samrivera");
        assert_eq!(profile.display_name, "Sam Rivera");
        assert_eq!(profile.initials(), "SR");
        assert_eq!(profile.avatar, None);
    }

    #[test]
    fn blank_display_name_uses_local_part() {
        let profile = UserProfile::from_credentials("  ", "ops@example.com");
        assert_eq!(profile.display_name, "ops");
    }

    #[test]
    fn missing_email_still_yields_an_id() {
        let profile = UserProfile::from_credentials("Guest", "");
        assert!(profile.id.starts_with("user"));
        assert_eq!(profile.id.len(), 12);
    }

    #[tokio::test]
    async fn login_waits_for_the_artificial_delay() {
        let started = std::time::Instant::now();
        let profile = login("Sam", "sam@example.com", Duration::from_millis(20)).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(profile.id, "sam");
    }
}
