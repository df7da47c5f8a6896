use std::fmt;

pub const DEFAULT_VERSION_ID: &str = "production";

/// Connection settings collected from the user for this session.
///
/// Held in memory only; the credential is never written to the config file.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub version_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            version_id: DEFAULT_VERSION_ID.to_string(),
        }
    }
}

impl Settings {
    /// Build settings, treating blank values as unset.
    pub fn new(api_key: Option<String>, version_id: Option<String>) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let version_id = version_id
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERSION_ID.to_string());
        Self {
            api_key,
            version_id,
        }
    }

    pub fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn with_api_key(&self, api_key: Option<String>) -> Self {
        Self::new(api_key, Some(self.version_id.clone()))
    }

    pub fn with_version_id(&self, version_id: Option<String>) -> Self {
        Self::new(self.api_key.clone(), version_id)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("version_id", &self.version_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = Settings::new(Some("   ".into()), Some("".into()));
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.version_id, DEFAULT_VERSION_ID);
        assert!(!settings.is_live());
    }

    #[test]
    fn debug_output_redacts_credential() {
        let settings = Settings::new(Some("VF.DM.secret".into()), None);
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn builders_keep_the_other_field() {
        let settings = Settings::new(Some("key".into()), Some("development".into()));
        let cleared = settings.with_api_key(None);
        assert_eq!(cleared.version_id, "development");
        let moved = settings.with_version_id(None);
        assert_eq!(moved.api_key.as_deref(), Some("key"));
        assert_eq!(moved.version_id, DEFAULT_VERSION_ID);
    }
}
