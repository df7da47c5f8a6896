use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://general-runtime.voiceflow.com";
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 800;

/// Keys accepted by `colloquy set` / `colloquy unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "base-url",
    "version-id",
    "display-name",
    "email",
    "mock-delay-ms",
    "login-delay-ms",
];

#[derive(Debug)]
pub enum ConfigError {
    UnknownKey(String),
    InvalidValue { key: String, value: String },
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                CONFIG_KEYS.join(", ")
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value}")
            }
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dialogue service root, e.g. "https://general-runtime.voiceflow.com"
    pub base_url: Option<String>,
    /// Version selector sent as the `versionID` header
    pub version_id: Option<String>,
    /// Display name used by the simulated login
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Artificial latency of mock-mode replies
    pub mock_delay_ms: Option<u64>,
    /// Artificial latency of the simulated login
    pub login_delay_ms: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn Error>> {
        let config_path = Self::get_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "colloquy", "colloquy").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms.unwrap_or(DEFAULT_MOCK_DELAY_MS))
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms.unwrap_or(DEFAULT_LOGIN_DELAY_MS))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let text = Some(value.to_string()).filter(|v| !v.is_empty());
        let millis = || {
            value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })
        };
        match key {
            "base-url" => self.base_url = text,
            "version-id" => self.version_id = text,
            "display-name" => self.display_name = text,
            "email" => self.email = text,
            "mock-delay-ms" => self.mock_delay_ms = Some(millis()?),
            "login-delay-ms" => self.login_delay_ms = Some(millis()?),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "base-url" => self.base_url = None,
            "version-id" => self.version_id = None,
            "display-name" => self.display_name = None,
            "email" => self.email = None,
            "mock-delay-ms" => self.mock_delay_ms = None,
            "login-delay-ms" => self.login_delay_ms = None,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn print_all(&self) {
        fn show(value: Option<&str>) -> &str {
            value.unwrap_or("(unset)")
        }
        println!("Current configuration:");
        println!("  base-url: {}", self.base_url());
        println!("  version-id: {}", show(self.version_id.as_deref()));
        println!("  display-name: {}", show(self.display_name.as_deref()));
        println!("  email: {}", show(self.email.as_deref()));
        println!("  mock-delay-ms: {}", self.mock_delay().as_millis());
        println!("  login-delay-ms: {}", self.login_delay().as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nonexistent_config.toml");

        let config = Config::load_from_path(&config_path).expect("Failed to load config");

        assert_eq!(config, Config::default());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.mock_delay(), Duration::from_millis(DEFAULT_MOCK_DELAY_MS));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("base-url", "https://dialogue.internal").unwrap();
        config.set("version-id", "development").unwrap();
        config.set("mock-delay-ms", "25").unwrap();
        config.save_to_path(&config_path).expect("Failed to save config");

        let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
        assert_eq!(loaded, config);
        assert_eq!(loaded.base_url(), "https://dialogue.internal");
        assert_eq!(loaded.mock_delay(), Duration::from_millis(25));
    }

    #[test]
    fn test_unknown_and_invalid_keys() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("api-key", "secret"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("mock-delay-ms", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.unset("theme").is_err());
    }

    #[test]
    fn test_unset_clears_value() {
        let mut config = Config::default();
        config.set("email", "sam@example.com").unwrap();
        config.unset("email").unwrap();
        assert_eq!(config.email, None);
    }
}
