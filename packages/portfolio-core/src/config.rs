//! Configuration loaded from TOML with environment overrides.
//!
//! Default path: `<config dir>/portfolio/config.toml`. A missing file yields
//! the defaults. Environment variables win over file values:
//!
//! - `PORTFOLIO_CHAT_API_URL`: reply endpoint
//! - `PORTFOLIO_DATA_DIR`: directory holding the storage snapshot
//! - `PORTFOLIO_LOCALE`: initial language code

use crate::chat::Pacing;
use crate::locale::Locale;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CHAT_API_URL: &str = "https://khalid-bot-api-ke22.vercel.app/api/chat";

pub const ENV_CHAT_API_URL: &str = "PORTFOLIO_CHAT_API_URL";
pub const ENV_DATA_DIR: &str = "PORTFOLIO_DATA_DIR";
pub const ENV_LOCALE: &str = "PORTFOLIO_LOCALE";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Language code forced at startup (overrides the stored choice)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the storage snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    /// Reply endpoint address
    pub api_url: String,
    /// Transport timeout; none means wait for the transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Randomized pacing delays around the reply request
    pub pacing: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_CHAT_API_URL.to_string(),
            timeout_secs: None,
            pacing: true,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("portfolio.toml"))
    }

    /// Load from `path` (or the default path) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        let mut config = Self::load_from_path(&path)?;
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config file without overrides; a missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`Config::load`]). Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(ENV_CHAT_API_URL) {
            self.chat.api_url = url.trim().to_string();
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.storage.dir = Some(PathBuf::from(dir));
        }
        if let Some(locale) = get(ENV_LOCALE) {
            self.locale = Some(locale.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chat.api_url.trim().is_empty() {
            return Err(Error::InvalidConfig("chat.api_url is empty".to_string()));
        }
        if self.chat.timeout_secs == Some(0) {
            return Err(Error::InvalidConfig(
                "chat.timeout_secs must be positive".to_string(),
            ));
        }
        self.configured_locale()?;
        Ok(())
    }

    /// The configured locale, if any.
    pub fn configured_locale(&self) -> Result<Option<Locale>> {
        match self.locale.as_deref() {
            Some(code) => Locale::from_code(code)
                .map(Some)
                .ok_or_else(|| Error::InvalidConfig(format!("unsupported locale '{}'", code))),
            None => Ok(None),
        }
    }

    /// Directory holding the storage snapshot.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.dir {
            return dir.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".portfolio"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.chat.timeout_secs.map(Duration::from_secs)
    }

    pub fn pacing(&self) -> Pacing {
        if self.chat.pacing {
            Pacing::default()
        } else {
            Pacing::none()
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "elbouari", "portfolio")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.chat.api_url, DEFAULT_CHAT_API_URL);
        assert!(config.chat.pacing);
    }

    #[test]
    fn test_parse_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
locale = "fr"

[storage]
dir = "/tmp/portfolio-data"

[chat]
api_url = "http://localhost:8787/api/chat"
timeout_secs = 20
pacing = false
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.configured_locale().unwrap(), Some(Locale::Fr));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/portfolio-data"));
        assert_eq!(config.chat.api_url, "http://localhost:8787/api/chat");
        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.pacing(), Pacing::none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chat]\ntimeout_secs = 5\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.chat.api_url, DEFAULT_CHAT_API_URL);
        assert!(config.chat.pacing);
        assert!(config.locale.is_none());
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let mut config = Config {
            locale: Some("en".to_string()),
            ..Default::default()
        };
        let vars: HashMap<&str, &str> = [
            (ENV_CHAT_API_URL, " http://127.0.0.1:9000/chat "),
            (ENV_DATA_DIR, "/var/lib/portfolio"),
            (ENV_LOCALE, "ar"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.chat.api_url, "http://127.0.0.1:9000/chat");
        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/portfolio"));
        assert_eq!(config.configured_locale().unwrap(), Some(Locale::Ar));
    }

    #[test]
    fn test_blank_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_CHAT_API_URL).then(|| "   ".to_string()));
        assert_eq!(config.chat.api_url, DEFAULT_CHAT_API_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.chat.timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.locale = Some("de".to_string());
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.chat.api_url = String::new();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
