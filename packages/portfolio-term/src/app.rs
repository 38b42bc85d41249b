//! Application root: builds every component once and hands out handles.

use anyhow::{Context, Result};
use portfolio_core::{
    Config, FileStore, HttpReplyClient, KeyValueStore, Locale, LocaleStore, Navigator,
    ReplyTransport, SessionManager, SharedLocale, ThemeState,
};
use std::path::Path;
use std::sync::{Arc, RwLockReadGuard};

pub struct App {
    pub locale: SharedLocale,
    pub theme: ThemeState,
    pub navigator: Navigator,
    pub session: SessionManager,
}

impl App {
    /// Load config and wire components against the HTTP reply client.
    ///
    /// `locale_override` takes precedence over the config file and the
    /// environment.
    pub fn init(config_path: Option<&Path>, locale_override: Option<&str>) -> Result<Self> {
        let mut config = Config::load(config_path).context("Failed to load config")?;
        if let Some(code) = locale_override {
            config.locale = Some(code.to_string());
            config.validate()?;
        }

        let client = HttpReplyClient::new(&config.chat.api_url, config.timeout())?;
        tracing::debug!("Reply endpoint: {}", client.endpoint());

        Self::with_transport(config, Arc::new(client))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn ReplyTransport>) -> Result<Self> {
        let store = FileStore::in_dir(&config.data_dir());
        tracing::debug!("Using storage file {}", store.path().display());
        let storage: Arc<dyn KeyValueStore> = Arc::new(store);

        let locale = LocaleStore::load(storage.clone(), config.configured_locale()?)?.into_shared();
        let theme = ThemeState::load(storage.clone());
        let session = SessionManager::new(storage, transport, locale.clone(), config.pacing());

        Ok(Self {
            locale,
            theme,
            navigator: Navigator::new(),
            session,
        })
    }

    /// Read access to the locale store.
    pub fn locale_store(&self) -> RwLockReadGuard<'_, LocaleStore> {
        self.locale.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_locale(&self, locale: Locale) {
        self.locale
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .set_locale(locale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::{RawReply, Result as CoreResult};
    use serde_json::json;
    use tempfile::TempDir;

    /// Transport that echoes every message back as the reply.
    struct EchoTransport;

    #[async_trait::async_trait]
    impl ReplyTransport for EchoTransport {
        async fn post_message(&self, message: &str) -> CoreResult<RawReply> {
            Ok(RawReply::new(200, Some(json!({ "reply": format!("echo: {message}") }))))
        }
    }

    fn test_app(dir: &TempDir, locale: Option<&str>) -> App {
        let mut config = Config::default();
        config.storage.dir = Some(dir.path().to_path_buf());
        config.chat.pacing = false;
        config.locale = locale.map(str::to_string);
        App::with_transport(config, Arc::new(EchoTransport)).unwrap()
    }

    #[tokio::test]
    async fn test_app_wires_session_to_storage() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir, None);

        app.session.send("hello").await;
        let texts: Vec<String> = app.session.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[2], "echo: hello");

        // A second app over the same directory sees the same history
        let reopened = test_app(&dir, None);
        assert_eq!(reopened.session.messages().len(), 3);
    }

    #[test]
    fn test_configured_locale_applies() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir, Some("fr"));
        assert_eq!(app.locale_store().locale(), Locale::Fr);

        app.set_locale(Locale::Ar);
        let reopened = test_app(&dir, None);
        assert_eq!(reopened.locale_store().locale(), Locale::Ar);
    }

    #[test]
    fn test_theme_survives_restart() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir, None);
        let mode = app.theme.toggle();

        let reopened = test_app(&dir, None);
        assert_eq!(reopened.theme.mode(), mode);
    }
}
