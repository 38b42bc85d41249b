//! Light/dark theme mode.

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the theme mode.
pub const THEME_KEY: &str = "portfolio.theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Dictionary key of the mode's display name
    pub fn label_key(&self) -> &'static str {
        match self {
            ThemeMode::Light => "theme.light",
            ThemeMode::Dark => "theme.dark",
        }
    }
}

/// Current theme mode, persisted on every change.
pub struct ThemeState {
    mode: ThemeMode,
    storage: Arc<dyn KeyValueStore>,
}

impl ThemeState {
    /// Restore the stored mode, defaulting to dark.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let mode = storage
            .get(THEME_KEY)
            .and_then(|value| ThemeMode::parse(&value))
            .unwrap_or_default();
        Self { mode, storage }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.mode = mode;
        if let Err(e) = self.storage.set(THEME_KEY, mode.as_str()) {
            tracing::warn!("Failed to persist theme mode: {}", e);
        }
        tracing::debug!("Theme mode set to {}", mode.as_str());
    }

    /// Flip between light and dark, returning the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        let next = self.mode.toggled();
        self.set_mode(next);
        next
    }
}
