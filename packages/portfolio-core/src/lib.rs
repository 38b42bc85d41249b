//! Portfolio Core - resume data, localization and the chat session manager.
//!
//! This crate provides everything the portfolio front end reads from or
//! sends intents to:
//!
//! - **Locale store**: nested dictionary lookup with English fallback, plus
//!   the resume data set for the active language
//! - **Chat session**: message log, visibility, unread count and the
//!   single-flight reply request, persisted across runs
//! - **Theme and navigation**: light/dark mode and the header-to-content
//!   view channel
//! - **Storage and config**: client-local key/value snapshots and TOML config
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::{Arc, RwLock};
//! use portfolio_core::{HttpReplyClient, LocaleStore, MemoryStore, Pacing, SessionManager};
//!
//! # async fn run() -> portfolio_core::Result<()> {
//! let storage = Arc::new(MemoryStore::new());
//! let locale = Arc::new(RwLock::new(LocaleStore::load(storage.clone(), None)?));
//! let client = Arc::new(HttpReplyClient::new(portfolio_core::config::DEFAULT_CHAT_API_URL, None)?);
//!
//! let session = SessionManager::new(storage, client, locale, Pacing::default());
//! session.send("What are your main skills?").await;
//! println!("{} messages", session.messages().len());
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod config;
pub mod locale;
pub mod nav;
pub mod storage;
pub mod theme;

// Re-export commonly used types
pub use chat::{
    ChatMessage, ChatRole, HttpReplyClient, Pacing, QuickTopic, RawReply, ReplyOutcome,
    ReplyTransport, SessionEvent, SessionManager, SessionState,
};
pub use config::Config;
pub use locale::{
    Certification, Education, Experience, Locale, LocaleStore, Project, Resume, SharedLocale,
    TextDirection,
};
pub use nav::{ContentView, ContentViewState, NavItem, Navigator};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use theme::{ThemeMode, ThemeState};

/// Error types for portfolio-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Unknown quick topic: {0}")]
    UnknownTopic(String),

    #[error("Unknown navigation item: {0}")]
    UnknownNavItem(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for portfolio-core operations.
pub type Result<T> = std::result::Result<T, Error>;
