//! Localization: dictionary lookup and the per-language resume data set.
//!
//! Dictionaries are nested JSON objects addressed with dot-separated keys
//! (`chat.quick.skills`). Lookups fall back to English, then to the caller's
//! fallback, then to the raw key.

mod resume;

pub use resume::{Certification, Education, Experience, Project, Resume};

use crate::storage::KeyValueStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Storage key for the selected language.
pub const LOCALE_KEY: &str = "portfolio.locale";

/// Locale store shared between the session manager and the renderers.
pub type SharedLocale = Arc<RwLock<LocaleStore>>;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Fr, Locale::Ar];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Ar => "ar",
        }
    }

    /// Parse a language code or a POSIX-style tag such as `fr_FR.UTF-8`.
    pub fn from_code(tag: &str) -> Option<Self> {
        let language = tag
            .trim()
            .split(|c| c == '.' || c == '_' || c == '-' || c == '@')
            .next()?
            .to_lowercase();

        match language.as_str() {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Locale::Ar => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    fn dictionary_source(&self) -> &'static str {
        match self {
            Locale::En => include_str!("../../locales/en.json"),
            Locale::Fr => include_str!("../../locales/fr.json"),
            Locale::Ar => include_str!("../../locales/ar.json"),
        }
    }

    fn resume_source(&self) -> &'static str {
        match self {
            Locale::En => include_str!("../../data/cv.en.json"),
            Locale::Fr => include_str!("../../data/cv.fr.json"),
            Locale::Ar => include_str!("../../data/cv.ar.json"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Locale::from_code(s).ok_or_else(|| Error::UnknownLocale(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Active language, its dictionaries and resume data sets.
pub struct LocaleStore {
    locale: Locale,
    dictionaries: HashMap<Locale, Value>,
    resumes: HashMap<Locale, Resume>,
    default_resume: Resume,
    storage: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleStore")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl LocaleStore {
    /// Load the embedded dictionaries and pick the initial language.
    ///
    /// Order: `configured`, then the stored choice, then the process
    /// environment (`LC_ALL`, `LC_MESSAGES`, `LANG`), then English.
    pub fn load(storage: Arc<dyn KeyValueStore>, configured: Option<Locale>) -> Result<Self> {
        let mut dictionaries = HashMap::new();
        let mut resumes = HashMap::new();
        for locale in Locale::ALL {
            dictionaries.insert(locale, serde_json::from_str(locale.dictionary_source())?);
            if locale != Locale::En {
                resumes.insert(locale, Resume::from_json(locale.resume_source())?);
            }
        }
        let default_resume = Resume::from_json(Locale::En.resume_source())?;

        let locale = configured
            .or_else(|| storage.get(LOCALE_KEY).and_then(|code| Locale::from_code(&code)))
            .or_else(detect_locale)
            .unwrap_or_default();

        let store = Self {
            locale,
            dictionaries,
            resumes,
            default_resume,
            storage,
        };
        store.persist();

        tracing::debug!("Locale store initialized with '{}'", locale);
        Ok(store)
    }

    /// Wrap in the shared handle used across the application.
    pub fn into_shared(self) -> SharedLocale {
        Arc::new(RwLock::new(self))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn direction(&self) -> TextDirection {
        self.locale.direction()
    }

    /// Switch the active language. No-op when unchanged.
    pub fn set_locale(&mut self, locale: Locale) {
        if self.locale == locale {
            return;
        }
        self.locale = locale;
        self.persist();
        tracing::info!("Locale changed to: {}", locale);
    }

    /// Resolve `key` to a display string.
    pub fn t(&self, key: &str, fallback: Option<&str>) -> String {
        let segments: Vec<&str> = key.split('.').collect();

        let primary = self
            .dictionaries
            .get(&self.locale)
            .and_then(|dict| resolve_text(dict, &segments));
        let resolved = primary.or_else(|| {
            if self.locale == Locale::En {
                return None;
            }
            self.dictionaries
                .get(&Locale::En)
                .and_then(|dict| resolve_text(dict, &segments))
        });

        resolved
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolve `key` and substitute `{name}` placeholders.
    pub fn format(&self, key: &str, fallback: Option<&str>, params: &[(&str, &str)]) -> String {
        let mut value = self.t(key, fallback);
        for (param, replacement) in params {
            value = value.replace(&format!("{{{param}}}"), replacement);
        }
        value
    }

    /// Every supported language with its display label.
    pub fn available_locales(&self) -> Vec<(Locale, String)> {
        Locale::ALL
            .iter()
            .map(|&code| {
                let label = self
                    .dictionaries
                    .get(&code)
                    .and_then(|dict| resolve_text(dict, &["locale", "label"]))
                    .unwrap_or_else(|| code.code().to_uppercase());
                (code, label)
            })
            .collect()
    }

    /// Resume data set for the active language.
    pub fn cv(&self) -> &Resume {
        self.resumes
            .get(&self.locale)
            .unwrap_or(&self.default_resume)
    }

    fn persist(&self) {
        if let Err(e) = self.storage.set(LOCALE_KEY, self.locale.code()) {
            tracing::warn!("Failed to persist locale: {}", e);
        }
    }
}

fn resolve_text(dictionary: &Value, path: &[&str]) -> Option<String> {
    let mut current = dictionary;
    for segment in path {
        current = current.as_object()?.get(*segment)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn detect_locale() -> Option<Locale> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .and_then(|value| Locale::from_code(&value))
}
