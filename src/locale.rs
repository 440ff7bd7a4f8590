//! Supported languages and the chat screen's localized strings
//!
//! The language is process-wide and user-settable at any time. Components
//! never read it ambiently: callers pass the current [`Language`] into every
//! operation that needs locale-specific text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::watch;

/// Closed set of supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

/// Reading direction of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

#[derive(Debug, Error)]
#[error("unsupported language code: {0}")]
pub struct LocaleError(pub String);

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Ar => TextDirection::Rtl,
        }
    }

    /// Strings rendered by the chat screen in this language
    pub fn chat_strings(self) -> &'static ChatStrings {
        match self {
            Language::En => &EN_CHAT,
            Language::Ar => &AR_CHAT,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or(LocaleError(code))
    }
}

/// Localized text for the chat screen
#[derive(Debug, Clone, Serialize)]
pub struct ChatStrings {
    pub title: &'static str,
    pub placeholder: &'static str,
    /// Seeded as the first assistant message of every session
    pub welcome: &'static str,
    pub suggestions: [&'static str; 2],
}

static EN_CHAT: ChatStrings = ChatStrings {
    title: "Mindro Assistant",
    placeholder: "Type your message...",
    welcome: "Hello! I'm Mindro-V1, your companion. How can I help you today?",
    suggestions: ["Where am I?", "What should I do today?"],
};

static AR_CHAT: ChatStrings = ChatStrings {
    title: "مساعد مايندرو",
    placeholder: "اكتب رسالتك...",
    welcome: "مرحباً! أنا Mindro-V1، رفيقك. كيف يمكنني مساعدتك اليوم؟",
    suggestions: ["أين أنا؟", "ماذا يجب أن أفعل اليوم؟"],
};

/// Process-wide language selection
///
/// Backed by a `watch` channel so readers always see the latest value
/// without holding a lock across an await.
#[derive(Debug, Clone)]
pub struct LanguageSelector {
    tx: watch::Sender<Language>,
}

impl LanguageSelector {
    pub fn new(initial: Language) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Language {
        *self.tx.borrow()
    }

    /// Set the active language, returning the previous one
    pub fn set(&self, language: Language) -> Language {
        self.tx.send_replace(language)
    }

    #[allow(dead_code)] // API completeness
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.tx.subscribe()
    }
}

impl Default for LanguageSelector {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
