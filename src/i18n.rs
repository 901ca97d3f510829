use std::fmt;
use std::str::FromStr;

use actix_session::Session;
use serde::{Deserialize, Serialize};

/// Session key holding the visitor's last language choice.
pub const SESSION_KEY: &str = "language";

/// Display languages supported by the public pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fa => "fa",
        }
    }

    /// Text direction for the `dir` attribute.
    pub fn dir(self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::Fa => "rtl",
        }
    }

    /// The other supported language, used by the language switcher.
    pub fn other(self) -> Language {
        match self {
            Language::En => Language::Fa,
            Language::Fa => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "fa" => Ok(Language::Fa),
            _ => Err(()),
        }
    }
}

/// Pick the display language: an explicit supported value wins, then a
/// supported value remembered in the session, then English.
pub fn resolve(explicit: Option<&str>, stored: Option<&str>) -> Language {
    explicit
        .and_then(|code| code.parse().ok())
        .or_else(|| stored.and_then(|code| code.parse().ok()))
        .unwrap_or_default()
}

/// Resolve the request language and remember it for the next request.
pub fn resolve_language(session: &Session, explicit: Option<&str>) -> Language {
    let stored = session.get::<String>(SESSION_KEY).unwrap_or(None);
    let lang = resolve(explicit, stored.as_deref());
    if stored.as_deref() != Some(lang.code()) {
        if let Err(e) = session.insert(SESSION_KEY, lang.code()) {
            log::warn!("Failed to store language in session: {e}");
        }
    }
    lang
}

/// An English value paired with its Farsi counterpart.
///
/// Each side stands alone: an empty Farsi value is shown as empty, never
/// replaced by the English one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: T,
    pub fa: T,
}

impl<T> Localized<T> {
    pub fn new(en: T, fa: T) -> Self {
        Self { en, fa }
    }

    pub fn resolve(&self, lang: Language) -> &T {
        match lang {
            Language::En => &self.en,
            Language::Fa => &self.fa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_supported_language_wins() {
        assert_eq!(resolve(Some("fa"), None), Language::Fa);
        assert_eq!(resolve(Some("en"), Some("fa")), Language::En);
    }

    #[test]
    fn session_value_used_when_param_missing_or_unsupported() {
        assert_eq!(resolve(None, Some("fa")), Language::Fa);
        assert_eq!(resolve(Some("xx"), Some("fa")), Language::Fa);
        assert_eq!(resolve(Some(""), Some("fa")), Language::Fa);
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(resolve(Some("xx"), None), Language::En);
        assert_eq!(resolve(None, Some("de")), Language::En);
        assert_eq!(resolve(None, None), Language::En);
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert!("FA".parse::<Language>().is_err());
        assert_eq!("fa".parse::<Language>(), Ok(Language::Fa));
    }

    #[test]
    fn localized_pair_has_no_cross_language_fallback() {
        let title = Localized::new("Jane".to_string(), String::new());
        assert_eq!(title.resolve(Language::En), "Jane");
        assert_eq!(title.resolve(Language::Fa), "");
    }
}
