//! Display language: which variant of a bilingual text field to show.
//!
//! Every localized field in the content store comes in pairs (`title` /
//! `title_native`). The display language selects between them, falling back to
//! English whenever the native variant is missing or empty.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// The language a visitor reads the site in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Canonical language; every text field has an English value.
    #[default]
    English,
    /// The configured native language; fields may lack a native value.
    Native,
}

impl Language {
    /// Parse a language selector.
    ///
    /// Accepts the symbolic names (`english`, `native`) as well as the ISO
    /// codes of the two languages configured in `registry`.
    ///
    /// # Example
    /// ```ignore
    /// let lang = Language::from_code("hy", &registry)?;
    /// assert_eq!(lang, Language::Native);
    /// ```
    pub fn from_code(code: &str, registry: &LanguageRegistry) -> Result<Language> {
        let code = code.trim().to_ascii_lowercase();
        match code.as_str() {
            "english" => Ok(Language::English),
            "native" => Ok(Language::Native),
            c if c == registry.english().code => Ok(Language::English),
            c if c == registry.native().code => Ok(Language::Native),
            "" => bail!("Empty language code"),
            _ => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Get the full language configuration from the registry.
    pub fn config(&self, registry: &LanguageRegistry) -> &'static LanguageConfig {
        match self {
            Language::English => registry.english(),
            Language::Native => registry.native(),
        }
    }

    /// Choose between the English and native variant of a text field.
    ///
    /// The native value wins only when this is the native language and the
    /// value is present and non-empty.
    pub fn pick<'a>(&self, english: &'a str, native: Option<&'a str>) -> &'a str {
        match (self, native) {
            (Language::Native, Some(value)) if !value.is_empty() => value,
            _ => english,
        }
    }

    /// Same as [`Language::pick`] for fields whose English value is optional.
    pub fn pick_opt<'a>(&self, english: Option<&'a str>, native: Option<&'a str>) -> Option<&'a str> {
        match (self, native) {
            (Language::Native, Some(value)) if !value.is_empty() => Some(value),
            _ => english,
        }
    }
}
