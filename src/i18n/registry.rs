//! Language registry: the English canonical language plus one native language.
//!
//! The site is bilingual. English is always the canonical language; the native
//! language is chosen at startup (`NATIVE_LANGUAGE_CODE`) from the set of
//! known languages below. The registry is an ordinary value held by the
//! application state and passed where needed, not a process-wide singleton.

use anyhow::{bail, Result};

/// Metadata for a known language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "hy")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Armenian")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "հայերեն")
    pub native_name: &'static str,
}

const ENGLISH: LanguageConfig = LanguageConfig {
    code: "en",
    name: "English",
    native_name: "English",
};

/// Languages that can be configured as the native language.
const KNOWN_NATIVE_LANGUAGES: &[LanguageConfig] = &[
    LanguageConfig {
        code: "hy",
        name: "Armenian",
        native_name: "հայերեն",
    },
    LanguageConfig {
        code: "es",
        name: "Spanish",
        native_name: "Español",
    },
    LanguageConfig {
        code: "ru",
        name: "Russian",
        native_name: "Русский",
    },
    LanguageConfig {
        code: "fr",
        name: "French",
        native_name: "Français",
    },
    LanguageConfig {
        code: "de",
        name: "German",
        native_name: "Deutsch",
    },
];

/// The two languages a site instance serves.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    native: &'static LanguageConfig,
}

impl LanguageRegistry {
    /// Create a registry with the given native language.
    ///
    /// # Returns
    /// * `Ok(LanguageRegistry)` if the code names a known, non-English language
    /// * `Err` otherwise
    pub fn new(native_code: &str) -> Result<Self> {
        let code = native_code.trim().to_ascii_lowercase();
        if code == ENGLISH.code {
            bail!("Native language must differ from English");
        }

        match KNOWN_NATIVE_LANGUAGES.iter().find(|lang| lang.code == code) {
            Some(native) => Ok(Self { native }),
            None => bail!("Unknown native language code: '{}'", native_code),
        }
    }

    /// The canonical (English) language configuration.
    pub fn english(&self) -> &'static LanguageConfig {
        &ENGLISH
    }

    /// The configured native language.
    pub fn native(&self) -> &'static LanguageConfig {
        self.native
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self {
            native: &KNOWN_NATIVE_LANGUAGES[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LanguageStrings, ENGLISH_STRINGS};

    #[test]
    fn test_default_native_is_armenian() {
        let registry = LanguageRegistry::default();
        assert_eq!(registry.native().code, "hy");
        assert_eq!(registry.native().native_name, "հայերեն");
    }

    #[test]
    fn test_new_with_known_code() {
        let registry = LanguageRegistry::new("es").expect("Should succeed");
        assert_eq!(registry.native().name, "Spanish");
    }

    #[test]
    fn test_new_normalizes_case_and_whitespace() {
        let registry = LanguageRegistry::new(" RU ").expect("Should succeed");
        assert_eq!(registry.native().code, "ru");
    }

    #[test]
    fn test_new_rejects_english() {
        let result = LanguageRegistry::new("en");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_unknown() {
        let result = LanguageRegistry::new("xx");
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_every_native_language_has_its_own_strings() {
        for lang in KNOWN_NATIVE_LANGUAGES {
            let registry = LanguageRegistry::new(lang.code).expect("Known language");
            let strings = LanguageStrings::for_code(registry.native().code);
            assert_ne!(
                strings.docs_heading, ENGLISH_STRINGS.docs_heading,
                "{} falls back to English strings",
                lang.code
            );
            assert_ne!(strings.new_stat, ENGLISH_STRINGS.new_stat);
        }
    }
}
