//! Internationalization (i18n) for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: English plus the configured native language and their metadata
//! - `language`: the display language and the English/native fallback rule
//! - `strings`: fixed user-facing strings produced by the server itself
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Language, LanguageRegistry};
//!
//! let registry = LanguageRegistry::new("hy")?;
//! let lang = Language::from_code("native", &registry)?;
//! let title = lang.pick(&page.title, page.title_native.as_deref());
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{LanguageStrings, ENGLISH_STRINGS};
