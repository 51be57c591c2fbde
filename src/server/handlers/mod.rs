//! HTTP handlers.

pub mod admin;
pub mod auth;
pub mod docs;
pub mod hooks;
pub mod navigation;
pub mod pages;
pub mod portfolio;
pub mod ws;

use crate::i18n::Language;
use crate::richtext::{render_html, Document};

/// Pick the document for the display language and render it.
///
/// Same rule as for plain text fields: the native document is used only when
/// it exists and has content.
pub(crate) fn localized_html(
    language: Language,
    english: Option<Document>,
    native: Option<Document>,
) -> Option<String> {
    localized_doc(language, english, native).map(|doc| render_html(&doc))
}

pub(crate) fn localized_doc(
    language: Language,
    english: Option<Document>,
    native: Option<Document>,
) -> Option<Document> {
    match (language, native) {
        (Language::Native, Some(doc)) if !doc.is_empty() => Some(doc),
        _ => english,
    }
}
