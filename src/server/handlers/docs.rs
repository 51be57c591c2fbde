use axum::Json;
use serde::Serialize;

use crate::content::{page, Page};
use crate::i18n::Language;
use crate::server::context::ViewContext;
use crate::server::error::AppError;

/// Response for GET /api/docs.
#[derive(Debug, Serialize)]
pub struct DocsResponse {
    heading: &'static str,
    pages: Vec<DocEntry>,
}

#[derive(Debug, Serialize)]
pub struct DocEntry {
    id: String,
    title: String,
    /// Plain-text summary of the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    href: String,
    only_for_admin: bool,
}

impl DocEntry {
    fn new(page: &Page, language: Language) -> Self {
        let summary = super::localized_doc(
            language,
            page.description_doc(),
            page.description_native_doc(),
        )
        .map(|doc| doc.plain_text())
        .filter(|text| !text.trim().is_empty());

        Self {
            id: page.id.clone(),
            title: language
                .pick(&page.title, page.title_native.as_deref())
                .to_string(),
            summary,
            href: format!("/{}", page.slug),
            only_for_admin: page.only_for_admin,
        }
    }
}

/// Handle GET /api/docs: root pages, newest first.
pub async fn list_docs(ctx: ViewContext) -> Result<Json<DocsResponse>, AppError> {
    let pages = page::list_docs(&ctx.store, ctx.audience())
        .await
        .map_err(|e| AppError::failed(ctx.strings.load_page_failed, e))?;

    Ok(Json(DocsResponse {
        heading: ctx.strings.docs_heading,
        pages: pages
            .iter()
            .map(|page| DocEntry::new(page, ctx.language))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::Document;

    #[test]
    fn test_doc_entry_summary_from_rich_text() {
        let page = Page {
            id: "1".to_string(),
            title: "Intro".to_string(),
            slug: "intro".to_string(),
            description: Some(Document::plain("First steps").to_json_string().unwrap()),
            description_native: Some("առաջին քայլեր".to_string()),
            ..Page::default()
        };

        let en = DocEntry::new(&page, Language::English);
        assert_eq!(en.summary.as_deref(), Some("First steps"));
        assert_eq!(en.href, "/intro");

        let native = DocEntry::new(&page, Language::Native);
        assert_eq!(native.summary.as_deref(), Some("առաջին քայլեր"));
        assert_eq!(native.title, "Intro");
    }

    #[test]
    fn test_doc_entry_without_description() {
        let page = Page {
            id: "1".to_string(),
            title: "Intro".to_string(),
            slug: "intro".to_string(),
            ..Page::default()
        };
        let json = serde_json::to_value(DocEntry::new(&page, Language::English)).unwrap();
        assert!(json.get("summary").is_none());
    }
}
