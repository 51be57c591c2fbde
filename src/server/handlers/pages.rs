//! Page and section view endpoints.
//!
//! Unknown slugs never produce an error page: the visitor is sent somewhere
//! safe instead (the landing page, the owning page, or the login page for
//! admin-only content).

use axum::extract::Path;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use super::localized_html;
use crate::content::{page, section, Page, Section};
use crate::i18n::Language;
use crate::server::context::ViewContext;
use crate::server::error::AppError;

/// Response for GET /api/pages/:page_slug.
#[derive(Debug, Serialize)]
pub struct PageView {
    id: String,
    title: String,
    slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description_html: Option<String>,
    only_for_admin: bool,
    sections: Vec<SectionView>,
}

/// A section rendered for display.
#[derive(Debug, Serialize)]
pub struct SectionView {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    slug: String,
    href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_html: Option<String>,
}

impl SectionView {
    fn new(section: &Section, page_slug: &str, language: Language) -> Self {
        Self {
            id: section.id.clone(),
            title: language
                .pick(&section.title, section.title_native.as_deref())
                .to_string(),
            description: language
                .pick_opt(
                    section.description.as_deref(),
                    section.description_native.as_deref(),
                )
                .map(str::to_string),
            slug: section.slug.clone(),
            href: section.href(page_slug),
            image_url: section.image_url.clone(),
            content_html: localized_html(
                language,
                section.content_doc(),
                section.content_native_doc(),
            ),
        }
    }
}

/// Response for GET /api/pages/:page_slug/sections/:section_slug.
#[derive(Debug, Serialize)]
pub struct SectionPageView {
    page_title: String,
    page_href: String,
    section: SectionView,
}

enum Lookup {
    Found(Page),
    Redirect(&'static str),
}

/// Resolve a page slug for the viewer, or where to send them instead.
async fn lookup_page(ctx: &ViewContext, slug: &str) -> Result<Lookup, AppError> {
    let found = page::fetch_by_slug(&ctx.store, slug)
        .await
        .map_err(|e| AppError::failed(ctx.strings.load_page_failed, e))?;

    Ok(match found {
        None => Lookup::Redirect("/"),
        Some(page) if !ctx.audience().can_see(&page) => Lookup::Redirect("/login"),
        Some(page) => Lookup::Found(page),
    })
}

/// Handle GET /api/pages/:page_slug.
pub async fn get_page(
    ctx: ViewContext,
    Path(page_slug): Path<String>,
) -> Result<Response, AppError> {
    let page = match lookup_page(&ctx, &page_slug).await? {
        Lookup::Found(page) => page,
        Lookup::Redirect(to) => return Ok(Redirect::temporary(to).into_response()),
    };

    let sections = section::list_for_page(&ctx.store, &page.id)
        .await
        .map_err(|e| AppError::failed(ctx.strings.load_sections_failed, e))?;

    let language = ctx.language;
    let view = PageView {
        title: language
            .pick(&page.title, page.title_native.as_deref())
            .to_string(),
        description_html: localized_html(
            language,
            page.description_doc(),
            page.description_native_doc(),
        ),
        sections: sections
            .iter()
            .map(|s| SectionView::new(s, &page.slug, language))
            .collect(),
        id: page.id,
        slug: page.slug,
        only_for_admin: page.only_for_admin,
    };
    Ok(Json(view).into_response())
}

/// Handle GET /api/pages/:page_slug/sections/:section_slug.
pub async fn get_section(
    ctx: ViewContext,
    Path((page_slug, section_slug)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let page = match lookup_page(&ctx, &page_slug).await? {
        Lookup::Found(page) => page,
        Lookup::Redirect(to) => return Ok(Redirect::temporary(to).into_response()),
    };

    let found = section::fetch_by_slug(&ctx.store, &page.id, &section_slug)
        .await
        .map_err(|e| AppError::failed(ctx.strings.load_sections_failed, e))?;
    let Some(section) = found else {
        return Ok(Redirect::temporary(&format!("/{}", page.slug)).into_response());
    };

    let language = ctx.language;
    Ok(Json(SectionPageView {
        page_title: language
            .pick(&page.title, page.title_native.as_deref())
            .to_string(),
        page_href: format!("/{}", page.slug),
        section: SectionView::new(&section, &page.slug, language),
    })
    .into_response())
}
