//! Admin CMS endpoints. Every handler requires a signed-in session and talks
//! to the store with the admin's own token.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{
    page, portfolio, section, ContentError, Page, PageForm, PortfolioContent, Section, SectionForm,
};
use crate::i18n::LanguageStrings;
use crate::realtime::{ChangeEvent, ChangeKind};
use crate::richtext::{render_html, Alignment, Document, SizePreset};
use crate::server::context::AdminSession;
use crate::server::error::AppError;
use crate::server::state::AppState;
use crate::store::storage::object_path_for;

fn save_failed(session: &AdminSession) -> impl Fn(ContentError) -> AppError {
    let message = session.ctx.strings.save_failed;
    move |e| AppError::failed(message, e)
}

fn load_failed(session: &AdminSession) -> impl Fn(ContentError) -> AppError {
    let message = session.ctx.strings.load_page_failed;
    move |e| AppError::failed(message, e)
}

/// Local writes refresh the navigation even without a database webhook.
fn announce(state: &AppState, table: &str, kind: ChangeKind) {
    state.feed.publish(ChangeEvent::new(table, kind));
}

// ==================== Pages ====================

/// GET /api/admin/pages
pub async fn list_pages(session: AdminSession) -> Result<Json<Vec<Page>>, AppError> {
    let pages = page::list_admin(&session.ctx.store)
        .await
        .map_err(load_failed(&session))?;
    Ok(Json(pages))
}

#[derive(Debug, Serialize)]
pub struct PageDetail {
    page: Page,
    sections: Vec<Section>,
}

/// GET /api/admin/pages/:id
pub async fn get_page(
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<PageDetail>, AppError> {
    let store = &session.ctx.store;
    let page = page::fetch_by_id(store, &id)
        .await
        .map_err(load_failed(&session))?
        .ok_or(AppError::NotFound("page"))?;
    let sections = section::list_for_page(store, &page.id)
        .await
        .map_err(|e| AppError::failed(session.ctx.strings.load_sections_failed, e))?;
    Ok(Json(PageDetail { page, sections }))
}

/// POST /api/admin/pages
pub async fn create_page(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Json(form): Json<PageForm>,
) -> Result<(StatusCode, Json<Page>), AppError> {
    let page = page::create(&session.ctx.store, form)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "pages", ChangeKind::Insert);
    Ok((StatusCode::CREATED, Json(page)))
}

/// PUT /api/admin/pages/:id
pub async fn update_page(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<String>,
    Json(form): Json<PageForm>,
) -> Result<Json<Page>, AppError> {
    let page = page::update(&session.ctx.store, &id, form)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "pages", ChangeKind::Update);
    Ok(Json(page))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    deleted: Vec<String>,
}

/// DELETE /api/admin/pages/:id, including subpages and sections.
pub async fn delete_page(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let deleted = page::delete_cascade(&session.ctx.store, &id)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "pages", ChangeKind::Delete);
    Ok(Json(Deleted { deleted }))
}

// ==================== Sections ====================

/// POST /api/admin/sections
pub async fn create_section(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Json(form): Json<SectionForm>,
) -> Result<(StatusCode, Json<Section>), AppError> {
    let section = section::create(&session.ctx.store, form)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "sections", ChangeKind::Insert);
    Ok((StatusCode::CREATED, Json(section)))
}

/// PUT /api/admin/sections/:id
pub async fn update_section(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<String>,
    Json(form): Json<SectionForm>,
) -> Result<Json<Section>, AppError> {
    let section = section::update(&session.ctx.store, &id, form)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "sections", ChangeKind::Update);
    Ok(Json(section))
}

/// DELETE /api/admin/sections/:id
pub async fn delete_section(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    section::delete(&session.ctx.store, &id)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "sections", ChangeKind::Delete);
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Portfolio ====================

/// GET /api/admin/portfolio
pub async fn get_portfolio(
    session: AdminSession,
) -> Result<Json<Option<PortfolioContent>>, AppError> {
    let content = portfolio::fetch(&session.ctx.store)
        .await
        .map_err(load_failed(&session))?;
    Ok(Json(content))
}

/// PUT /api/admin/portfolio
pub async fn save_portfolio(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Json(content): Json<PortfolioContent>,
) -> Result<Json<PortfolioContent>, AppError> {
    let saved = portfolio::save(&session.ctx.store, content)
        .await
        .map_err(save_failed(&session))?;
    announce(&state, "portfolio_content", ChangeKind::Update);
    Ok(Json(saved))
}

/// Load the stored row (or an empty one), apply `edit`, save it back.
async fn edit_quick_stats<F>(
    state: &AppState,
    session: &AdminSession,
    edit: F,
) -> Result<Json<PortfolioContent>, AppError>
where
    F: FnOnce(&mut Vec<portfolio::QuickStat>) -> Result<(), ContentError>,
{
    let store = &session.ctx.store;
    let mut content = portfolio::fetch(store)
        .await
        .map_err(load_failed(session))?
        .unwrap_or_default();
    edit(&mut content.quick_stats).map_err(save_failed(session))?;

    let saved = portfolio::save(store, content)
        .await
        .map_err(save_failed(session))?;
    announce(state, "portfolio_content", ChangeKind::Update);
    Ok(Json(saved))
}

/// POST /api/admin/portfolio/quick-stats
pub async fn add_quick_stat(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
) -> Result<Json<PortfolioContent>, AppError> {
    let native_text = LanguageStrings::for_code(state.registry.native().code).new_stat;
    edit_quick_stats(&state, &session, |stats| {
        portfolio::add_quick_stat(stats, native_text)
    })
    .await
}

/// DELETE /api/admin/portfolio/quick-stats/:index
pub async fn remove_quick_stat(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(index): Path<usize>,
) -> Result<Json<PortfolioContent>, AppError> {
    edit_quick_stats(&state, &session, |stats| {
        portfolio::remove_quick_stat(stats, index).map(|_| ())
    })
    .await
}

// ==================== Images ====================

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Original file name; only its extension is kept.
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    url: String,
}

/// POST /api/admin/images?name=photo.png with the raw image as the body.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "expected an image, got {}",
            content_type
        )));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("empty upload".to_string()));
    }

    let object_path = object_path_for(&params.name);
    let url = session
        .ctx
        .store
        .upload_object(
            &state.config.storage_bucket,
            &object_path,
            content_type,
            body.to_vec(),
        )
        .await
        .map_err(|e| AppError::failed(session.ctx.strings.save_failed, e.into()))?;

    info!("{} uploaded {}", session.user.id, object_path);
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

// ==================== Rich Text ====================

#[derive(Debug, Deserialize)]
pub struct ImageLayoutRequest {
    pub document: Document,
    pub src: String,
    #[serde(default)]
    pub size: Option<SizePreset>,
    #[serde(default)]
    pub container_width: Option<f64>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Serialize)]
pub struct ImageLayoutResponse {
    document: Document,
    updated: usize,
}

/// POST /api/admin/richtext/image-layout: resize and/or align an image node.
pub async fn image_layout(
    _session: AdminSession,
    Json(request): Json<ImageLayoutRequest>,
) -> Result<Json<ImageLayoutResponse>, AppError> {
    let mut document = request.document;
    let mut updated = 0;

    if let Some(preset) = request.size {
        let (Some(width), Some(ratio)) = (request.container_width, request.aspect_ratio) else {
            return Err(AppError::BadRequest(
                "resizing needs container_width and aspect_ratio".to_string(),
            ));
        };
        updated = updated.max(document.resize_image(&request.src, preset, width, ratio));
    }
    if let Some(alignment) = request.alignment {
        updated = updated.max(document.align_image(&request.src, alignment));
    }

    Ok(Json(ImageLayoutResponse { document, updated }))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub document: Document,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    html: String,
}

/// POST /api/admin/richtext/preview
pub async fn preview(
    _session: AdminSession,
    Json(request): Json<PreviewRequest>,
) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: render_html(&request.document),
    })
}
