use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{non_empty, slugify, ContentError, ContentResult};
use crate::richtext::Document;
use crate::store::{Direction, Query, StoreClient};

const TABLE: &str = "sections";

/// Featured sections come back with the slug of the page they belong to.
const FEATURED_COLUMNS: &str = "id,page_id,title,title_native,description,description_native,\
                                slug,order,image_url,show_in_main_page,page:page_id(slug)";

/// Slug of the owning page, embedded by the store on featured listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRef {
    pub slug: String,
}

/// A row of the `sections` table. Content columns hold rich-text JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub page_id: String,
    pub title: String,
    #[serde(default)]
    pub title_native: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_native: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub content_native: Option<Value>,
    pub slug: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub show_in_main_page: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRef>,
}

impl Section {
    pub fn content_doc(&self) -> Option<Document> {
        Document::from_stored_value(self.content.as_ref())
    }

    pub fn content_native_doc(&self) -> Option<Document> {
        Document::from_stored_value(self.content_native.as_ref())
    }

    /// Link target, when the owning page slug is known.
    pub fn href(&self, page_slug: &str) -> String {
        format!("/{}/{}", page_slug, self.slug)
    }
}

/// Admin create/update payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionForm {
    pub page_id: String,
    pub title: String,
    #[serde(default)]
    pub title_native: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_native: Option<String>,
    #[serde(default)]
    pub content: Option<Document>,
    #[serde(default)]
    pub content_native: Option<Document>,
    #[serde(default)]
    pub slug: Option<String>,
    /// Ignored on create, where the section goes last.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub show_in_main_page: bool,
}

impl SectionForm {
    fn normalize(mut self) -> ContentResult<Self> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ContentError::MissingTitle);
        }
        if self.page_id.trim().is_empty() {
            return Err(ContentError::NotFound("page"));
        }
        self.title_native = non_empty(self.title_native);
        self.description = non_empty(self.description);
        self.description_native = non_empty(self.description_native);
        self.image_url = non_empty(self.image_url);

        let slug = non_empty(self.slug.take()).unwrap_or_else(|| slugify(&self.title));
        if !super::is_valid_slug(&slug) {
            return Err(ContentError::InvalidSlug(slug));
        }
        self.slug = Some(slug);
        Ok(self)
    }

    fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    fn to_row(&self, order: i32) -> ContentResult<Value> {
        let content = |doc: &Option<Document>| -> serde_json::Result<Option<Value>> {
            doc.as_ref().map(Document::to_value).transpose()
        };
        Ok(json!({
            "page_id": self.page_id,
            "title": self.title,
            "title_native": self.title_native,
            "description": self.description,
            "description_native": self.description_native,
            "content": content(&self.content)?,
            "content_native": content(&self.content_native)?,
            "slug": self.slug(),
            "order": order,
            "image_url": self.image_url,
            "show_in_main_page": self.show_in_main_page,
        }))
    }
}

/// Sections of a page in display order.
pub async fn list_for_page(store: &StoreClient, page_id: &str) -> ContentResult<Vec<Section>> {
    let query = Query::table(TABLE)
        .eq("page_id", page_id)
        .order("order", Direction::Asc);
    Ok(store.select(&query).await?)
}

pub async fn fetch_by_slug(
    store: &StoreClient,
    page_id: &str,
    slug: &str,
) -> ContentResult<Option<Section>> {
    let query = Query::table(TABLE).eq("page_id", page_id).eq("slug", slug);
    Ok(store.select_optional(&query).await?)
}

/// Sections flagged for the landing page, each with its page slug.
pub async fn list_featured(store: &StoreClient) -> ContentResult<Vec<Section>> {
    let query = Query::table(TABLE)
        .select(FEATURED_COLUMNS)
        .eq("show_in_main_page", true)
        .order("order", Direction::Asc);
    Ok(store.select(&query).await?)
}

/// Order for a section appended to a page: one past the current maximum, or
/// 0 on an empty page.
pub async fn next_order(store: &StoreClient, page_id: &str) -> ContentResult<i32> {
    #[derive(Deserialize)]
    struct OrderRow {
        #[serde(default)]
        order: Option<i32>,
    }

    let query = Query::table(TABLE)
        .select("order")
        .eq("page_id", page_id)
        .order("order", Direction::Desc);
    let last: Option<OrderRow> = store.select_optional(&query).await?;
    Ok(match last {
        Some(row) => row.order.unwrap_or(0) + 1,
        None => 0,
    })
}

pub async fn create(store: &StoreClient, form: SectionForm) -> ContentResult<Section> {
    let form = form.normalize()?;
    ensure_unique_slug(store, &form.page_id, form.slug(), None).await?;
    let order = next_order(store, &form.page_id).await?;

    let section: Section = store.insert(TABLE, &form.to_row(order)?).await?;
    info!(
        "Created section {} ({}) at position {}",
        section.id, section.slug, section.order
    );
    Ok(section)
}

pub async fn update(store: &StoreClient, id: &str, form: SectionForm) -> ContentResult<Section> {
    let form = form.normalize()?;
    ensure_unique_slug(store, &form.page_id, form.slug(), Some(id)).await?;

    let rows: Vec<Section> = store
        .update(&Query::table(TABLE).eq("id", id), &form.to_row(form.order)?)
        .await?;
    let section = rows
        .into_iter()
        .next()
        .ok_or(ContentError::NotFound("section"))?;
    info!("Updated section {} ({})", section.id, section.slug);
    Ok(section)
}

pub async fn delete(store: &StoreClient, id: &str) -> ContentResult<()> {
    store.delete(&Query::table(TABLE).eq("id", id)).await?;
    info!("Deleted section {}", id);
    Ok(())
}

async fn ensure_unique_slug(
    store: &StoreClient,
    page_id: &str,
    slug: &str,
    except_id: Option<&str>,
) -> ContentResult<()> {
    let mut query = Query::table(TABLE)
        .select("id")
        .eq("page_id", page_id)
        .eq("slug", slug);
    if let Some(except_id) = except_id {
        query = query.neq("id", except_id);
    }

    let clash: Option<Value> = store.select_optional(&query).await?;
    match clash {
        Some(_) => Err(ContentError::DuplicateSlug(slug.to_string())),
        None => Ok(()),
    }
}
