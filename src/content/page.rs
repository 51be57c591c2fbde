use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{non_empty, slugify, Audience, ContentError, ContentResult};
use crate::richtext::Document;
use crate::store::{Direction, Query, StoreClient};

const TABLE: &str = "pages";

/// Columns the navigation needs; descriptions are left out on purpose to keep
/// the refetch small.
pub const NAV_COLUMNS: &str = "id,title,title_native,slug,parent_id,order,only_for_admin";

const DOCS_COLUMNS: &str =
    "id,title,title_native,description,description_native,slug,only_for_admin,created_at";

/// A row of the `pages` table.
///
/// Descriptions hold serialized rich text; see [`Page::description_doc`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub title_native: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_native: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub only_for_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn description_doc(&self) -> Option<Document> {
        Document::from_stored(self.description.as_deref())
    }

    pub fn description_native_doc(&self) -> Option<Document> {
        Document::from_stored(self.description_native.as_deref())
    }
}

/// Admin create/update payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageForm {
    pub title: String,
    #[serde(default)]
    pub title_native: Option<String>,
    #[serde(default)]
    pub description: Option<Document>,
    #[serde(default)]
    pub description_native: Option<Document>,
    /// Generated from the title when left empty.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub only_for_admin: bool,
}

impl PageForm {
    /// Trim, resolve the slug and check it. Does not touch the store.
    fn normalize(mut self) -> ContentResult<Self> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ContentError::MissingTitle);
        }
        self.title_native = non_empty(self.title_native);
        self.parent_id = non_empty(self.parent_id);

        let slug = non_empty(self.slug.take()).unwrap_or_else(|| slugify(&self.title));
        if !super::is_valid_slug(&slug) {
            return Err(ContentError::InvalidSlug(slug));
        }
        self.slug = Some(slug);

        self.description = self.description.filter(|doc| !doc.is_empty());
        self.description_native = self.description_native.filter(|doc| !doc.is_empty());
        Ok(self)
    }

    fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    fn to_row(&self) -> ContentResult<serde_json::Value> {
        let stored = |doc: &Option<Document>| -> serde_json::Result<Option<String>> {
            doc.as_ref().map(Document::to_json_string).transpose()
        };
        Ok(json!({
            "title": self.title,
            "title_native": self.title_native,
            "description": stored(&self.description)?,
            "description_native": stored(&self.description_native)?,
            "slug": self.slug(),
            "parent_id": self.parent_id,
            "order": self.order,
            "only_for_admin": self.only_for_admin,
        }))
    }
}

/// Pages for the navigation tree, sorted by `order`.
pub async fn fetch_nav_pages(store: &StoreClient, audience: Audience) -> ContentResult<Vec<Page>> {
    let query = Query::table(TABLE)
        .select(NAV_COLUMNS)
        .order("order", Direction::Asc);
    Ok(store.select(&audience.restrict(query)).await?)
}

/// Root pages for the documentation listing, newest first.
pub async fn list_docs(store: &StoreClient, audience: Audience) -> ContentResult<Vec<Page>> {
    let query = Query::table(TABLE)
        .select(DOCS_COLUMNS)
        .is_null("parent_id")
        .order("created_at", Direction::Desc);
    Ok(store.select(&audience.restrict(query)).await?)
}

/// Every page for the admin list.
pub async fn list_admin(store: &StoreClient) -> ContentResult<Vec<Page>> {
    let query = Query::table(TABLE)
        .order("order", Direction::Asc)
        .order("created_at", Direction::Desc);
    Ok(store.select(&query).await?)
}

/// Look a page up by slug regardless of audience; callers decide what an
/// admin-only hit means for the viewer.
///
/// Page URLs are flat, so slugs are unique across all levels. Rows written
/// before that rule resolve to a public page first, then the oldest one.
pub async fn fetch_by_slug(store: &StoreClient, slug: &str) -> ContentResult<Option<Page>> {
    let query = Query::table(TABLE)
        .eq("slug", slug)
        .order("only_for_admin", Direction::Asc)
        .order("created_at", Direction::Asc);
    Ok(store.select_optional(&query).await?)
}

pub async fn fetch_by_id(store: &StoreClient, id: &str) -> ContentResult<Option<Page>> {
    let query = Query::table(TABLE).eq("id", id);
    Ok(store.select_optional(&query).await?)
}

pub async fn create(store: &StoreClient, form: PageForm) -> ContentResult<Page> {
    let form = form.normalize()?;
    if let Some(parent_id) = &form.parent_id {
        if fetch_by_id(store, parent_id).await?.is_none() {
            return Err(ContentError::InvalidParent(format!(
                "page {} does not exist",
                parent_id
            )));
        }
    }
    ensure_unique_slug(store, form.slug(), None).await?;

    let page: Page = store.insert(TABLE, &form.to_row()?).await?;
    info!("Created page {} ({})", page.id, page.slug);
    Ok(page)
}

pub async fn update(store: &StoreClient, id: &str, form: PageForm) -> ContentResult<Page> {
    let form = form.normalize()?;
    if let Some(parent_id) = &form.parent_id {
        let pages: Vec<Page> = store
            .select(&Query::table(TABLE).select("id,parent_id,slug,title"))
            .await?;
        check_parent(&pages, id, parent_id)?;
    }
    ensure_unique_slug(store, form.slug(), Some(id)).await?;

    let rows: Vec<Page> = store
        .update(&Query::table(TABLE).eq("id", id), &form.to_row()?)
        .await?;
    let page = rows.into_iter().next().ok_or(ContentError::NotFound("page"))?;
    info!("Updated page {} ({})", page.id, page.slug);
    Ok(page)
}

/// Delete a page, its descendants and all their sections.
///
/// Returns the ids of the deleted pages, the requested page first.
pub async fn delete_cascade(store: &StoreClient, id: &str) -> ContentResult<Vec<String>> {
    let pages: Vec<Page> = store
        .select(&Query::table(TABLE).select("id,parent_id,slug,title"))
        .await?;
    if !pages.iter().any(|p| p.id == id) {
        return Err(ContentError::NotFound("page"));
    }

    let ids = descendants_of(&pages, id);
    store
        .delete(&Query::table("sections").in_list("page_id", &ids))
        .await?;
    store
        .delete(&Query::table(TABLE).in_list("id", &ids))
        .await?;

    info!("Deleted page {} and {} descendant(s)", id, ids.len() - 1);
    Ok(ids)
}

/// `id` followed by every page below it, breadth-first. Terminates on cyclic
/// parent chains.
pub fn descendants_of(pages: &[Page], id: &str) -> Vec<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for page in pages {
        if let Some(parent) = page.parent_id.as_deref() {
            children.entry(parent).or_default().push(page.id.as_str());
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([id]);
    let mut out = Vec::new();
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        out.push(current.to_string());
        if let Some(kids) = children.get(current) {
            queue.extend(kids.iter().copied());
        }
    }
    out
}

/// Reject a parent that is the page itself or one of its descendants.
fn check_parent(pages: &[Page], id: &str, parent_id: &str) -> ContentResult<()> {
    if !pages.iter().any(|p| p.id == parent_id) {
        return Err(ContentError::InvalidParent(format!(
            "page {} does not exist",
            parent_id
        )));
    }
    if descendants_of(pages, id).iter().any(|d| d == parent_id) {
        return Err(ContentError::InvalidParent(
            "a page cannot be nested under itself or its own subpages".to_string(),
        ));
    }
    Ok(())
}

/// Slugs are the whole page URL, so they must be unique at every level.
async fn ensure_unique_slug(
    store: &StoreClient,
    slug: &str,
    except_id: Option<&str>,
) -> ContentResult<()> {
    let mut query = Query::table(TABLE).select("id").eq("slug", slug);
    if let Some(except_id) = except_id {
        query = query.neq("id", except_id);
    }

    let clash: Option<serde_json::Value> = store.select_optional(&query).await?;
    match clash {
        Some(_) => Err(ContentError::DuplicateSlug(slug.to_string())),
        None => Ok(()),
    }
}
