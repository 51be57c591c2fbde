//! Typed access to the site's tables: pages, sections and the portfolio row.

pub mod page;
pub mod portfolio;
pub mod section;
pub mod slug;

pub use page::{Page, PageForm};
pub use portfolio::{PortfolioContent, QuickStat, SiteLabels, StatColor, StatIcon};
pub use section::{Section, SectionForm};
pub use slug::{is_valid_slug, slugify};

use thiserror::Error;

use crate::store::{Query, StoreError};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not encode rich text: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("title is required")]
    MissingTitle,

    #[error("invalid slug '{0}': use lower-case letters, digits and single dashes")]
    InvalidSlug(String),

    #[error("slug '{0}' is already used at this level")]
    DuplicateSlug(String),

    #[error("invalid parent: {0}")]
    InvalidParent(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("at most {0} quick stats are allowed")]
    TooManyQuickStats(usize),

    #[error("no quick stat at position {0}")]
    NoSuchQuickStat(usize),
}

impl ContentError {
    /// Errors caused by the submitted data rather than the store.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ContentError::Store(_) | ContentError::Encode(_) | ContentError::NotFound(_)
        )
    }
}

pub type ContentResult<T> = Result<T, ContentError>;

/// Who a listing is for. Admin-only pages are filtered out of public
/// listings in the query itself, never after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Public,
    Admin,
}

impl Audience {
    pub fn for_signed_in(signed_in: bool) -> Self {
        if signed_in {
            Audience::Admin
        } else {
            Audience::Public
        }
    }

    pub fn can_see(self, page: &Page) -> bool {
        self == Audience::Admin || !page.only_for_admin
    }

    pub(crate) fn restrict(self, query: Query) -> Query {
        match self {
            Audience::Public => query.eq("only_for_admin", false),
            Audience::Admin => query,
        }
    }
}

/// Empty form strings mean "not set".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
