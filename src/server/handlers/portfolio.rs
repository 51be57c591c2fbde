use axum::Json;
use serde::Serialize;

use crate::content::{portfolio, section, PortfolioContent, QuickStat, Section, StatColor, StatIcon};
use crate::i18n::Language;
use crate::server::context::ViewContext;
use crate::server::error::AppError;

/// Response for GET /api/portfolio.
#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<ProfileView>,
    featured: Vec<FeaturedSection>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    name: String,
    title: String,
    bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    years_of_experience: u32,
    featured_projects_title: String,
    contact_title: String,
    contact_text: String,
    quick_stats_title: String,
    quick_stats: Vec<QuickStatView>,
    links: Vec<LinkView>,
}

#[derive(Debug, Serialize)]
pub struct QuickStatView {
    icon: StatIcon,
    text: String,
    color: StatColor,
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    kind: &'static str,
    href: String,
}

#[derive(Debug, Serialize)]
pub struct FeaturedSection {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    /// Missing when the owning page is hidden from the viewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<String>,
}

impl ProfileView {
    fn new(content: &PortfolioContent, language: Language) -> Self {
        let pick = |english: &str, native: &Option<String>| {
            language.pick(english, native.as_deref()).to_string()
        };
        let mut stats: Vec<&QuickStat> = content.quick_stats.iter().collect();
        stats.sort_by_key(|stat| stat.order);

        Self {
            name: pick(&content.name, &content.name_native),
            title: pick(&content.title, &content.title_native),
            bio: pick(&content.bio, &content.bio_native),
            image_url: content.image_url.clone().filter(|url| !url.is_empty()),
            years_of_experience: content.years_of_experience,
            featured_projects_title: pick(
                &content.featured_projects_title,
                &content.featured_projects_title_native,
            ),
            contact_title: pick(&content.contact_title, &content.contact_title_native),
            contact_text: pick(&content.contact_text, &content.contact_text_native),
            quick_stats_title: pick(&content.quick_stats_title, &content.quick_stats_title_native),
            quick_stats: stats
                .into_iter()
                .map(|stat| QuickStatView {
                    icon: stat.icon,
                    text: language.pick(&stat.text, Some(&stat.text_native)).to_string(),
                    color: stat.color,
                })
                .collect(),
            links: content
                .social_links()
                .into_iter()
                .map(|(kind, href)| LinkView { kind, href })
                .collect(),
        }
    }
}

impl FeaturedSection {
    fn new(section: &Section, language: Language) -> Self {
        Self {
            title: language
                .pick(&section.title, section.title_native.as_deref())
                .to_string(),
            description: language
                .pick_opt(
                    section.description.as_deref(),
                    section.description_native.as_deref(),
                )
                .map(str::to_string),
            image_url: section.image_url.clone(),
            href: section
                .page
                .as_ref()
                .map(|page| section.href(&page.slug)),
        }
    }
}

/// Handle GET /api/portfolio.
pub async fn get_portfolio(ctx: ViewContext) -> Result<Json<PortfolioResponse>, AppError> {
    let fail = |e| AppError::failed(ctx.strings.load_page_failed, e);
    let (content, featured) = tokio::try_join!(
        portfolio::fetch(&ctx.store),
        section::list_featured(&ctx.store),
    )
    .map_err(fail)?;

    Ok(Json(PortfolioResponse {
        profile: content.map(|c| ProfileView::new(&c, ctx.language)),
        featured: featured
            .iter()
            .map(|s| FeaturedSection::new(s, ctx.language))
            .collect(),
    }))
}
