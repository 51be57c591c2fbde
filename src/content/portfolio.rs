//! The single `portfolio_content` row: profile, contact links, site labels
//! and quick stats.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use super::{non_empty, ContentError, ContentResult};
use crate::i18n::{LanguageRegistry, LanguageStrings, ENGLISH_STRINGS};
use crate::store::{Query, StoreClient};

const TABLE: &str = "portfolio_content";

const LABEL_COLUMNS: &str =
    "portfolio_label,portfolio_label_native,native_language_label,native_language_label_native";

pub const MAX_QUICK_STATS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatIcon {
    Code,
    Server,
    BookOpen,
    Briefcase,
    Award,
    GraduationCap,
    Globe,
    FileText,
}

impl StatIcon {
    pub const ALL: [StatIcon; 8] = [
        StatIcon::Code,
        StatIcon::Server,
        StatIcon::BookOpen,
        StatIcon::Briefcase,
        StatIcon::Award,
        StatIcon::GraduationCap,
        StatIcon::Globe,
        StatIcon::FileText,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatColor {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Indigo,
    Pink,
    Yellow,
}

impl StatColor {
    pub const ALL: [StatColor; 8] = [
        StatColor::Blue,
        StatColor::Green,
        StatColor::Purple,
        StatColor::Orange,
        StatColor::Red,
        StatColor::Indigo,
        StatColor::Pink,
        StatColor::Yellow,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickStat {
    pub icon: StatIcon,
    pub text: String,
    #[serde(default)]
    pub text_native: String,
    pub color: StatColor,
    #[serde(default)]
    pub order: usize,
}

/// Append the default stat. Fails once the limit is reached.
pub fn add_quick_stat(stats: &mut Vec<QuickStat>, native_text: &str) -> ContentResult<()> {
    if stats.len() >= MAX_QUICK_STATS {
        return Err(ContentError::TooManyQuickStats(MAX_QUICK_STATS));
    }
    stats.push(QuickStat {
        icon: StatIcon::Award,
        text: ENGLISH_STRINGS.new_stat.to_string(),
        text_native: native_text.to_string(),
        color: StatColor::Blue,
        order: stats.len(),
    });
    Ok(())
}

/// Remove the stat at `index` and renumber the rest 0..n.
pub fn remove_quick_stat(stats: &mut Vec<QuickStat>, index: usize) -> ContentResult<QuickStat> {
    if index >= stats.len() {
        return Err(ContentError::NoSuchQuickStat(index));
    }
    let removed = stats.remove(index);
    reindex(stats);
    Ok(removed)
}

/// Sort by the stored order (stable) and renumber contiguously.
pub fn reindex(stats: &mut [QuickStat]) {
    stats.sort_by_key(|stat| stat.order);
    for (i, stat) in stats.iter_mut().enumerate() {
        stat.order = i;
    }
}

/// Labels shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLabels {
    pub portfolio_label: String,
    pub portfolio_label_native: String,
    pub native_language_label: String,
    pub native_language_label_native: String,
}

impl SiteLabels {
    /// Built-in labels for the configured native language.
    pub fn defaults(registry: &LanguageRegistry) -> Self {
        let native = registry.native();
        Self {
            portfolio_label: LanguageStrings::for_code(registry.english().code)
                .portfolio_label
                .to_string(),
            portfolio_label_native: LanguageStrings::for_code(native.code)
                .portfolio_label
                .to_string(),
            native_language_label: native.name.to_string(),
            native_language_label_native: native.native_name.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StoredLabels {
    portfolio_label: Option<String>,
    portfolio_label_native: Option<String>,
    native_language_label: Option<String>,
    native_language_label_native: Option<String>,
}

impl StoredLabels {
    fn over(self, defaults: SiteLabels) -> SiteLabels {
        SiteLabels {
            portfolio_label: non_empty(self.portfolio_label).unwrap_or(defaults.portfolio_label),
            portfolio_label_native: non_empty(self.portfolio_label_native)
                .unwrap_or(defaults.portfolio_label_native),
            native_language_label: non_empty(self.native_language_label)
                .unwrap_or(defaults.native_language_label),
            native_language_label_native: non_empty(self.native_language_label_native)
                .unwrap_or(defaults.native_language_label_native),
        }
    }
}

/// Stored labels with the built-in ones filling any gaps.
pub async fn fetch_labels(
    store: &StoreClient,
    registry: &LanguageRegistry,
) -> ContentResult<SiteLabels> {
    let query = Query::table(TABLE).select(LABEL_COLUMNS);
    let stored: Option<StoredLabels> = store.select_optional(&query).await?;
    Ok(stored.unwrap_or_default().over(SiteLabels::defaults(registry)))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub name_native: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub title_native: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub bio: String,
    pub bio_native: Option<String>,

    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub email: Option<String>,
    pub google_scholar_url: Option<String>,
    pub stackoverflow_url: Option<String>,
    pub orcid_url: Option<String>,
    pub medium_url: Option<String>,
    pub gumroad_url: Option<String>,
    pub substack_url: Option<String>,
    pub dev_to_url: Option<String>,
    pub hashnode_url: Option<String>,
    pub youtube_url: Option<String>,
    pub personal_website_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub vk_url: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub years_of_experience: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub featured_projects_title: String,
    pub featured_projects_title_native: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_title: String,
    pub contact_title_native: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_text: String,
    pub contact_text_native: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub quick_stats_title: String,
    pub quick_stats_title_native: Option<String>,

    pub portfolio_label: Option<String>,
    pub portfolio_label_native: Option<String>,
    pub native_language_label: Option<String>,
    pub native_language_label_native: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub quick_stats: Vec<QuickStat>,
}

// The row is edited through a form that used to store blanks as nulls.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PortfolioContent {
    /// Non-empty contact links, in display order. `email` becomes a mailto link.
    pub fn social_links(&self) -> Vec<(&'static str, String)> {
        let links: [(&'static str, &Option<String>); 18] = [
            ("website", &self.personal_website_url),
            ("github", &self.github_url),
            ("linkedin", &self.linkedin_url),
            ("twitter", &self.twitter_url),
            ("google_scholar", &self.google_scholar_url),
            ("stackoverflow", &self.stackoverflow_url),
            ("orcid", &self.orcid_url),
            ("medium", &self.medium_url),
            ("gumroad", &self.gumroad_url),
            ("substack", &self.substack_url),
            ("dev_to", &self.dev_to_url),
            ("hashnode", &self.hashnode_url),
            ("youtube", &self.youtube_url),
            ("facebook", &self.facebook_url),
            ("instagram", &self.instagram_url),
            ("tiktok", &self.tiktok_url),
            ("vk", &self.vk_url),
            ("email", &self.email),
        ];
        links
            .into_iter()
            .filter_map(|(kind, value)| {
                let value = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
                let href = if kind == "email" && !value.starts_with("mailto:") {
                    format!("mailto:{}", value)
                } else {
                    value.to_string()
                };
                Some((kind, href))
            })
            .collect()
    }

    /// Empty strings become nulls, quick stats are checked and renumbered.
    pub fn normalize(mut self) -> ContentResult<Self> {
        if self.quick_stats.len() > MAX_QUICK_STATS {
            return Err(ContentError::TooManyQuickStats(MAX_QUICK_STATS));
        }
        reindex(&mut self.quick_stats);

        for field in [
            &mut self.image_url,
            &mut self.name_native,
            &mut self.title_native,
            &mut self.bio_native,
            &mut self.github_url,
            &mut self.linkedin_url,
            &mut self.twitter_url,
            &mut self.email,
            &mut self.google_scholar_url,
            &mut self.stackoverflow_url,
            &mut self.orcid_url,
            &mut self.medium_url,
            &mut self.gumroad_url,
            &mut self.substack_url,
            &mut self.dev_to_url,
            &mut self.hashnode_url,
            &mut self.youtube_url,
            &mut self.personal_website_url,
            &mut self.facebook_url,
            &mut self.instagram_url,
            &mut self.tiktok_url,
            &mut self.vk_url,
            &mut self.featured_projects_title_native,
            &mut self.contact_title_native,
            &mut self.contact_text_native,
            &mut self.quick_stats_title_native,
            &mut self.portfolio_label,
            &mut self.portfolio_label_native,
            &mut self.native_language_label,
            &mut self.native_language_label_native,
        ] {
            *field = non_empty(field.take());
        }
        Ok(self)
    }
}

pub async fn fetch(store: &StoreClient) -> ContentResult<Option<PortfolioContent>> {
    Ok(store.select_optional(&Query::table(TABLE)).await?)
}

/// Update the existing row, or insert the first one.
pub async fn save(store: &StoreClient, content: PortfolioContent) -> ContentResult<PortfolioContent> {
    let mut content = content.normalize()?;

    let existing_id = match content.id.take() {
        Some(id) => Some(id),
        None => fetch(store).await?.and_then(|row| row.id),
    };

    let saved = match existing_id {
        Some(id) => {
            let rows: Vec<PortfolioContent> = store
                .update(&Query::table(TABLE).eq("id", &id), &content)
                .await?;
            rows.into_iter()
                .next()
                .ok_or(ContentError::NotFound("portfolio content"))?
        }
        None => store.insert(TABLE, &content).await?,
    };

    info!("Saved portfolio content");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stat(text: &str, order: usize) -> QuickStat {
        QuickStat {
            icon: StatIcon::Code,
            text: text.to_string(),
            text_native: String::new(),
            color: StatColor::Green,
            order,
        }
    }

    // ==================== Quick Stat Tests ====================

    #[test]
    fn test_add_quick_stat_defaults() {
        let mut stats = vec![stat("a", 0)];
        add_quick_stat(&mut stats, "Նոր վիճակագրություն").unwrap();

        let added = &stats[1];
        assert_eq!(added.icon, StatIcon::Award);
        assert_eq!(added.color, StatColor::Blue);
        assert_eq!(added.text, "New Stat");
        assert_eq!(added.order, 1);
    }

    #[test]
    fn test_add_quick_stat_limit() {
        let mut stats: Vec<QuickStat> = (0..MAX_QUICK_STATS).map(|i| stat("s", i)).collect();
        let err = add_quick_stat(&mut stats, "").unwrap_err();
        assert!(matches!(err, ContentError::TooManyQuickStats(8)));
        assert_eq!(stats.len(), MAX_QUICK_STATS);
    }

    #[test]
    fn test_remove_quick_stat_reindexes() {
        let mut stats = vec![stat("a", 0), stat("b", 1), stat("c", 2)];
        let removed = remove_quick_stat(&mut stats, 1).unwrap();

        assert_eq!(removed.text, "b");
        let orders: Vec<(&str, usize)> = stats.iter().map(|s| (s.text.as_str(), s.order)).collect();
        assert_eq!(orders, vec![("a", 0), ("c", 1)]);
        assert!(matches!(
            remove_quick_stat(&mut stats, 5),
            Err(ContentError::NoSuchQuickStat(5))
        ));
    }

    #[test]
    fn test_unknown_icon_or_color_is_rejected() {
        let bad_icon = r#"{"icon":"Rocket","text":"x","color":"blue","order":0}"#;
        assert!(serde_json::from_str::<QuickStat>(bad_icon).is_err());
        let bad_color = r#"{"icon":"Globe","text":"x","color":"teal","order":0}"#;
        assert!(serde_json::from_str::<QuickStat>(bad_color).is_err());
        let ok = r#"{"icon":"GraduationCap","text":"x","color":"indigo","order":0}"#;
        assert!(serde_json::from_str::<QuickStat>(ok).is_ok());
    }

    #[test]
    fn test_every_icon_and_color_round_trips_by_name() {
        for icon in StatIcon::ALL {
            let name = serde_json::to_value(icon).unwrap();
            assert_eq!(serde_json::from_value::<StatIcon>(name).unwrap(), icon);
        }
        assert_eq!(serde_json::to_value(StatColor::Yellow).unwrap(), "yellow");
        assert_eq!(StatColor::ALL.len(), 8);
    }

    // ==================== Profile Tests ====================

    #[test]
    fn test_normalize_clears_empty_strings_and_renumbers() {
        let content = PortfolioContent {
            github_url: Some("".to_string()),
            vk_url: Some("https://vk.com/me".to_string()),
            quick_stats: vec![stat("late", 5), stat("early", 2)],
            ..PortfolioContent::default()
        }
        .normalize()
        .unwrap();

        assert!(content.github_url.is_none());
        assert_eq!(content.vk_url.as_deref(), Some("https://vk.com/me"));
        assert_eq!(content.quick_stats[0].text, "early");
        assert_eq!(content.quick_stats[1].order, 1);
    }

    #[test]
    fn test_normalize_rejects_too_many_stats() {
        let content = PortfolioContent {
            quick_stats: (0..9).map(|i| stat("s", i)).collect(),
            ..PortfolioContent::default()
        };
        assert!(content.normalize().is_err());
    }

    #[test]
    fn test_social_links() {
        let content = PortfolioContent {
            github_url: Some("https://github.com/me".to_string()),
            email: Some("me@example.com".to_string()),
            twitter_url: Some("  ".to_string()),
            ..PortfolioContent::default()
        };
        assert_eq!(
            content.social_links(),
            vec![
                ("github", "https://github.com/me".to_string()),
                ("email", "mailto:me@example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_row_with_nulls_deserializes() {
        let json = r#"{"id":"1","name":"Ann","title":null,"bio":"b","quick_stats":null}"#;
        let content: PortfolioContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.title, "");
        assert!(content.quick_stats.is_empty());

        let json = r#"{"id":"1","name":"Ann","bio":"b","years_of_experience":7}"#;
        let content: PortfolioContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.years_of_experience, 7);
        assert!(content.quick_stats.is_empty());
    }

    // ==================== Label Tests ====================

    #[test]
    fn test_label_defaults_follow_native_language() {
        let registry = LanguageRegistry::new("hy").unwrap();
        let labels = SiteLabels::defaults(&registry);
        assert_eq!(labels.portfolio_label, "Portfolio");
        assert_eq!(labels.portfolio_label_native, "Պորտֆել");
        assert_eq!(labels.native_language_label_native, "հայերեն");
    }

    #[tokio::test]
    async fn test_fetch_labels_fills_gaps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/portfolio_content"))
            .and(query_param("select", LABEL_COLUMNS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "portfolio_label": "Ann Doe",
                "portfolio_label_native": null,
                "native_language_label": "",
                "native_language_label_native": null
            }])))
            .mount(&server)
            .await;

        let store = StoreClient::new(server.uri(), "anon");
        let registry = LanguageRegistry::new("hy").unwrap();
        let labels = fetch_labels(&store, &registry).await.unwrap();
        assert_eq!(labels.portfolio_label, "Ann Doe");
        assert_eq!(labels.portfolio_label_native, "Պորտֆել");
        assert_eq!(labels.native_language_label, registry.native().name);
    }

    #[tokio::test]
    async fn test_save_updates_existing_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/portfolio_content"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": "row1", "name": "Old"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/portfolio_content"))
            .and(query_param("id", "eq.row1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": "row1", "name": "New"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = StoreClient::new(server.uri(), "anon");
        let saved = save(
            &store,
            PortfolioContent {
                name: "New".to_string(),
                ..PortfolioContent::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.name, "New");
    }
}
