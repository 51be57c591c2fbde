//! Change notifications and the cached public navigation.
//!
//! The database posts a webhook for every row change. Each change is published
//! on a broadcast feed; browsers receive it over a websocket and a background
//! task rebuilds the navigation from scratch whenever `pages` (or the labels
//! row) changes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::content::{page, portfolio, Audience, ContentResult, SiteLabels};
use crate::i18n::LanguageRegistry;
use crate::navigation::{build_nav_tree, count, NavNode};
use crate::store::StoreClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Message pushed to websocket clients: `{"type":"change","table":..,"event":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "change")]
pub struct ChangeEvent {
    pub table: String,
    pub event: ChangeKind,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, event: ChangeKind) -> Self {
        Self {
            table: table.into(),
            event,
        }
    }

    pub fn affects_navigation(&self) -> bool {
        matches!(self.table.as_str(), "pages" | "portfolio_content")
    }
}

/// Body of the database webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub old_record: Option<Value>,
}

impl WebhookPayload {
    /// Only changes to the public schema are relevant to the site.
    pub fn into_event(self) -> Option<ChangeEvent> {
        match self.schema.as_deref() {
            None | Some("public") => Some(ChangeEvent::new(self.table, self.kind)),
            Some(other) => {
                debug!("Ignoring change in schema {}", other);
                None
            }
        }
    }
}

/// Fan-out of change events to every subscriber.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event; returns how many subscribers will see it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        // No subscribers is not an error: nobody is listening right now
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

/// What the public navigation endpoint serves.
#[derive(Debug, Clone, PartialEq)]
pub struct NavSnapshot {
    pub labels: SiteLabels,
    pub pages: Arc<Vec<NavNode>>,
}

/// The last successfully built public navigation.
#[derive(Debug, Default)]
pub struct NavigationCache {
    current: RwLock<Option<NavSnapshot>>,
}

impl NavigationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<NavSnapshot> {
        self.current.read().await.clone()
    }

    pub async fn set(&self, snapshot: NavSnapshot) {
        *self.current.write().await = Some(snapshot);
    }

    /// Refetch everything and replace the snapshot. On failure the previous
    /// snapshot stays in place.
    pub async fn refresh(
        &self,
        store: &StoreClient,
        registry: &LanguageRegistry,
    ) -> ContentResult<NavSnapshot> {
        let snapshot = build_snapshot(store, registry, Audience::Public).await?;
        self.set(snapshot.clone()).await;
        info!("Navigation rebuilt with {} page(s)", count(&snapshot.pages));
        Ok(snapshot)
    }
}

/// Fetch labels and pages for an audience and build the forest.
pub async fn build_snapshot(
    store: &StoreClient,
    registry: &LanguageRegistry,
    audience: Audience,
) -> ContentResult<NavSnapshot> {
    let (labels, pages) = tokio::try_join!(
        portfolio::fetch_labels(store, registry),
        page::fetch_nav_pages(store, audience),
    )?;
    Ok(NavSnapshot {
        labels,
        pages: Arc::new(build_nav_tree(pages)),
    })
}

/// Rebuild the cached navigation whenever a relevant change arrives.
///
/// Each event triggers a full refetch. When the receiver lags behind, the
/// missed events are collapsed into a single refresh.
pub fn spawn_navigation_refresh(
    feed: &ChangeFeed,
    cache: Arc<NavigationCache>,
    store: StoreClient,
    registry: LanguageRegistry,
) -> JoinHandle<()> {
    let mut receiver = feed.subscribe();
    tokio::spawn(async move {
        loop {
            let refresh = match receiver.recv().await {
                Ok(event) => event.affects_navigation(),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Navigation refresh skipped {} change event(s)", missed);
                    true
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if refresh {
                if let Err(e) = cache.refresh(&store, &registry).await {
                    error!("Failed to rebuild navigation, keeping previous: {}", e);
                }
            }
        }
        debug!("Change feed closed, navigation refresh stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ==================== Event Tests ====================

    #[test]
    fn test_change_event_wire_format() {
        let event = ChangeEvent::new("pages", ChangeKind::Update);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "change", "table": "pages", "event": "UPDATE"})
        );
    }

    #[test]
    fn test_webhook_payload_to_event() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "type": "INSERT",
            "table": "pages",
            "schema": "public",
            "record": {"id": "1"},
            "old_record": null
        }))
        .unwrap();
        let event = payload.into_event().unwrap();
        assert_eq!(event, ChangeEvent::new("pages", ChangeKind::Insert));
        assert!(event.affects_navigation());
    }

    #[test]
    fn test_webhook_other_schema_ignored() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "type": "DELETE", "table": "users", "schema": "auth"
        }))
        .unwrap();
        assert!(payload.into_event().is_none());
    }

    #[test]
    fn test_sections_do_not_affect_navigation() {
        assert!(!ChangeEvent::new("sections", ChangeKind::Insert).affects_navigation());
        assert!(ChangeEvent::new("portfolio_content", ChangeKind::Update).affects_navigation());
    }

    // ==================== Feed Tests ====================

    #[tokio::test]
    async fn test_feed_fan_out() {
        let feed = ChangeFeed::new(8);
        assert_eq!(feed.publish(ChangeEvent::new("pages", ChangeKind::Insert)), 0);

        let mut a = feed.subscribe();
        let mut b = feed.subscribe();
        assert_eq!(feed.publish(ChangeEvent::new("pages", ChangeKind::Delete)), 2);
        assert_eq!(a.recv().await.unwrap().event, ChangeKind::Delete);
        assert_eq!(b.recv().await.unwrap().table, "pages");
    }

    // ==================== Refresh Tests ====================

    async fn mock_backend(pages: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/portfolio_content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/pages"))
            .and(query_param("only_for_admin", "eq.false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pages))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_refresh_builds_forest() {
        let server = mock_backend(json!([
            {"id": "a", "title": "A", "slug": "a", "order": 1},
            {"id": "b", "title": "B", "slug": "b", "parent_id": "a", "order": 0},
            {"id": "c", "title": "C", "slug": "c", "order": 0}
        ]))
        .await;
        let store = StoreClient::new(server.uri(), "anon");
        let registry = LanguageRegistry::default();
        let cache = NavigationCache::new();

        cache.refresh(&store, &registry).await.unwrap();
        let snapshot = cache.get().await.unwrap();
        assert_eq!(snapshot.pages[0].page.id, "c");
        assert_eq!(snapshot.pages[1].children[0].page.id, "b");
        assert_eq!(snapshot.labels, SiteLabels::defaults(&registry));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let store = StoreClient::new(server.uri(), "anon");
        let registry = LanguageRegistry::default();
        let cache = NavigationCache::new();
        let previous = NavSnapshot {
            labels: SiteLabels::defaults(&registry),
            pages: Arc::new(Vec::new()),
        };
        cache.set(previous.clone()).await;

        assert!(cache.refresh(&store, &registry).await.is_err());
        assert_eq!(cache.get().await, Some(previous));
    }

    #[tokio::test]
    async fn test_page_change_triggers_refresh() {
        let server = mock_backend(json!([{"id": "a", "title": "A", "slug": "a"}])).await;
        let store = StoreClient::new(server.uri(), "anon");
        let feed = ChangeFeed::new(8);
        let cache = Arc::new(NavigationCache::new());

        let handle = spawn_navigation_refresh(
            &feed,
            cache.clone(),
            store,
            LanguageRegistry::default(),
        );
        feed.publish(ChangeEvent::new("sections", ChangeKind::Update));
        feed.publish(ChangeEvent::new("pages", ChangeKind::Insert));

        let mut snapshot = None;
        for _ in 0..50 {
            snapshot = cache.get().await;
            if snapshot.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(snapshot.unwrap().pages.len(), 1);
        handle.abort();
    }
}
