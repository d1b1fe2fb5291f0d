//! Property tests: row mapping and pagination.
//!
//! - Mapping a record to its persisted row, through JSON, and back is
//!   lossless for both resources.
//! - A ranged hosted query returns exactly the window that slicing the full
//!   listing would, with the same total.
//! - The same dataset paged through the hosted backend and through the local
//!   gateway yields the same page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};

use newsroom::adapters::hosted::{InMemoryClientFactory, InMemoryHostedService};
use newsroom::adapters::InMemoryRecordStore;
use newsroom::application::{
    ClientManager, ClientSlot, ReadinessBudget, RecordService, ResourceFacade,
};
use newsroom::domain::foundation::{PublishStatus, RecordId, Timestamp};
use newsroom::domain::{
    Article, BackendSelector, DeploymentSignals, Event, PageWindow, Resource, ResourceKind,
    MAX_PAGE_SIZE,
};
use newsroom::ports::{GatewayApi, GatewayError, RecordStore};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0i64..4_000_000_000, 0u32..1_000_000).prop_map(|(secs, micros)| {
        Timestamp::from_datetime(Utc.timestamp_opt(secs, micros * 1_000).unwrap())
    })
}

fn arb_status() -> impl Strategy<Value = PublishStatus> {
    prop_oneof![Just(PublishStatus::Draft), Just(PublishStatus::Published)]
}

fn arb_article() -> impl Strategy<Value = Article> {
    (
        "[A-Za-z ]{1,20}",
        "[A-Za-z0-9 .,#*]{1,80}",
        arb_status(),
        arb_timestamp(),
        arb_timestamp(),
    )
        .prop_map(|(title, content, status, created_at, updated_at)| Article {
            id: RecordId::generate(),
            title,
            content,
            status,
            created_at,
            updated_at,
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        "[A-Za-z ]{1,20}",
        proptest::option::of("[a-z ]{0,40}"),
        arb_timestamp(),
        proptest::option::of(arb_timestamp()),
        proptest::option::of("[A-Za-z ]{1,20}"),
        proptest::option::of("https://[a-z]{1,12}\\.org/[a-z0-9-]{0,16}"),
        arb_status(),
        arb_timestamp(),
    )
        .prop_map(
            |(title, description, start_date, end_date, location, registration_url, status, created_at)| Event {
                id: RecordId::generate(),
                title,
                description,
                start_date,
                end_date,
                location,
                registration_url,
                status,
                created_at,
                updated_at: created_at,
            },
        )
}

/// Snake_case event rows with start dates a few days apart (ties allowed).
fn arb_event_rows() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec((0u32..60, any::<bool>()), 0..30).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (day, published))| {
                let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
                    + chrono::Duration::days(day as i64);
                json!({
                    "id": format!("event-{}", i),
                    "title": format!("Event {}", i),
                    "start_date": start.to_rfc3339(),
                    "status": if published { "published" } else { "draft" },
                    "created_at": "2024-12-01T00:00:00Z",
                    "updated_at": "2024-12-01T00:00:00Z",
                })
            })
            .collect()
    })
}

/// Events on distinct days, in random order, some published.
fn arb_events_on_distinct_days() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::btree_set(0i64..365, 0..30)
        .prop_flat_map(|days| {
            let published = prop::collection::vec(any::<bool>(), days.len());
            (Just(days), published)
        })
        .prop_map(|(days, published)| {
            let created_at = Timestamp::parse("2024-12-01T00:00:00Z").unwrap();
            days.into_iter()
                .zip(published)
                .enumerate()
                .map(|(i, (day, published))| Event {
                    id: RecordId::new(format!("event-{}", i)).unwrap(),
                    title: format!("Event {}", i),
                    description: None,
                    start_date: Timestamp::from_datetime(
                        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
                            + chrono::Duration::days(day),
                    ),
                    end_date: None,
                    location: (i % 3 == 0).then(|| "Town hall".to_string()),
                    registration_url: None,
                    status: if published {
                        PublishStatus::Published
                    } else {
                        PublishStatus::Draft
                    },
                    created_at,
                    updated_at: created_at,
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn json_round_trip<R: Resource>(record: &R) -> R {
    let row = serde_json::to_value(record.to_row()).unwrap();
    R::from_row(serde_json::from_value::<R::Row>(row).unwrap())
}

/// Gateway client answering from a `RecordService`, as the local gateway's
/// list route does.
struct LocalGateway {
    records: Arc<RecordService>,
}

fn public_values<R: Resource>(records: Vec<R>) -> Vec<Value> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).unwrap())
        .collect()
}

#[async_trait]
impl GatewayApi for LocalGateway {
    async fn list(
        &self,
        kind: ResourceKind,
        status: Option<PublishStatus>,
    ) -> Result<Vec<Value>, GatewayError> {
        let listed = match kind {
            ResourceKind::Articles => self.records.list::<Article>(status).await.map(public_values),
            ResourceKind::Events => self.records.list::<Event>(status).await.map(public_values),
        };
        listed.map_err(|e| GatewayError::Transport(e.to_string()))
    }
}

/// Static deployment reading `events` from the hosted backend.
fn hosted_events(events: &[Event]) -> ResourceFacade<Event> {
    let rows = events
        .iter()
        .map(|event| serde_json::to_value(event.to_row()).unwrap())
        .collect();
    facade(rows)
}

/// Server-backed deployment with no hosted handle: public reads go to the
/// gateway.
async fn gateway_events(events: &[Event]) -> ResourceFacade<Event> {
    let store = InMemoryRecordStore::new();
    let values: Vec<Value> = events
        .iter()
        .map(|event| serde_json::to_value(event).unwrap())
        .collect();
    store.write_all(ResourceKind::Events, &values).await.unwrap();
    let gateway = LocalGateway {
        records: Arc::new(RecordService::new(Arc::new(store))),
    };
    ResourceFacade::new(
        Arc::new(ClientManager::unconfigured(Arc::new(ClientSlot::new()))),
        BackendSelector::new(DeploymentSignals::detect("localhost", "/events.html")),
        Some(Arc::new(gateway)),
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn facade(rows: Vec<Value>) -> ResourceFacade<Event> {
    let service = Arc::new(InMemoryHostedService::new().with_rows(ResourceKind::Events, rows));
    ResourceFacade::new(
        Arc::new(ClientManager::new(
            Arc::new(ClientSlot::new()),
            Arc::new(InMemoryClientFactory::new(service)),
            ReadinessBudget::new(Duration::from_millis(1), 1),
        )),
        BackendSelector::new(DeploymentSignals::detect("newsroom.github.io", "/events.html")),
        None,
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn event_row_mapping_is_lossless(event in arb_event()) {
        prop_assert_eq!(Event::from_row(event.to_row()), event.clone());
        prop_assert_eq!(json_round_trip(&event), event);
    }

    #[test]
    fn article_row_mapping_is_lossless(article in arb_article()) {
        prop_assert_eq!(Article::from_row(article.to_row()), article.clone());
        prop_assert_eq!(json_round_trip(&article), article);
    }

    #[test]
    fn page_window_is_always_clamped(page in any::<i64>(), page_size in any::<i64>()) {
        let window = PageWindow::compute(page, page_size);
        prop_assert!(window.page() >= 1);
        prop_assert!((1..=MAX_PAGE_SIZE).contains(&window.page_size()));
        let (from, to) = window.range();
        prop_assert_eq!(to - from + 1, window.limit());
    }

    #[test]
    fn ranged_query_matches_sliced_listing(
        rows in arb_event_rows(),
        page in -2i64..12,
        page_size in -1i64..30,
        only_published in any::<bool>(),
    ) {
        let runtime = runtime();
        let events = facade(rows);
        let status = only_published.then_some(PublishStatus::Published);

        let (ranged, full) = runtime.block_on(async {
            (
                events.get_page(status, page, page_size).await.unwrap(),
                events.list(status).await.unwrap(),
            )
        });

        prop_assert_eq!(ranged, PageWindow::compute(page, page_size).slice(full));
    }

    #[test]
    fn gateway_and_hosted_pages_agree(
        events in arb_events_on_distinct_days(),
        page in -2i64..12,
        page_size in -1i64..30,
        only_published in any::<bool>(),
    ) {
        let runtime = runtime();
        let status = only_published.then_some(PublishStatus::Published);

        let (hosted, gateway) = runtime.block_on(async {
            let hosted = hosted_events(&events);
            let gateway = gateway_events(&events).await;
            (
                hosted.get_page(status, page, page_size).await.unwrap(),
                gateway.get_page(status, page, page_size).await.unwrap(),
            )
        });

        let expected_total = events
            .iter()
            .filter(|event| status.map_or(true, |s| event.status == s))
            .count() as u64;
        prop_assert_eq!(hosted.total, expected_total);
        prop_assert_eq!(hosted, gateway);
    }
}
