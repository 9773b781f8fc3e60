//! Deployment read tests against an in-memory API
//!
//! These exercise the whole read path: identity resolution, root projection,
//! child discovery, flattening and cluster sizes, plus what reaches the
//! state file for each outcome.

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{deployment, network, view, vm, Call, FakeApi, CHILD_HREF};
use serde_json::json;
use vra_state::error::{ApiError, ReadError};
use vra_state::resource::{read_deployment, ReadContext, ReadRequest};
use vra_state::state::{StateChange, StateStore};

fn jan_first() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

fn ctx() -> ReadContext {
    ReadContext::new(jan_first())
}

fn inline_view() -> serde_json::Value {
    view(vec![
        deployment(Some("2023-01-11T00:00:00Z"), None),
        vm("web-1", "web", "10.0.0.1"),
        network("net-1"),
        vm("db-1", "db", "10.0.0.2"),
        vm("web-2", "web", "10.0.0.3"),
    ])
}

#[tokio::test]
async fn test_missing_identifier_makes_no_calls() {
    let api = FakeApi::new(inline_view());

    for request in [
        ReadRequest::default(),
        ReadRequest::new(Some(String::new()), Some(String::new())),
    ] {
        let result = read_deployment(&api, &request, &ctx()).await;
        assert!(matches!(result, Err(ReadError::MissingIdentifier)));
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_resolved_request_id_is_used_for_fetch() {
    let mut api = FakeApi::new(inline_view());
    api.resolved = Some("req-resolved".to_string());

    let request = ReadRequest::new(Some("req-stale".to_string()), Some("dep-1".to_string()));
    let record = read_deployment(&api, &request, &ctx()).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::Resolve("dep-1".to_string()),
            Call::View("req-resolved".to_string())
        ]
    );
    assert_eq!(record.id, "req-resolved");
}

#[tokio::test]
async fn test_failed_resolution_stops_the_read() {
    let mut api = FakeApi::new(inline_view());
    api.resolved = None;

    let result = read_deployment(&api, &ReadRequest::by_deployment_id("dep-1"), &ctx()).await;
    assert!(matches!(
        result,
        Err(ReadError::IdentityResolutionFailed {
            source: ApiError::MissingField("requestId"),
            ..
        })
    ));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_projects_root_and_inline_children() {
    let api = FakeApi::new(inline_view());
    let record = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert_eq!(record.id, "req-1");
    assert_eq!(record.deployment_id.as_deref(), Some("dep-1"));
    assert_eq!(record.name.as_deref(), Some("CentOS-001"));
    assert_eq!(record.catalog_item_name.as_deref(), Some("CentOS 7"));
    assert_eq!(record.request_status.as_deref(), Some("ACTIVE"));
    assert_eq!(record.owners.len(), 1);
    assert_eq!(record.owners[0].id.as_deref(), Some("jdoe@vsphere.local"));
    assert_eq!(record.lease_start, jan_first());
    assert_eq!(record.lease_days, Some(10));

    let names: Vec<_> = record
        .resource_configuration
        .iter()
        .map(|c| (c.name.as_deref().unwrap(), c.cluster_size))
        .collect();
    assert_eq!(names, vec![("web-1", 2), ("db-1", 1), ("web-2", 2)]);

    // Inline children never trigger a follow-up fetch
    assert_eq!(api.calls(), vec![Call::View("req-1".to_string())]);
}

#[tokio::test]
async fn test_unknown_types_are_skipped() {
    let api = FakeApi::new(inline_view());
    let record = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert!(record
        .resource_configuration
        .iter()
        .all(|c| c.name.as_deref() != Some("net-1") && c.component_name != "net"));
}

#[tokio::test]
async fn test_perpetual_lease_has_null_days() {
    let api = FakeApi::new(view(vec![
        deployment(None, None),
        vm("web-1", "web", "10.0.0.1"),
    ]));
    let record = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert_eq!(record.lease_end, None);
    assert_eq!(record.lease_days, None);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["lease_days"], json!(null));
    assert_eq!(json["lease_end"], json!(null));
}

#[tokio::test]
async fn test_follows_child_resources_link() {
    let api = FakeApi::new(view(vec![deployment(None, Some(CHILD_HREF))])).with_children(view(
        vec![
            vm("app-1", "app", "10.0.1.1"),
            vm("app-2", "app", "10.0.1.2"),
            network("net-1"),
        ],
    ));

    let record = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::View("req-1".to_string()),
            Call::Children(CHILD_HREF.to_string())
        ]
    );
    assert_eq!(record.resource_configuration.len(), 2);
    assert!(record
        .resource_configuration
        .iter()
        .all(|c| c.cluster_size == 2 && c.parent_resource_id.as_deref() == Some("dep-1")));
}

#[tokio::test]
async fn test_empty_children_clear_the_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));

    let seed = FakeApi::new(inline_view());
    let seeded = read_deployment(&seed, &ReadRequest::by_id("req-1"), &ctx()).await;
    assert_eq!(store.apply(&seeded).unwrap(), StateChange::Recorded);

    let api = FakeApi::new(view(vec![deployment(None, Some(CHILD_HREF))]))
        .with_children(json!({"content": []}));
    let outcome = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx()).await;

    assert!(matches!(outcome, Err(ReadError::ResourceNotFound { .. })));
    assert_eq!(store.apply(&outcome).unwrap(), StateChange::Cleared);

    let state = store.load().unwrap();
    assert_eq!(state.id, None);
    assert_eq!(state.deployment, None);
}

#[tokio::test]
async fn test_child_fetch_failure_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    let seed = FakeApi::new(inline_view());
    let seeded = read_deployment(&seed, &ReadRequest::by_id("req-1"), &ctx()).await;
    store.apply(&seeded).unwrap();

    let api = FakeApi::new(view(vec![deployment(None, Some(CHILD_HREF))])).failing_children(503);
    let outcome = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx()).await;

    match &outcome {
        Err(ReadError::ChildResourceFetchFailed { href, source }) => {
            assert_eq!(href, CHILD_HREF);
            assert!(matches!(source, ApiError::Status { status: 503 }));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(store.apply(&outcome).unwrap(), StateChange::Unchanged);
    assert_eq!(store.load().unwrap().id.as_deref(), Some("req-1"));
}

#[tokio::test]
async fn test_machine_without_ip_is_malformed() {
    let mut broken = vm("web-1", "web", "10.0.0.1");
    broken["data"]
        .as_object_mut()
        .unwrap()
        .remove("ip_address");

    let api = FakeApi::new(view(vec![deployment(None, None), broken]));
    let result = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx()).await;

    match result {
        Err(ReadError::MalformedResourceData { resource, reason }) => {
            assert_eq!(resource, "web-1-id");
            assert!(reason.contains("ip_address"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_oddly_shaped_unknown_child_is_skipped() {
    let mut odd = network("net-1");
    odd["owners"] = json!(["jdoe@vsphere.local"]);
    odd["links"] = json!("not a list");
    odd["hasChildren"] = json!("yes");

    let api = FakeApi::new(view(vec![
        deployment(None, None),
        vm("web-1", "web", "10.0.0.1"),
        odd,
    ]));
    let record = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert_eq!(record.resource_configuration.len(), 1);
    assert_eq!(record.resource_configuration[0].name.as_deref(), Some("web-1"));
    assert_eq!(record.resource_configuration[0].cluster_size, 1);
}

#[tokio::test]
async fn test_root_with_bare_owner_names() {
    let mut root = deployment(None, None);
    root["owners"] = json!(["jdoe@vsphere.local"]);

    let api = FakeApi::new(view(vec![root]));
    let record = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert_eq!(record.owners.len(), 1);
    assert_eq!(record.owners[0].id.as_deref(), Some("jdoe@vsphere.local"));
    assert_eq!(record.owners[0].name, None);
}

#[tokio::test]
async fn test_misshapen_machine_is_malformed_not_a_fetch_failure() {
    let mut broken = vm("web-1", "web", "10.0.0.1");
    broken["data"] = json!(["not", "a", "bag"]);

    let api = FakeApi::new(view(vec![deployment(None, None), broken]));
    let result = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx()).await;

    match result {
        Err(ReadError::MalformedResourceData { resource, .. }) => assert_eq!(resource, "web-1-id"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_view_without_deployment_is_not_found() {
    let api = FakeApi::new(view(vec![vm("web-1", "web", "10.0.0.1")]));
    let result = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx()).await;
    assert!(matches!(result, Err(ReadError::ResourceNotFound { .. })));
}

#[tokio::test]
async fn test_view_fetch_failure() {
    let mut api = FakeApi::new(inline_view());
    api.view = Err(404);

    let result = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx()).await;
    assert!(matches!(
        result,
        Err(ReadError::ResourceViewFetchFailed { ref request_id, .. }) if request_id == "req-1"
    ));
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let api = FakeApi::new(view(vec![deployment(None, Some(CHILD_HREF))])).with_children(view(
        vec![
            vm("web-1", "web", "10.0.0.1"),
            vm("db-1", "db", "10.0.0.2"),
            vm("web-2", "web", "10.0.0.3"),
        ],
    ));

    let first = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();
    let second = read_deployment(&api, &ReadRequest::by_id("req-1"), &ctx())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}
