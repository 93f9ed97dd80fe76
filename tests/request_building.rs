mod common;
use common::{harness, query_pairs, TEST_API_KEY};

use serde_json::Value;
use websets_mcp::mcp::catalog::HttpMethod;

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

#[tokio::test]
async fn path_placeholders_are_substituted_under_the_base_path() {
    let h = harness();
    h.app
        .invoke(
            "get_monitor_run",
            serde_json::json!({"websetId": "ws_1", "monitorId": "mon_2", "runId": "run_3"}),
        )
        .await;
    let request = h.transport.last_request();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(
        request.url.as_str(),
        "https://api.test.local/websets/v0/websets/ws_1/monitors/mon_2/runs/run_3"
    );
    assert!(request.body.is_none());
}

#[tokio::test]
async fn identifiers_with_reserved_characters_stay_in_one_segment() {
    let h = harness();
    h.app
        .invoke("get_webset", serde_json::json!({"id": "crm/acme 2024"}))
        .await;
    assert_eq!(
        h.transport.last_request().url.path(),
        "/websets/v0/websets/crm%2Facme%202024"
    );
}

#[tokio::test]
async fn list_filters_become_query_parameters() {
    let h = harness();
    h.transport
        .push_json(200, serde_json::json!({"data": [], "hasMore": false}));
    h.app
        .invoke(
            "list_webset_items",
            serde_json::json!({
                "websetId": "ws_1",
                "limit": 50,
                "verificationStatus": "verified",
                "hasEnrichments": false,
                "createdAfter": "2024-01-01T00:00:00Z",
                "metadata": {"team": "growth", "region": "emea"},
                "enrichmentStatus": {"en_1": "completed"}
            }),
        )
        .await;
    let request = h.transport.last_request();
    assert_eq!(request.url.path(), "/websets/v0/websets/ws_1/items");
    let pairs = query_pairs(&request);
    assert!(pairs.contains(&pair("limit", "50")));
    assert!(pairs.contains(&pair("verificationStatus", "verified")));
    assert!(pairs.contains(&pair("hasEnrichments", "false")));
    assert!(pairs.contains(&pair("createdAfter", "2024-01-01T00:00:00Z")));
    assert!(pairs.contains(&pair("metadata.team", "growth")));
    assert!(pairs.contains(&pair("metadata.region", "emea")));
    assert!(pairs.contains(&pair("enrichmentStatus.en_1", "completed")));
    assert!(!pairs.iter().any(|(k, _)| k == "websetId"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn unset_filters_are_not_sent() {
    let h = harness();
    h.transport
        .push_json(200, serde_json::json!({"data": [], "hasMore": false}));
    h.app
        .invoke(
            "list_websets",
            serde_json::json!({"cursor": null, "status": null}),
        )
        .await;
    let request = h.transport.last_request();
    assert!(request.url.query().is_none());
}

#[tokio::test]
async fn cursor_from_previous_page_is_forwarded_verbatim() {
    let h = harness();
    h.transport.push_json(
        200,
        serde_json::json!({"data": [{"id": "ws_1"}], "hasMore": true, "nextCursor": "cur+/=2"}),
    );
    h.transport
        .push_json(200, serde_json::json!({"data": [{"id": "ws_2"}], "hasMore": false}));

    let first = h
        .app
        .invoke("list_websets", serde_json::json!({"limit": 1}))
        .await
        .to_value();
    let cursor = first["data"]["nextCursor"].as_str().expect("cursor").to_string();
    let second = h
        .app
        .invoke("list_websets", serde_json::json!({"limit": 1, "cursor": cursor}))
        .await
        .to_value();

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(query_pairs(&requests[1]).contains(&pair("cursor", "cur+/=2")));
    assert_eq!(second["data"]["hasMore"], Value::Bool(false));
    assert!(second["data"].get("nextCursor").is_none());
}

#[tokio::test]
async fn mutations_send_a_json_body_without_path_arguments() {
    let h = harness();
    h.app
        .invoke(
            "update_webset",
            serde_json::json!({"id": "ws_1", "title": "Fintech", "metadata": {"owner": "ops"}}),
        )
        .await;
    let request = h.transport.last_request();
    assert_eq!(request.method, HttpMethod::Patch);
    assert_eq!(request.url.path(), "/websets/v0/websets/ws_1");
    assert_eq!(
        request.body,
        Some(serde_json::json!({"title": "Fintech", "metadata": {"owner": "ops"}}))
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn every_request_carries_auth_and_correlation_headers() {
    let h = harness();
    h.app
        .invoke("delete_webset", serde_json::json!({"id": "ws_1"}))
        .await;
    h.app
        .invoke("get_webset", serde_json::json!({"id": "ws_1"}))
        .await;
    let requests = h.transport.requests();
    for request in &requests {
        assert_eq!(request.header("x-api-key"), Some(TEST_API_KEY));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request
            .header("user-agent")
            .unwrap_or_default()
            .starts_with("websets-mcp/"));
        assert!(request.header("content-type").is_none());
        assert!(request.body.is_none());
    }
    let ids: Vec<_> = requests
        .iter()
        .map(|r| r.header("x-request-id").unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(requests[0].timeout.as_millis(), 30_000);
}

#[tokio::test]
async fn api_key_never_appears_in_logs() {
    let h = harness();
    h.app
        .invoke("get_webset", serde_json::json!({"id": "ws_1"}))
        .await;
    for record in h.sink.records() {
        let rendered = format!("{} {:?}", record.message, record.meta);
        assert!(!rendered.contains(TEST_API_KEY), "{}", rendered);
    }
}

#[tokio::test]
async fn search_patterns_are_applied_locally_not_sent() {
    let h = harness();
    h.transport
        .push_json(200, serde_json::json!({"data": [], "hasMore": false}));
    h.app
        .invoke(
            "search_items",
            serde_json::json!({
                "websetId": "ws_1",
                "urlPattern": "linkedin",
                "titlePattern": "Inc",
                "sourceId": "src_1"
            }),
        )
        .await;
    let request = h.transport.last_request();
    assert_eq!(query_pairs(&request), vec![pair("sourceId", "src_1")]);
}

#[tokio::test]
async fn batch_delete_sends_single_request_with_body() {
    let h = harness();
    let ids: Vec<String> = (0..25).map(|i| format!("it_{}", i)).collect();
    h.app
        .invoke(
            "batch_delete_items",
            serde_json::json!({"websetId": "ws_1", "itemIds": ids}),
        )
        .await;
    assert_eq!(h.transport.calls(), 1);
    let request = h.transport.last_request();
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.url.path(), "/websets/v0/websets/ws_1/items/batch");
    assert_eq!(
        request.body.as_ref().and_then(|b| b["itemIds"].as_array()).map(Vec::len),
        Some(25)
    );
}
