mod common;
use common::{harness, harness_with, sample_args, ENV_LOCK, TEST_BASE_URL};

use serde_json::Value;
use websets_mcp::config::WebsetsConfig;
use websets_mcp::mcp::catalog::tool_catalog;

#[tokio::test]
async fn missing_required_fields_never_reach_the_network() {
    let h = harness();
    for tool in tool_catalog() {
        let required = tool.required_fields();
        if required.is_empty() {
            continue;
        }
        let mut args = sample_args(&tool.input_schema);
        let dropped = required[0];
        args.as_object_mut().expect("object").remove(dropped);

        let envelope = h.app.invoke(&tool.name, args).await.to_value();
        assert_eq!(envelope["success"], Value::Bool(false), "{}", tool.name);
        assert_eq!(envelope["errorKind"], "validation", "{}", tool.name);
        let message = envelope["error"].as_str().unwrap_or_default();
        assert!(
            message.contains(&format!("missing required field '{}'", dropped)),
            "{}: {}",
            tool.name,
            message
        );
    }
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn sample_arguments_pass_validation_for_every_operation() {
    let h = harness();
    for tool in tool_catalog() {
        let envelope = h
            .app
            .invoke(&tool.name, sample_args(&tool.input_schema))
            .await
            .to_value();
        assert_ne!(envelope["errorKind"], "validation", "{}: {}", tool.name, envelope);
    }
    assert_eq!(h.transport.calls(), tool_catalog().len());
}

#[tokio::test]
async fn unsupported_webhook_event_is_rejected_before_any_call() {
    let h = harness();
    let envelope = h
        .app
        .invoke(
            "create_webhook",
            serde_json::json!({
                "url": "https://hooks.example.com/websets",
                "events": ["webset.created", "webset.exploded"]
            }),
        )
        .await
        .to_value();
    assert_eq!(envelope["success"], Value::Bool(false));
    let message = envelope["error"].as_str().unwrap_or_default();
    assert!(message.contains("webset.exploded"), "{}", message);
    assert!(message.contains("/events/1"), "{}", message);
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn unexpected_field_is_rejected_with_suggestion() {
    let h = harness();
    let envelope = h
        .app
        .invoke(
            "list_webset_items",
            serde_json::json!({"websetId": "ws_1", "verificationStatu": "verified"}),
        )
        .await
        .to_value();
    assert_eq!(envelope["errorKind"], "validation");
    assert!(envelope["hint"]
        .as_str()
        .unwrap_or_default()
        .contains("verificationStatus"));
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn wrong_types_and_out_of_range_limits_are_rejected() {
    let h = harness();
    let envelope = h
        .app
        .invoke("list_websets", serde_json::json!({"limit": "ten"}))
        .await
        .to_value();
    assert!(envelope["error"]
        .as_str()
        .unwrap_or_default()
        .contains("/limit: expected integer"));

    let envelope = h
        .app
        .invoke("list_websets", serde_json::json!({"limit": 500}))
        .await
        .to_value();
    assert_eq!(envelope["errorKind"], "validation");
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn malformed_search_pattern_is_a_validation_error() {
    let h = harness();
    let envelope = h
        .app
        .invoke(
            "search_items",
            serde_json::json!({"websetId": "ws_1", "titlePattern": "(unclosed"}),
        )
        .await
        .to_value();
    assert_eq!(envelope["errorKind"], "validation");
    assert!(envelope["error"]
        .as_str()
        .unwrap_or_default()
        .contains("titlePattern"));
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn missing_api_key_fails_without_network() {
    let _guard = ENV_LOCK.lock().await;
    let previous = std::env::var("EXA_API_KEY").ok();
    std::env::remove_var("EXA_API_KEY");

    let h = harness_with(WebsetsConfig::default().with_base_url(TEST_BASE_URL));
    let envelope = h.app.invoke("list_websets", Value::Null).await.to_value();
    assert_eq!(envelope["errorKind"], "validation");
    assert!(envelope["hint"]
        .as_str()
        .unwrap_or_default()
        .contains("EXA_API_KEY"));
    assert_eq!(h.transport.calls(), 0);

    if let Some(value) = previous {
        std::env::set_var("EXA_API_KEY", value);
    }
}

#[tokio::test]
async fn api_key_falls_back_to_environment() {
    let _guard = ENV_LOCK.lock().await;
    let previous = std::env::var("EXA_API_KEY").ok();
    std::env::set_var("EXA_API_KEY", "env-key-abcdef");

    let h = harness_with(WebsetsConfig::default().with_base_url(TEST_BASE_URL));
    h.transport
        .push_json(200, serde_json::json!({"data": [], "hasMore": false}));
    let envelope = h.app.invoke("list_websets", Value::Null).await.to_value();
    assert_eq!(envelope["success"], Value::Bool(true));
    assert_eq!(
        h.transport.last_request().header("x-api-key"),
        Some("env-key-abcdef")
    );

    match previous {
        Some(value) => std::env::set_var("EXA_API_KEY", value),
        None => std::env::remove_var("EXA_API_KEY"),
    }
}
