//! End-to-end tool calls through `ToolDispatcher`.

use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use polymarket_predictions::tools::ToolDispatcher;
use polymarket_predictions::types::RawPayload;

use crate::mock_client::{default_markets, MockClient};

fn dispatcher(client: MockClient) -> ToolDispatcher {
    ToolDispatcher::new(Arc::new(client))
}

fn condition_ids(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|l| l.strip_prefix("Condition ID: "))
        .collect()
}

#[tokio::test]
async fn test_list_markets_default_page() {
    let out = dispatcher(MockClient::new()).dispatch("list-markets", Some(json!({}))).await;
    let text = out.as_text();

    assert!(text.starts_with("Available Markets:\n\n"));
    let ids = condition_ids(text);
    assert_eq!(ids.len(), 10);
    assert_eq!(ids[0], "0xMOCK00");
    assert_eq!(ids[9], "0xMOCK09");
    assert!(text.contains("Volume: $1,000.00\n"));
    assert!(text.contains("Volume: $10,000.00\n"));
}

#[tokio::test]
async fn test_list_markets_status_filter_and_offset() {
    let out = dispatcher(MockClient::new())
        .dispatch(
            "list-markets",
            Some(json!({"status": "active", "offset": 15, "limit": 10})),
        )
        .await;
    assert_eq!(
        condition_ids(out.as_text()),
        ["0xMOCK19", "0xMOCK21", "0xMOCK22", "0xMOCK23", "0xMOCK24"]
    );
}

#[tokio::test]
async fn test_list_markets_status_case_insensitive() {
    let out = dispatcher(MockClient::new())
        .dispatch("list-markets", Some(json!({"status": "RESOLVED"})))
        .await;
    assert_eq!(
        condition_ids(out.as_text()),
        ["0xMOCK00", "0xMOCK05", "0xMOCK10", "0xMOCK15", "0xMOCK20"]
    );
}

#[tokio::test]
async fn test_list_markets_offset_past_end() {
    let out = dispatcher(MockClient::new())
        .dispatch("list-markets", Some(json!({"offset": 100})))
        .await;
    assert_eq!(out.as_text(), "No markets available");
}

#[tokio::test]
async fn test_list_markets_string_wrapped_payload() {
    let body = json!({"data": default_markets(), "next_cursor": "MjU="}).to_string();
    let client = MockClient::with_listing(RawPayload::Text(body));

    let out = dispatcher(client)
        .dispatch("list-markets", Some(json!({"limit": 3})))
        .await;
    assert_eq!(condition_ids(out.as_text()), ["0xMOCK00", "0xMOCK01", "0xMOCK02"]);
}

#[tokio::test]
async fn test_list_markets_bad_payloads() {
    let out = dispatcher(MockClient::with_listing(RawPayload::Text("<!doctype html>".into())))
        .dispatch("list-markets", Some(json!({})))
        .await;
    assert_eq!(out.as_text(), "Error: Invalid response format from API");

    let out = dispatcher(MockClient::with_listing(RawPayload::from(json!({"error": "rate limited"}))))
        .dispatch("list-markets", Some(json!({})))
        .await;
    assert_eq!(out.as_text(), "Error: Unexpected response format from API");
}

#[tokio::test]
async fn test_market_info() {
    let client = MockClient::new().with_market(
        "0xINFO",
        json!({
            "condition_id": "0xINFO",
            "title": "Will it snow?",
            "status": "active",
            "resolution_date": "2027-01-01",
        }),
    );
    let out = dispatcher(client)
        .dispatch("get-market-info", Some(json!({"market_id": "0xINFO"})))
        .await;
    assert_eq!(
        out.as_text(),
        "Condition ID: 0xINFO\nTitle: Will it snow?\nStatus: active\nResolution Date: 2027-01-01\n---"
    );
}

#[tokio::test]
async fn test_market_prices() {
    let out = dispatcher(MockClient::new())
        .dispatch("get-market-prices", Some(json!({"market_id": "0xMOCK03"})))
        .await;
    assert_eq!(
        out.as_text(),
        "Current Market Prices for Event 3\n\nCurrent Price: 0.5\n---\n"
    );
}

#[tokio::test]
async fn test_market_history_last_five_points() {
    let out = dispatcher(MockClient::new())
        .dispatch(
            "get-market-history",
            Some(json!({"market_id": "0xMOCK04", "timeframe": "1d"})),
        )
        .await;
    let text = out.as_text();

    assert!(text.starts_with("Historical Data for Event 4\n"));
    assert!(!text.contains("2026-10-01"));
    let times: Vec<_> = text.lines().filter_map(|l| l.strip_prefix("Time: ")).collect();
    assert_eq!(times.len(), 5);
    assert_eq!(times[0], "2026-10-02T00:00:00Z");
    assert_eq!(times[4], "2026-10-06T00:00:00Z");
}

#[tokio::test]
async fn test_missing_market_id_never_calls_upstream() {
    let client = MockClient::new();
    let calls = client.call_counter();
    let d = dispatcher(client);

    for tool in ["get-market-info", "get-market-prices", "get-market-history"] {
        for args in [json!({}), json!({"market_id": ""}), json!({"other": "x"})] {
            let out = d.dispatch(tool, Some(args)).await;
            assert_eq!(out.as_text(), "Missing market_id parameter");
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_tool_never_calls_upstream() {
    let client = MockClient::new();
    let calls = client.call_counter();

    let out = dispatcher(client).dispatch("place-order", Some(json!({"market_id": "x"}))).await;
    assert_eq!(out.as_text(), "Unknown tool: place-order");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_one_upstream_call_per_invocation() {
    let client = MockClient::new();
    let calls = client.call_counter();
    let d = dispatcher(client);

    d.dispatch("list-markets", Some(json!({"status": "active"}))).await;
    d.dispatch("get-market-info", Some(json!({"market_id": "0xMOCK01"}))).await;
    d.dispatch("get-market-history", Some(json!({"market_id": "0xMOCK01"}))).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_upstream_errors_become_text() {
    let out = dispatcher(MockClient::new())
        .dispatch("get-market-info", Some(json!({"market_id": "nope"})))
        .await;
    assert_eq!(out.as_text(), "Error executing tool: API error 404: market not found: nope");

    let out = dispatcher(MockClient::unconfigured())
        .dispatch("list-markets", Some(json!({})))
        .await;
    assert_eq!(
        out.as_text(),
        "Error executing tool: Missing KEY or FUNDER. Set them in your environment (see env.local)."
    );
}

#[tokio::test]
async fn test_concurrent_calls_share_dispatcher() {
    let d = dispatcher(MockClient::new());
    let mut tasks = tokio::task::JoinSet::new();

    for i in 0..20 {
        let d = d.clone();
        tasks.spawn(async move {
            let id = format!("0xMOCK{:02}", i);
            let out = d.dispatch("get-market-info", Some(json!({ "market_id": id.clone() }))).await;
            (id, out.as_text().to_string())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (id, text) = joined.unwrap();
        assert!(text.starts_with(&format!("Condition ID: {id}\n")));
    }
}

#[tokio::test]
async fn test_every_response_is_single_text_item() {
    let d = dispatcher(MockClient::new());
    let calls: [(&str, Option<Value>); 5] = [
        ("list-markets", Some(json!({}))),
        ("list-markets", None),
        ("get-market-info", Some(json!({}))),
        ("get-market-prices", Some(json!({"market_id": "nope"}))),
        ("bogus", Some(json!({}))),
    ];

    for (name, args) in calls {
        let value = serde_json::to_value(d.dispatch(name, args).await).unwrap();
        let content = value["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
    }
}

#[tokio::test]
async fn test_whitespace_market_id_reaches_upstream() {
    let client = MockClient::new();
    let calls = client.call_counter();

    let out = dispatcher(client)
        .dispatch("get-market-info", Some(json!({"market_id": "   "})))
        .await;
    assert_eq!(out.as_text(), "Error executing tool: API error 404: market not found:    ");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
