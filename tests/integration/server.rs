//! A full MCP session over an in-memory stream.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use polymarket_predictions::config::ServerConfig;
use polymarket_predictions::server::McpServer;
use polymarket_predictions::tools::ToolDispatcher;

use crate::mock_client::MockClient;

async fn run_session(requests: &[Value]) -> Vec<Value> {
    let (mut client_side, server_side) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_side);

    let dispatcher = ToolDispatcher::new(Arc::new(MockClient::new()));
    let server = McpServer::new(ServerConfig::default(), dispatcher);
    let handle = tokio::spawn(server.run(server_read, server_write));

    for request in requests {
        let line = format!("{request}\n");
        client_side.write_all(line.as_bytes()).await.unwrap();
    }
    client_side.shutdown().await.unwrap();

    let mut out = String::new();
    client_side.read_to_string(&mut out).await.unwrap();
    handle.await.unwrap().unwrap();

    out.lines().map(|l| serde_json::from_str(l).unwrap()).collect()
}

fn by_id(responses: &[Value], id: i64) -> &Value {
    responses
        .iter()
        .find(|r| r["id"] == json!(id))
        .unwrap_or_else(|| panic!("no response for id {id}"))
}

#[tokio::test]
async fn test_handshake_list_and_call() {
    let responses = run_session(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
               "params": {"protocolVersion": "2024-11-05", "capabilities": {},
                          "clientInfo": {"name": "smoke", "version": "0.0.0"}}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized", "params": {}}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {}}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "get-market-prices", "arguments": {"market_id": "0xMOCK01"}}}),
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "get-market-info", "arguments": {}}}),
    ])
    .await;

    // The notification gets no reply.
    assert_eq!(responses.len(), 4);

    let init = by_id(&responses, 1);
    assert_eq!(init["result"]["serverInfo"]["name"], "polymarket_predictions");

    let tools: Vec<_> = by_id(&responses, 2)["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        tools,
        ["get-market-info", "list-markets", "get-market-prices", "get-market-history"]
    );

    assert_eq!(
        by_id(&responses, 3)["result"]["content"][0]["text"],
        "Current Market Prices for Event 1\n\nCurrent Price: 0.5\n---\n"
    );
    assert_eq!(
        by_id(&responses, 4)["result"]["content"][0]["text"],
        "Missing market_id parameter"
    );
}

#[tokio::test]
async fn test_tool_failures_are_results_not_protocol_errors() {
    let responses = run_session(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
               "params": {"name": "resolve-market", "arguments": {}}}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
               "params": {"name": "get-market-info", "arguments": {"market_id": "unknown"}}}),
    ])
    .await;

    for id in [1, 2] {
        let response = by_id(&responses, id);
        assert!(response.get("error").is_none());
        assert!(response["result"]["content"][0]["text"].is_string());
    }
    assert_eq!(
        by_id(&responses, 1)["result"]["content"][0]["text"],
        "Unknown tool: resolve-market"
    );
}
