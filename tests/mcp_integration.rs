//! Integration tests for the MCP endpoint
//!
//! These tests verify the MCP protocol surface including:
//! - Server initialization and handshake
//! - Tool discovery and listing
//! - MCP App resource discovery and reading
//! - Tool execution (cart tools, apply-markdown)
//! - Error handling

use axum::body::Body;
use axum::http::{Request, StatusCode};
use botdojo_playground::router::create_app_router;
use botdojo_playground::state::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

/// Helper function to create a test app instance
fn create_test_app() -> axum::Router {
    let state = Arc::new(AppState::new());
    create_app_router(state)
}

/// Helper function to send a JSON-RPC request and get the response
async fn send_jsonrpc_request(
    app: &axum::Router,
    method: &str,
    params: Option<Value>,
    id: i32,
) -> (StatusCode, Value) {
    let request_body = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id
    });

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

async fn call_tool(app: &axum::Router, name: &str, arguments: Value, id: i32) -> Value {
    let (status, body) = send_jsonrpc_request(
        app,
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
        id,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_mcp_sse_endpoint() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/mcp")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(content_type, "text/event-stream");

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(body_str.contains("event: endpoint"));
    assert!(body_str.contains("data: /mcp"));
}

#[tokio::test]
async fn test_mcp_initialize() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "initialize", None, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);

    let result = &body["result"];
    assert_eq!(result["protocolVersion"], "2025-06-18");
    assert_eq!(result["serverInfo"]["name"], "botdojo-playground");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_mcp_tools_list() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "tools/list", None, 2).await;
    assert_eq!(status, StatusCode::OK);

    let tools = body["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "searchProducts",
            "getCart",
            "addToCart",
            "updateCartItem",
            "checkout",
            "apply-markdown",
            "persist-review-state",
            "get-review-state"
        ]
    );

    let apply = &tools[5];
    assert_eq!(apply["_meta"]["ui/resourceUri"], "ui://botdojo/review-native.html");
    assert!(apply["inputSchema"]["properties"]["before"].is_object());

    // No product-card bundle is built, so search advertises no widget.
    assert!(tools[0].get("_meta").is_none());
    assert_eq!(tools[1]["_meta"]["ui/resourceUri"], "ui://botdojo/bonsai-shop.html");
}

#[tokio::test]
async fn test_mcp_resources_list_and_read() {
    let app = create_test_app();

    let (_, body) = send_jsonrpc_request(&app, "resources/list", None, 3).await;
    let resources = body["result"]["resources"].as_array().unwrap();
    let uris: Vec<&str> = resources.iter().map(|r| r["uri"].as_str().unwrap()).collect();
    assert_eq!(
        uris,
        vec!["ui://botdojo/review-native.html", "ui://botdojo/bonsai-shop.html"]
    );
    assert_eq!(resources[0]["mimeType"], "text/html;profile=mcp-app");

    // Everything listed can be read.
    for (i, uri) in uris.iter().enumerate() {
        let (_, body) = send_jsonrpc_request(
            &app,
            "resources/read",
            Some(json!({ "uri": uri })),
            100 + i as i32,
        )
        .await;
        let content = &body["result"]["contents"][0];
        assert_eq!(content["uri"], *uri);
        assert!(!content["text"].as_str().unwrap().is_empty());
    }

    let (_, body) = send_jsonrpc_request(
        &app,
        "resources/read",
        Some(json!({ "uri": "ui://botdojo/review-native.html" })),
        4,
    )
    .await;
    let content = &body["result"]["contents"][0];
    assert!(content["text"].as_str().unwrap().contains("review-native"));

    let (_, body) = send_jsonrpc_request(
        &app,
        "resources/read",
        Some(json!({ "uri": "ui://botdojo/unknown.html" })),
        5,
    )
    .await;
    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn test_mcp_search_products_tool() {
    let app = create_test_app();

    let body = call_tool(&app, "searchProducts", json!({ "query": "pot", "category": "pots" }), 6).await;
    let products = body["result"]["structuredContent"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["category"] == "pots"));
}

#[tokio::test]
async fn test_mcp_cart_flow_with_checkout() {
    let app = create_test_app();

    let add = json!({
        "cartId": "mcp-cart",
        "items": [
            { "id": "bonsai-002", "name": "Juniper Starter Tree", "price": 39.5 },
            { "id": "bonsai-002", "name": "Juniper Starter Tree", "price": 39.5 },
            { "id": "bonsai-006", "name": "Concave Cutter", "price": 42.0 }
        ]
    });
    let body = call_tool(&app, "addToCart", add, 7).await;
    let items = body["result"]["structuredContent"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(body["result"]["structuredContent"]["total"], 121.0);

    let body = call_tool(&app, "checkout", json!({ "cartId": "mcp-cart" }), 8).await;
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Checked out now: 2x Juniper Starter Tree, 1x Concave Cutter"));

    let body = call_tool(&app, "getCart", json!({ "cartId": "mcp-cart" }), 9).await;
    assert_eq!(body["result"]["content"][0]["text"], "Cart is empty.");
}

#[tokio::test]
async fn test_mcp_apply_markdown_then_persist() {
    let app = create_test_app();

    let body = call_tool(
        &app,
        "apply-markdown",
        json!({ "before": "", "after": "# Draft\nteh cat", "canvasId": "doc" }),
        10,
    )
    .await;
    assert_eq!(body["result"]["structuredContent"]["content"], "# Draft\nteh cat");

    let body = call_tool(
        &app,
        "apply-markdown",
        json!({ "before": "teh cat", "after": "the cat", "canvasId": "doc" }),
        11,
    )
    .await;
    assert_eq!(body["result"]["structuredContent"]["content"], "# Draft\nthe cat");

    let body = call_tool(
        &app,
        "persist-review-state",
        json!({ "state": { "before": "teh cat", "after": "the cat", "applied": true }, "canvasId": "doc" }),
        12,
    )
    .await;
    assert_eq!(body["result"]["structuredContent"]["persisted"], true);

    // A reload reads the persisted state back.
    let body = call_tool(&app, "get-review-state", json!({ "canvasId": "doc" }), 18).await;
    let saved = &body["result"]["structuredContent"]["state"];
    assert_eq!(saved["applied"], true);
    assert_eq!(saved["after"], "the cat");
    assert_eq!(body["result"]["_meta"]["ui/resourceUri"], "ui://botdojo/review-native.html");
}

#[tokio::test]
async fn test_mcp_unknown_method() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "unknown/method", None, 13).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 13);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "Method not found");
}

#[tokio::test]
async fn test_mcp_invalid_json() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("invalid json {{{"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["error"]["message"], "Parse error");
}

#[tokio::test]
async fn test_mcp_tool_call_errors() {
    let app = create_test_app();

    let body = call_tool(&app, "unknown_tool", json!({}), 14).await;
    assert_eq!(body["error"]["code"], -32602);
    assert!(body["error"]["message"].as_str().unwrap().contains("Unknown tool"));

    let body = call_tool(&app, "addToCart", json!({ "invalid_field": "value" }), 15).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid arguments"));

    let body = call_tool(
        &app,
        "addToCart",
        json!({ "items": [{ "id": "x", "name": "Free lunch", "price": -1.0 }] }),
        16,
    )
    .await;
    assert!(body["error"]["message"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_mcp_ping() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "ping", None, 17).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 17);
    assert_eq!(body["result"], json!({}));
}
