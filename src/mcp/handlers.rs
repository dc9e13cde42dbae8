//! MCP (Model Context Protocol) route handlers
//!
//! This module implements the MCP endpoint that agents and MCP App hosts
//! talk to. `handle_tool_call` is public so tests can drive tools without
//! going through HTTP.

use super::{helpers::*, models::*};
use crate::cart::{helpers::*, models::*};
use crate::catalog::search::filter_products;
use crate::mcp_app::{app_from_uri, resource_uri, MCP_APP_MIME_TYPE};
use crate::state::{AppState, SharedState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp", post(handle_mcp).get(handle_mcp_sse)) // Standard endpoint
        .route("/mcp/", post(handle_mcp).get(handle_mcp_sse)) // Trailing slash safety
}

/// Handle SSE (Server-Sent Events) handshake for GET requests
async fn handle_mcp_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

/// Endpoint: POST /mcp
/// Handles the Model Context Protocol communication for POST requests.
async fn handle_mcp(
    State(state): State<SharedState>,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let req = match body {
        Ok(Json(r)) => r,
        Err(e) => {
            warn!("JSON Parse Error: {}", e.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method_name = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);

    debug!("MCP Call: {} (id: {})", method_name, id);

    let response_body = match method_name {
        "initialize" => rpc_success(id, handle_initialize()),
        "notifications/initialized" => rpc_success(id, json!({})),
        "tools/list" => rpc_success(id, handle_tools_list(&state).await),
        "resources/list" => rpc_success(id, handle_resources_list(&state).await),
        "resources/read" => match handle_resources_read(&state, &params).await {
            Ok(result) => rpc_success(id, result),
            Err(msg) => rpc_error(id, INVALID_PARAMS, msg),
        },
        "tools/call" => {
            let tool_name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
            let args = params.get("arguments").cloned().unwrap_or(json!({}));

            match handle_tool_call(&state, tool_name, args).await {
                Ok(result) => rpc_success(id, result),
                Err(msg) => rpc_error(id, INVALID_PARAMS, msg),
            }
        }
        "ping" => rpc_success(id, json!({})),
        _ => {
            warn!("Unknown method: {}", method_name);
            rpc_error(id, METHOD_NOT_FOUND, "Method not found")
        }
    };

    Json(response_body).into_response()
}

// =============================================================================
// MCP Method Handlers
// =============================================================================

/// Handles `initialize` request (Handshake).
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false },
            "resources": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn cart_id_schema() -> Value {
    json!({ "type": "string", "description": "Cart identifier (defaults to the shop cart)" })
}

/// Handles `tools/list` request.
///
/// Tools point at their MCP App only when its bundle is built.
async fn handle_tools_list(state: &AppState) -> Value {
    let built = state.built_apps().await;
    let tools: Vec<Value> = [
        (search_products_tool(), "product-card"),
        (get_cart_tool(), "bonsai-shop"),
        (add_to_cart_tool(), "bonsai-shop"),
        (update_cart_item_tool(), "bonsai-shop"),
        (checkout_tool(), "bonsai-shop"),
        (apply_markdown_tool(), "review-native"),
        (persist_state_tool(), "review-native"),
        (get_review_state_tool(), "review-native"),
    ]
    .into_iter()
    .map(|(tool, app)| with_widget(tool, app, &built))
    .collect();
    json!({ "tools": tools })
}

fn search_products_tool() -> Value {
    json!({
        "name": SEARCH_PRODUCTS_TOOL,
        "title": "Search products",
        "description": "Searches the Bonsai Shop catalog by text and category.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "category": { "type": "string", "default": "all" }
            }
        }
    })
}

fn get_cart_tool() -> Value {
    json!({
        "name": GET_CART_TOOL,
        "title": "Get cart",
        "description": "Returns the items in the cart and its total.",
        "inputSchema": {
            "type": "object",
            "properties": { "cartId": cart_id_schema() }
        }
    })
}

fn add_to_cart_tool() -> Value {
    json!({
        "name": ADD_TO_CART_TOOL,
        "title": "Add items to cart",
        "description": "Adds products to the cart; adding a product already there increases its quantity.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["id", "name"],
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "price": { "type": "number", "minimum": 0 },
                            "category": { "type": "string" },
                            "quantity": { "type": "integer", "default": 1, "minimum": 1 }
                        },
                        "additionalProperties": true
                    }
                },
                "cartId": cart_id_schema()
            },
            "required": ["items"]
        }
    })
}

fn update_cart_item_tool() -> Value {
    json!({
        "name": UPDATE_CART_ITEM_TOOL,
        "title": "Update cart item",
        "description": "Sets a product's quantity; zero removes it.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "productId": { "type": "string" },
                "quantity": { "type": "integer" },
                "cartId": cart_id_schema()
            },
            "required": ["productId", "quantity"]
        }
    })
}

fn checkout_tool() -> Value {
    json!({
        "name": CHECKOUT_TOOL,
        "title": "Checkout",
        "description": "Checks out the cart, clearing it and returning a receipt.",
        "inputSchema": {
            "type": "object",
            "properties": { "cartId": cart_id_schema() }
        }
    })
}

fn apply_markdown_tool() -> Value {
    json!({
        "name": APPLY_MARKDOWN_TOOL,
        "title": "Apply markdown edit",
        "description": "Replaces `before` with `after` in a canvas document.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "before": { "type": "string" },
                "after": { "type": "string" },
                "summary": { "type": "string" },
                "canvasId": { "type": "string" }
            },
            "required": ["after"]
        }
    })
}

fn persist_state_tool() -> Value {
    json!({
        "name": PERSIST_STATE_TOOL,
        "title": "Persist review state",
        "description": "Stores the review widget's state so it survives a reload.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "state": { "type": "object" },
                "canvasId": { "type": "string" }
            },
            "required": ["state"]
        }
    })
}

fn get_review_state_tool() -> Value {
    json!({
        "name": GET_REVIEW_STATE_TOOL,
        "title": "Get review state",
        "description": "Returns the review widget state last persisted for a canvas.",
        "inputSchema": {
            "type": "object",
            "properties": { "canvasId": { "type": "string" } }
        }
    })
}

/// Handles `resources/list` request. Unbuilt bundles are not listed.
async fn handle_resources_list(state: &AppState) -> Value {
    let resources: Vec<Value> = state
        .built_apps()
        .await
        .into_iter()
        .map(|name| {
            json!({
                "name": name,
                "uri": resource_uri(name),
                "mimeType": MCP_APP_MIME_TYPE,
            })
        })
        .collect();
    json!({ "resources": resources })
}

/// Handles `resources/read` request.
async fn handle_resources_read(state: &AppState, params: &Value) -> Result<Value, String> {
    let uri = params
        .get("uri")
        .and_then(Value::as_str)
        .ok_or_else(|| "Missing resource uri".to_string())?;
    let app = app_from_uri(uri).ok_or_else(|| format!("Unknown resource: {uri}"))?;
    let html = state.load_app_html(app).await.map_err(|e| e.to_string())?;

    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": MCP_APP_MIME_TYPE,
            "text": html,
        }]
    }))
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Handles `tools/call` request (Business Logic).
pub async fn handle_tool_call(state: &AppState, name: &str, args: Value) -> Result<Value, String> {
    let (result, app) = match name {
        SEARCH_PRODUCTS_TOOL => (handle_search_products_tool(state, args), "product-card"),
        GET_CART_TOOL => (handle_get_cart_tool(state, args), "bonsai-shop"),
        ADD_TO_CART_TOOL => (handle_add_to_cart_tool(state, args).await, "bonsai-shop"),
        UPDATE_CART_ITEM_TOOL => (handle_update_cart_item_tool(state, args).await, "bonsai-shop"),
        CHECKOUT_TOOL => (handle_checkout_tool(state, args).await, "bonsai-shop"),
        APPLY_MARKDOWN_TOOL => (handle_apply_markdown_tool(state, args), "review-native"),
        PERSIST_STATE_TOOL => (handle_persist_state_tool(state, args), "review-native"),
        GET_REVIEW_STATE_TOOL => (handle_get_review_state_tool(state, args), "review-native"),
        _ => return Err(format!("Unknown tool: {}", name)),
    };
    let result = result?;
    Ok(with_widget(result, app, &state.built_apps().await))
}

fn handle_search_products_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: SearchProductsInput = parse_args(args)?;
    let products = filter_products(
        &state.catalog,
        input.query.as_deref(),
        input.category.as_deref(),
    );
    let message = format!("Found {} product(s).", products.len());
    Ok(tool_result(message, json!({ "products": products })))
}

fn handle_get_cart_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: CartRef = parse_args(args)?;
    let cart_id = cart_id_or_default(input.cart_id);
    let view = cart_view(&cart_id, state.carts.items(&cart_id));
    let message = if view.items.is_empty() {
        "Cart is empty.".to_string()
    } else {
        format!("Cart: {}", format_item_summary(&view.items))
    };
    Ok(tool_result(message, json!(view)))
}

/// Handles the addToCart tool functionality
async fn handle_add_to_cart_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: AddToCartInput = parse_args(args)?;
    let cart_id = cart_id_or_default(input.cart_id);

    let items = state
        .carts
        .add(&cart_id, input.items)
        .await
        .map_err(|e| e.to_string())?;

    let message = format!("Cart {} now has {} item(s).", cart_id, items.len());
    Ok(tool_result(message, json!(cart_view(&cart_id, items))))
}

async fn handle_update_cart_item_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: UpdateCartItemInput = parse_args(args)?;
    let cart_id = cart_id_or_default(input.cart_id);

    let items = state
        .carts
        .update_quantity(&cart_id, &input.product_id, input.quantity)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{} is not in cart {}", input.product_id, cart_id))?;

    let message = format!("Cart {} now has {} item(s).", cart_id, items.len());
    Ok(tool_result(message, json!(cart_view(&cart_id, items))))
}

/// Handles the checkout tool functionality
async fn handle_checkout_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: CartRef = parse_args(args)?;
    let cart_id = cart_id_or_default(input.cart_id);

    let items = state.carts.clear(&cart_id).await.map_err(|e| e.to_string())?;
    let message = if items.is_empty() {
        "Cart is empty.".to_string()
    } else {
        let message = format!("Checked out now: {}", format_item_summary(&items));
        info!("BACKEND CHECKOUT: {}", message);
        message
    };

    Ok(tool_result(
        message,
        json!({ "cartId": cart_id, "items": [], "checkout": true, "orderId": new_order_id() }),
    ))
}

fn handle_apply_markdown_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: ApplyMarkdownInput = parse_args(args)?;
    let canvas_id = canvas_or_default(input.canvas_id);

    let content = {
        let mut canvas = state.canvases.entry(canvas_id.clone()).or_default();
        let updated = apply_edit(&canvas, &input.before, &input.after)
            .ok_or_else(|| format!("Text to replace not found in canvas {canvas_id}"))?;
        *canvas = updated.clone();
        updated
    };

    info!(%canvas_id, "applied markdown edit");
    Ok(tool_result(
        "Edit applied.",
        json!({ "canvasId": canvas_id, "applied": true, "content": content }),
    ))
}

fn canvas_or_default(canvas_id: Option<String>) -> String {
    canvas_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_CANVAS_ID.to_string())
}

fn handle_get_review_state_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: CanvasRef = parse_args(args)?;
    let key = canvas_or_default(input.canvas_id);
    let saved = state.widget_states.get(&key).map(|s| s.value().clone());

    let message = if saved.is_some() {
        "State found."
    } else {
        "No saved state."
    };
    Ok(tool_result(
        message,
        json!({ "canvasId": key, "state": saved.unwrap_or(Value::Null) }),
    ))
}

fn handle_persist_state_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: PersistStateInput = parse_args(args)?;
    let key = canvas_or_default(input.canvas_id.filter(|id| !id.is_empty()).or_else(|| {
        input
            .state
            .get("canvasId")
            .and_then(Value::as_str)
            .map(str::to_string)
    }));

    state.widget_states.insert(key.clone(), input.state);
    Ok(tool_result(
        "State saved.",
        json!({ "canvasId": key, "persisted": true }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cart_tools_aggregate() {
        let state = AppState::new();
        let args = json!({
            "cartId": "t1",
            "items": [
                { "id": "bonsai-002", "name": "Juniper Starter Tree", "price": 39.5, "quantity": 2 },
                { "id": "bonsai-004", "name": "Glazed Ceramic Pot", "price": 34.0 }
            ]
        });
        handle_tool_call(&state, ADD_TO_CART_TOOL, args).await.unwrap();
        handle_tool_call(
            &state,
            ADD_TO_CART_TOOL,
            json!({ "cartId": "t1", "items": [{ "id": "bonsai-002", "name": "Juniper Starter Tree", "price": 39.5 }] }),
        )
        .await
        .unwrap();

        let cart = handle_tool_call(&state, GET_CART_TOOL, json!({ "cartId": "t1" })).await.unwrap();
        let items = cart["structuredContent"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["quantity"], 3);
        assert_eq!(cart["structuredContent"]["itemCount"], 4);

        let updated = handle_tool_call(
            &state,
            UPDATE_CART_ITEM_TOOL,
            json!({ "cartId": "t1", "productId": "bonsai-004", "quantity": 0 }),
        )
        .await
        .unwrap();
        assert_eq!(updated["structuredContent"]["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_markdown_edits_canvas() {
        let state = AppState::new();
        state.canvases.insert("doc".into(), "# Notes\nteh cat sat".into());

        let result = handle_tool_call(
            &state,
            APPLY_MARKDOWN_TOOL,
            json!({ "before": "teh cat", "after": "the cat", "canvasId": "doc" }),
        )
        .await
        .unwrap();
        assert_eq!(result["structuredContent"]["applied"], true);
        assert_eq!(*state.canvases.get("doc").unwrap(), "# Notes\nthe cat sat");

        let missing = handle_tool_call(
            &state,
            APPLY_MARKDOWN_TOOL,
            json!({ "before": "dog", "after": "cow", "canvasId": "doc" }),
        )
        .await
        .unwrap_err();
        assert!(missing.contains("not found"));
    }

    #[tokio::test]
    async fn test_persist_state_keys_by_canvas() {
        let state = AppState::new();
        handle_tool_call(
            &state,
            PERSIST_STATE_TOOL,
            json!({ "state": { "canvasId": "doc", "applied": true } }),
        )
        .await
        .unwrap();
        assert_eq!(state.widget_states.get("doc").unwrap()["applied"], true);

        let saved = handle_tool_call(&state, GET_REVIEW_STATE_TOOL, json!({ "canvasId": "doc" }))
            .await
            .unwrap();
        assert_eq!(saved["structuredContent"]["state"]["applied"], true);

        let missing = handle_tool_call(&state, GET_REVIEW_STATE_TOOL, json!({}))
            .await
            .unwrap();
        assert_eq!(missing["structuredContent"]["canvasId"], DEFAULT_CANVAS_ID);
        assert!(missing["structuredContent"]["state"].is_null());
    }
}
