use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};

use storefront_bot::assistant::{Assistant, GENERAL_REPLY};
use storefront_bot::catalog::{Catalog, CatalogState};
use storefront_bot::client::HttpTransport;
use storefront_bot::faq::FaqDocument;
use storefront_bot::intent::IntentRouter;
use storefront_bot::search::SearchParams;
use storefront_bot::server::{build_router, AppState};
use storefront_bot::widget::{ChatWidget, Role};

const FAQ: &str = "## Shipping\n\nOrders ship within 2 business days.\n\n\
## Returns & Refunds\n\nReturn unworn items within 30 days.\n\n\
## Washing & Care\n\nWash cold, dry flat.\n";

const CATALOG: &str = r#"{
  "products": [
    { "title": "Cotton Romper", "handle": "cotton-romper", "tags": ["silk"] },
    { "title": "Silk Onesie", "handle": "silk-onesie", "variants": [{"price": "49.00"}] }
  ]
}"#;

async fn spawn_server(catalog: CatalogState) -> SocketAddr {
    let assistant = Assistant::new(
        IntentRouter::default(),
        FaqDocument::new(FAQ),
        catalog,
        "shop.example",
        SearchParams {
            limit: 5,
            max_limit: 10,
        },
    );
    let app = build_router(AppState::new(Arc::new(assistant)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn ready_catalog() -> CatalogState {
    CatalogState::Ready(Catalog::from_json(CATALOG).unwrap())
}

async fn post_chat(addr: SocketAddr, body: String) -> Value {
    reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_chat_shipping_reply() {
    let addr = spawn_server(ready_catalog()).await;
    let resp = post_chat(addr, json!({"message": "When will my order ship?"}).to_string()).await;
    assert_eq!(resp["reply"], "Orders ship within 2 business days.");
    assert!(resp.get("ui").is_none());
}

#[tokio::test]
async fn test_chat_escalation_directive() {
    let addr = spawn_server(ready_catalog()).await;
    let resp = post_chat(addr, json!({"message": "talk to an agent"}).to_string()).await;
    assert_eq!(resp["ui"]["kind"], "escalation_form");
}

#[tokio::test]
async fn test_chat_malformed_body_is_empty_message() {
    let addr = spawn_server(ready_catalog()).await;
    for body in ["garbage", "{}", r#"{"message": null}"#, ""] {
        let resp = post_chat(addr, body.to_string()).await;
        assert_eq!(resp["reply"], GENERAL_REPLY, "body: {:?}", body);
    }
}

#[tokio::test]
async fn test_chat_product_list() {
    let addr = spawn_server(ready_catalog()).await;
    let resp = post_chat(addr, json!({"message": "I want a silk onesie"}).to_string()).await;
    assert_eq!(resp["ui"]["kind"], "product_list");
    assert_eq!(resp["products"][0]["title"], "Silk Onesie");
    assert_eq!(resp["products"][0]["price"], "49.00");
}

#[tokio::test]
async fn test_products_endpoint() {
    let addr = spawn_server(ready_catalog()).await;
    let resp: Value = reqwest::get(format!("http://{}/api/products?q=silk&limit=1", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let products = resp["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["handle"], "silk-onesie");
}

#[tokio::test]
async fn test_products_endpoint_bad_limit_uses_error_envelope() {
    let addr = spawn_server(ready_catalog()).await;
    for limit in ["abc", "-1", "0"] {
        let resp = reqwest::get(format!("http://{}/api/products?q=silk&limit={}", addr, limit))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400, "limit: {}", limit);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "bad_request", "limit: {}", limit);
        assert!(body["error"]["message"].as_str().unwrap().contains("limit"));
    }
}

#[tokio::test]
async fn test_products_endpoint_catalog_unavailable() {
    let addr = spawn_server(CatalogState::Unavailable("missing".to_string())).await;
    let resp = reqwest::get(format!("http://{}/api/products?q=silk", addr))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "catalog_unavailable");
}

#[tokio::test]
async fn test_contact_validation() {
    let addr = spawn_server(ready_catalog()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/contact", addr);

    let bad = client
        .post(&url)
        .json(&json!({"name": "Ana", "email": "", "message": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);
    let body: Value = bad.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    let ok = client
        .post(&url)
        .json(&json!({"name": "Ana", "email": "ana@example.com", "message": "Where is my parcel?"}))
        .send()
        .await
        .unwrap();
    assert!(ok.status().is_success());
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["status"], "received");
}

#[tokio::test]
async fn test_health_reports_content() {
    let addr = spawn_server(CatalogState::Unavailable("missing".to_string())).await;
    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["catalog"], "unavailable");
    assert_eq!(body["faq"], "ready");
}

#[tokio::test]
async fn test_widget_assets_served() {
    let addr = spawn_server(ready_catalog()).await;
    let page = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("/widget.js"));

    let script = reqwest::get(format!("http://{}/widget.js", addr))
        .await
        .unwrap();
    assert!(script.status().is_success());
    assert!(script.text().await.unwrap().contains("/api/chat"));
}

#[tokio::test]
async fn test_widget_over_http_transport() {
    let addr = spawn_server(ready_catalog()).await;
    let transport = HttpTransport::new(&format!("http://{}", addr));

    let mut widget = ChatWidget::new();
    widget.toggle();
    let reply = widget
        .send(&transport, "How do I wash my items?")
        .await
        .unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.text, "Wash cold, dry flat.");
    assert!(widget.suggestions().is_empty());
}
