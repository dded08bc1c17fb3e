//! API client against a scripted transport: headers, caching, errors and
//! admin request shapes.

mod common;

use common::{category, detail, FakeTransport, Harness, BASE};
use serde_json::json;
use std::sync::Arc;
use tgcatalog::constants::{cache, http};
use tgcatalog::models::{CategoryPatch, Upload};
use tgcatalog::transport::{FormPart, HttpMethod, RequestBody};
use tgcatalog::{ApiClient, ClientError, ManualClock};

#[tokio::test]
async fn every_request_carries_init_data_and_json_content_type() {
    let h = Harness::new();
    h.seed_catalog();
    let api = h.api();
    api.get_categories(false).await.unwrap();

    let req = &h.transport.requests()[0];
    assert_eq!(req.url, format!("{BASE}/webapp/categories"));
    assert_eq!(req.header(http::INIT_DATA_HEADER), Some("user=1&hash=abc"));
    assert_eq!(req.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn init_data_header_is_omitted_without_init_data() {
    let transport = Arc::new(FakeTransport::default());
    transport.ok(HttpMethod::Get, "/webapp/me", json!({ "is_admin": false }));
    let mut api = ApiClient::new(BASE, transport.clone(), Arc::new(ManualClock::new(0)));
    api.set_init_data(Some(String::new()));

    let me = api.get_current_user().await.unwrap();
    assert!(!me.is_admin);
    assert!(!api.has_init_data());
    assert_eq!(transport.requests()[0].header(http::INIT_DATA_HEADER), None);
}

#[tokio::test]
async fn cached_read_skips_the_network_until_ttl() {
    let h = Harness::new();
    h.seed_catalog();
    let api = h.api();

    let first = api.get_category(1, false).await.unwrap();
    h.clock.advance(cache::TTL_MS - 1);
    let second = api.get_category(1, false).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.transport.count(HttpMethod::Get, "/webapp/category/1"), 1);

    // age == TTL counts as expired
    h.clock.advance(1);
    api.get_category(1, false).await.unwrap();
    assert_eq!(h.transport.count(HttpMethod::Get, "/webapp/category/1"), 2);
}

#[tokio::test]
async fn cache_keys_include_parameters() {
    let h = Harness::new();
    h.seed_catalog();
    let api = h.api();

    api.get_categories(false).await.unwrap();
    api.get_categories(true).await.unwrap();
    api.get_categories(true).await.unwrap();
    assert_eq!(
        h.transport.calls(),
        vec![
            "GET /webapp/categories",
            "GET /webapp/categories?include_inactive=true",
        ]
    );
}

#[tokio::test]
async fn error_message_comes_from_detail() {
    let h = Harness::new();
    h.transport.route(
        HttpMethod::Get,
        "/webapp/category/99",
        404,
        json!({ "detail": "Category not found" }),
    );
    let err = h.api().get_category(99, false).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Category not found");
}

#[tokio::test]
async fn detail_less_error_falls_back_to_status() {
    let h = Harness::new();
    h.transport
        .route(HttpMethod::Get, "/webapp/categories", 500, json!({ "error": "boom" }));
    let err = h.api().get_categories(false).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500");
}

#[tokio::test]
async fn failed_reads_are_not_cached() {
    let h = Harness::new();
    h.transport
        .route(HttpMethod::Get, "/webapp/categories", 503, json!({ "detail": "down" }));
    let api = h.api();
    assert!(api.get_categories(false).await.is_err());

    h.transport.ok(
        HttpMethod::Get,
        "/webapp/categories",
        json!([category(1, "Новости", 0)]),
    );
    assert_eq!(api.get_categories(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_category_body_is_not_found() {
    let h = Harness::new();
    h.transport
        .ok(HttpMethod::Get, "/webapp/category/5", serde_json::Value::Null);
    let err = h.api().get_category(5, false).await.unwrap_err();
    assert_eq!(err, ClientError::NotFound);
}

#[tokio::test]
async fn hard_delete_goes_in_the_query() {
    let h = Harness::new();
    h.transport.ok(
        HttpMethod::Delete,
        "/webapp/category/3?hard_delete=true",
        json!({ "success": true }),
    );
    h.transport
        .ok(HttpMethod::Delete, "/webapp/category/4", json!({ "success": true }));
    let api = h.api();

    assert!(api.delete_category(3, true).await.unwrap().success);
    assert!(api.delete_category(4, false).await.unwrap().success);
}

#[tokio::test]
async fn reorder_submits_complete_ordering() {
    let h = Harness::new();
    h.transport
        .ok(HttpMethod::Post, "/webapp/category/1/items/reorder", json!({ "ok": true }));
    h.api().reorder_items(1, &[12, 10, 11]).await.unwrap();

    let req = &h.transport.requests()[0];
    assert_eq!(req.body, RequestBody::Json(json!({ "item_ids": [12, 10, 11] })));
}

#[tokio::test]
async fn mutations_clear_the_read_cache() {
    let h = Harness::new();
    h.seed_catalog();
    h.transport
        .ok(HttpMethod::Put, "/webapp/category/1", detail(1, "Новости 2", vec![]));
    let api = h.api();

    api.get_categories(false).await.unwrap();
    let patch = CategoryPatch {
        is_active: Some(false),
        ..Default::default()
    };
    let updated = api.update_category(1, &patch).await.unwrap();
    assert_eq!(updated.title, "Новости 2");

    api.get_categories(false).await.unwrap();
    assert_eq!(h.transport.count(HttpMethod::Get, "/webapp/categories"), 2);
    assert_eq!(
        h.transport.requests()[1].body,
        RequestBody::Json(json!({ "is_active": false }))
    );
}

#[tokio::test]
async fn upload_is_multipart_without_json_content_type() {
    let h = Harness::new();
    h.transport.ok(
        HttpMethod::Post,
        "/webapp/upload",
        json!({ "id": 42, "original_name": "doc.pdf", "file_size": 2048 }),
    );
    let info = h
        .api()
        .upload_file(Upload {
            file_name: "doc.pdf".into(),
            mime_type: Some("application/pdf".into()),
            bytes: vec![1, 2, 3],
            description: Some("Прайс".into()),
            tag: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(info.id, 42);

    let req = &h.transport.requests()[0];
    assert_eq!(req.header("content-type"), None);
    assert_eq!(req.header(http::INIT_DATA_HEADER), Some("user=1&hash=abc"));
    let RequestBody::Multipart(parts) = &req.body else {
        panic!("expected multipart body, got {:?}", req.body);
    };
    assert_eq!(parts.len(), 2, "empty tag is not sent");
    assert!(matches!(&parts[0], FormPart::File { name, file_name, .. } if name == "file" && file_name == "doc.pdf"));
    assert!(matches!(&parts[1], FormPart::Text { name, value } if name == "description" && value == "Прайс"));
}

#[tokio::test]
async fn transport_errors_surface_unchanged() {
    struct Offline;

    #[async_trait::async_trait]
    impl tgcatalog::HttpTransport for Offline {
        async fn send(
            &self,
            _request: tgcatalog::transport::HttpRequest,
        ) -> tgcatalog::ClientResult<tgcatalog::transport::HttpResponse> {
            Err(ClientError::Transport("connection refused".into()))
        }
    }

    let api = ApiClient::new(BASE, Arc::new(Offline), Arc::new(ManualClock::new(0)));
    let err = api.get_categories(false).await.unwrap_err();
    assert!(err.is_transport());
}
