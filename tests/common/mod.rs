//! Shared fixtures: a scripted transport and a session wired to in-memory
//! surfaces.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tgcatalog::confirm::ConfirmGate;
use tgcatalog::error::ClientResult;
use tgcatalog::notify::{QueueNotifier, Toast};
use tgcatalog::storage::MemoryStorage;
use tgcatalog::surfaces::{RecordingViewport, Surfaces};
use tgcatalog::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use tgcatalog::{ApiClient, AppController, ManualClock, Mode, Session};

pub const BASE: &str = "https://api.test";

/// Answers requests from a route table keyed by method and path (query
/// included). Unrouted requests get a 404 with a JSON `detail`.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(String, String), HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn route(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.routes
            .lock()
            .unwrap()
            .insert((method.as_str().to_string(), path.to_string()), HttpResponse { status, body });
    }

    pub fn ok(&self, method: HttpMethod, path: &str, body: Value) {
        self.route(method, path, 200, body);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `METHOD path` of every request so far.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), path_of(&r.url)))
            .collect()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let wanted = format!("{} {}", method.as_str(), path);
        self.calls().iter().filter(|c| **c == wanted).count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

fn path_of(url: &str) -> &str {
    url.strip_prefix(BASE).unwrap_or(url)
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let key = (
            request.method.as_str().to_string(),
            path_of(&request.url).to_string(),
        );
        self.requests.lock().unwrap().push(request);
        let response = self.routes.lock().unwrap().get(&key).cloned();
        Ok(response.unwrap_or(HttpResponse {
            status: 404,
            body: json!({ "detail": format!("no route for {} {}", key.0, key.1) }).to_string(),
        }))
    }
}

pub fn category(id: i64, title: &str, items_count: u32) -> Value {
    json!({
        "id": id,
        "slug": format!("cat-{id}"),
        "title": title,
        "description": null,
        "order_index": id,
        "is_active": true,
        "items_count": items_count,
    })
}

pub fn text_item(id: i64, category_id: i64, order_index: i64, text: &str) -> Value {
    json!({
        "id": id,
        "category_id": category_id,
        "type": "TEXT",
        "text_content": text,
        "order_index": order_index,
        "is_active": true,
    })
}

pub fn detail(id: i64, title: &str, items: Vec<Value>) -> Value {
    json!({
        "id": id,
        "slug": format!("cat-{id}"),
        "title": title,
        "description": "Описание",
        "order_index": id,
        "is_active": true,
        "items": items,
    })
}

/// Everything a test needs to drive a session and look at its effects.
pub struct Harness {
    pub transport: Arc<FakeTransport>,
    pub clock: ManualClock,
    pub storage: MemoryStorage,
    pub viewport: RecordingViewport,
    pub toasts: QueueNotifier,
    pub gate: ConfirmGate,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        Self {
            transport: Arc::new(FakeTransport::default()),
            clock: ManualClock::new(1_000_000),
            storage,
            viewport: RecordingViewport::new(),
            toasts: QueueNotifier::new(),
            gate: ConfirmGate::new(),
        }
    }

    pub fn api(&self) -> ApiClient {
        let mut api = ApiClient::new(BASE, self.transport.clone(), Arc::new(self.clock.clone()));
        api.set_init_data(Some("user=1&hash=abc".to_string()));
        api
    }

    pub fn app(&self, mode: Mode) -> AppController {
        let surfaces = Surfaces {
            storage: Box::new(self.storage.clone()),
            viewport: Box::new(self.viewport.clone()),
            notifier: Rc::new(self.toasts.clone()),
        };
        AppController::new(self.api(), surfaces, mode)
    }

    pub fn session(&self) -> Session {
        Session::new(self.app(Mode::User), self.gate.clone())
    }

    pub fn toast_messages(&self) -> Vec<String> {
        self.toasts
            .drain()
            .into_iter()
            .map(|Toast { message, .. }| message)
            .collect()
    }

    /// Answer every confirmation with `answer` as soon as it is shown.
    pub fn auto_confirm(&self, answer: bool) {
        let gate = self.gate.clone();
        self.gate.set_listener(move |_| {
            gate.answer(answer);
        });
    }

    /// Two categories; category 1 holds three text items.
    pub fn seed_catalog(&self) {
        let t = &self.transport;
        t.ok(
            HttpMethod::Get,
            "/webapp/categories",
            json!([category(1, "Новости", 3), category(2, "Документы", 0)]),
        );
        t.ok(
            HttpMethod::Get,
            "/webapp/categories?include_inactive=true",
            json!([category(1, "Новости", 3), category(2, "Документы", 0)]),
        );
        t.ok(
            HttpMethod::Get,
            "/webapp/category/1",
            detail(
                1,
                "Новости",
                vec![
                    text_item(10, 1, 0, "первый"),
                    text_item(11, 1, 1, "второй"),
                    text_item(12, 1, 2, "третий"),
                ],
            ),
        );
        t.ok(HttpMethod::Get, "/webapp/category/2", detail(2, "Документы", vec![]));
        t.ok(
            HttpMethod::Get,
            "/webapp/me",
            json!({ "id": 1, "username": "owner", "is_admin": false }),
        );
    }

    pub fn make_admin(&self) {
        self.transport.ok(
            HttpMethod::Get,
            "/webapp/me",
            json!({ "id": 1, "username": "owner", "is_admin": true }),
        );
    }
}
