#![cfg_attr(target_arch = "wasm32", no_main)]

// DOM-based Web frontend for tgcatalog.
//
// JS side:
//   import init, { WasmApp } from "./tgcatalog-web-dom.js";
//   const app = new WasmApp();
//   app.set_confirm_handler((message) => showConfirmModal(message));
//   render(JSON.parse(await app.start()));
//   render(JSON.parse(await app.dispatch(JSON.stringify({ type: "SelectCategory", id: 3 }))));
//   // modal buttons:
//   app.answer_confirm(true);

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use futures::lock::Mutex;
    use js_sys::{Function, Promise};
    use serde::Deserialize;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::future_to_promise;

    use tgcatalog::{
        config::{resolve_init_data, WebAppConfig},
        confirm::ConfirmGate,
        notify::QueueNotifier,
        platform::{
            element_exists, host_init_data, host_ready, page_config_json, page_origin,
            page_query, BrowserSessionStorage, WindowViewport,
        },
        surfaces::{validate_required_elements, SurfaceError, Surfaces},
        ApiClient, AppController, ReqwestTransport, Session, SystemClock, UiAction,
    };

    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
    }

    /// File metadata sent next to the raw bytes by `upload`.
    #[derive(Debug, Deserialize)]
    struct UploadMeta {
        file_name: String,
        #[serde(default)]
        mime_type: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        tag: Option<String>,
    }

    /// Wasm-exposed app wrapper.
    ///
    /// Actions run one at a time behind an async lock. Confirmation answers
    /// bypass the lock: the action waiting on them is the one holding it.
    #[wasm_bindgen]
    pub struct WasmApp {
        session: Rc<Mutex<Session>>,
        confirm: ConfirmGate,
        toasts: QueueNotifier,
        last_snapshot: Rc<RefCell<String>>,
    }

    fn to_js(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    #[wasm_bindgen]
    impl WasmApp {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<WasmApp, JsValue> {
            if web_sys::window().is_none() {
                return Err(to_js(SurfaceError::NoWindow));
            }
            validate_required_elements(element_exists).map_err(|e| {
                log::error!("[WasmApp] {e}");
                to_js(e)
            })?;

            let origin = page_origin();
            let page_config = WebAppConfig::from_page_json(page_config_json().as_deref(), &origin);
            let init_data = resolve_init_data(host_init_data().as_deref(), &page_query());
            host_ready();
            log::info!(
                "[WasmApp] v{} api={} mode={} init_data={}",
                page_config.version,
                page_config.base_url(),
                page_config.mode,
                init_data.is_some()
            );

            let transport = ReqwestTransport::new(None).map_err(to_js)?;
            let mut api = ApiClient::new(
                page_config.base_url(),
                Arc::new(transport),
                Arc::new(SystemClock),
            );
            api.set_init_data(init_data);

            let toasts = QueueNotifier::new();
            let surfaces = Surfaces {
                storage: Box::new(BrowserSessionStorage::new()),
                viewport: Box::new(WindowViewport),
                notifier: Rc::new(toasts.clone()),
            };
            let confirm = ConfirmGate::new();
            let app = AppController::new(api, surfaces, page_config.mode);
            let session = Session::new(app, confirm.clone());

            Ok(WasmApp {
                session: Rc::new(Mutex::new(session)),
                confirm,
                toasts,
                last_snapshot: Rc::new(RefCell::new("{}".to_string())),
            })
        }

        /// Initial load plus the admin check. Resolves to a snapshot JSON.
        pub fn start(&self) -> Promise {
            let session = self.session.clone();
            let toasts = self.toasts.clone();
            let last = self.last_snapshot.clone();
            future_to_promise(async move {
                let mut session = session.lock().await;
                session.start().await;
                Ok(JsValue::from_str(&store_snapshot(&session, &toasts, &last)))
            })
        }

        /// Apply a JSON-encoded `UiAction`. Resolves to the updated snapshot.
        pub fn dispatch(&self, action_json: String) -> Promise {
            let session = self.session.clone();
            let toasts = self.toasts.clone();
            let last = self.last_snapshot.clone();
            future_to_promise(async move {
                let action = serde_json::from_str::<UiAction>(&action_json).map_err(|e| {
                    log::warn!("[WasmApp] Failed to deserialize UiAction ({e}): {action_json:?}");
                    to_js(e)
                })?;
                let mut session = session.lock().await;
                session.dispatch(action).await;
                Ok(JsValue::from_str(&store_snapshot(&session, &toasts, &last)))
            })
        }

        /// Current snapshot; while an action is in flight this is the last
        /// one produced. Use `pending_confirm` for the modal state.
        pub fn snapshot_json(&self) -> String {
            match self.session.try_lock() {
                Some(session) => store_snapshot(&session, &self.toasts, &self.last_snapshot),
                None => self.last_snapshot.borrow().clone(),
            }
        }

        /// Answer the outstanding confirmation. Returns false if none was pending.
        pub fn answer_confirm(&self, confirmed: bool) -> bool {
            self.confirm.answer(confirmed)
        }

        pub fn pending_confirm(&self) -> Option<String> {
            self.confirm.pending_message()
        }

        /// Called with the message whenever an action asks for confirmation.
        pub fn set_confirm_handler(&self, handler: Function) {
            self.confirm.set_listener(move |message| {
                if let Err(e) = handler.call1(&JsValue::NULL, &JsValue::from_str(message)) {
                    log::warn!("[WasmApp] confirm handler failed: {e:?}");
                }
            });
        }

        /// Upload a picked file; `meta_json` carries name, MIME type,
        /// description and tag. Resolves to the updated snapshot.
        pub fn upload(&self, meta_json: String, bytes: Vec<u8>) -> Promise {
            let session = self.session.clone();
            let toasts = self.toasts.clone();
            let last = self.last_snapshot.clone();
            future_to_promise(async move {
                let meta = serde_json::from_str::<UploadMeta>(&meta_json).map_err(to_js)?;
                let action = UiAction::UploadFile {
                    file_name: meta.file_name,
                    mime_type: meta.mime_type,
                    bytes,
                    description: meta.description,
                    tag: meta.tag,
                };
                let mut session = session.lock().await;
                session.dispatch(action).await;
                Ok(JsValue::from_str(&store_snapshot(&session, &toasts, &last)))
            })
        }

        /// `pagehide` handler. Synchronous so the write lands before unload;
        /// skipped if an action still holds the session.
        pub fn page_hide(&self) {
            match self.session.try_lock() {
                Some(mut session) => session.app_mut().page_hide(),
                None => log::debug!("[WasmApp] page_hide while busy; scroll not saved"),
            }
        }
    }

    fn store_snapshot(session: &Session, toasts: &QueueNotifier, last: &RefCell<String>) -> String {
        let snap = session.snapshot(toasts.drain());
        let json = serde_json::to_string(&snap).unwrap_or_else(|e| {
            log::error!("Failed to serialize UiSnapshot: {e}");
            "{}".to_string()
        });
        *last.borrow_mut() = json.clone();
        json
    }
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("tgcatalog-web-dom is only supported on wasm32 (browser) target.");
}
