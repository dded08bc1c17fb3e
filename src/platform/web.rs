//! Web platform implementation (uses web-sys)

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::storage::{SessionStore, StorageError};
use crate::surfaces::{ScrollBehavior, Viewport};

/// `window.sessionStorage`. Browsers may refuse access (privacy modes,
/// sandboxed frames); every call then fails and callers treat that as
/// "no stored state".
pub struct BrowserSessionStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserSessionStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| match w.session_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("[platform] sessionStorage unavailable: {e:?}");
                None
            }
        });
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError("sessionStorage unavailable".into()))
    }
}

impl Default for BrowserSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn js_err(e: JsValue) -> StorageError {
    StorageError(format!("{e:?}"))
}

impl SessionStore for BrowserSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(js_err)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_err)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_err)
    }
}

/// Document scroll position of the browser window.
#[derive(Default)]
pub struct WindowViewport;

impl Viewport for WindowViewport {
    fn scroll_y(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let opts = web_sys::ScrollToOptions::new();
        opts.set_top(top);
        opts.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        window.scroll_to_with_scroll_to_options(&opts);
    }
}

fn get_path(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut value = root.clone();
    for key in path {
        value = js_sys::Reflect::get(&value, &JsValue::from_str(key)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
    }
    Some(value)
}

/// `Telegram.WebApp.initData` when the page runs inside the host shell.
pub fn host_init_data() -> Option<String> {
    let window = web_sys::window()?;
    get_path(&window, &["Telegram", "WebApp", "initData"])?.as_string()
}

/// Tell the host shell the app is ready and ask it to expand.
pub fn host_ready() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(web_app) = get_path(&window, &["Telegram", "WebApp"]) else {
        log::debug!("[platform] not running inside the host shell");
        return;
    };
    for name in ["ready", "expand"] {
        if let Some(func) = get_path(&web_app, &[name]).and_then(|f| f.dyn_into::<js_sys::Function>().ok()) {
            if let Err(e) = func.call0(&web_app) {
                log::warn!("[platform] WebApp.{name}() failed: {e:?}");
            }
        }
    }
}

pub fn page_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Text of the `#webapp-config` element the backend embeds in the page.
pub fn page_config_json() -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id("webapp-config")?
        .text_content()
}

pub fn element_exists(id: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .is_some()
}
