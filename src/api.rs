//! REST client for the catalog backend.
//!
//! Every call carries `Content-Type: application/json` and, when the host
//! shell supplied init data, the `X-Telegram-Init-Data` header. Reads of the
//! category list, a category and the current user go through a TTL cache
//! keyed by their full parameter signature; a hit skips the network.

use crate::cache::{Clock, TtlCache};
use crate::constants::{cache as cache_consts, http};
use crate::error::{error_message, ClientError, ClientResult};
use crate::models::{Category, CategoryDetail, CategoryId, CurrentUser};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, RequestBody};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ApiClient {
    base_url: String,
    init_data: Option<String>,
    transport: Arc<dyn HttpTransport>,
    cache: Mutex<TtlCache<Value>>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            init_data: None,
            transport,
            cache: Mutex::new(TtlCache::new(cache_consts::TTL_MS, clock)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach (or drop, for `None`/empty) the signed init data sent as auth.
    pub fn set_init_data(&mut self, init_data: Option<String>) {
        self.init_data = init_data.filter(|s| !s.is_empty());
    }

    pub fn has_init_data(&self) -> bool {
        self.init_data.is_some()
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache<Value>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn headers(&self, json: bool) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(2);
        if json {
            headers.push(("Content-Type".to_string(), http::JSON_CONTENT_TYPE.to_string()));
        }
        if let Some(init) = &self.init_data {
            headers.push((http::INIT_DATA_HEADER.to_string(), init.clone()));
        }
        headers
    }

    /// Perform one call and return the decoded JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
    ) -> ClientResult<Value> {
        let json = !matches!(body, RequestBody::Multipart(_));
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers: self.headers(json),
            body,
        };

        log::debug!("[api] {} {}", method.as_str(), endpoint);

        let response = match self.transport.send(request).await {
            Ok(r) => r,
            Err(e) => {
                log::error!("[api] request failed: {} {}: {}", method.as_str(), endpoint, e);
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = error_message(response.status, &response.body);
            log::error!(
                "[api] request failed: {} {} ({}): {}",
                method.as_str(),
                endpoint,
                response.status,
                message
            );
            return Err(ClientError::Request {
                status: response.status,
                message,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|e| ClientError::Decode(format!("{endpoint}: {e}")))
    }

    /// Typed variant of [`request`](Self::request).
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
    ) -> ClientResult<T> {
        let value = self.request(method, endpoint, body).await?;
        decode(endpoint, value)
    }

    async fn cached_get<T: DeserializeOwned>(&self, key: &str, endpoint: &str) -> ClientResult<T> {
        let hit = self.cache().get(key);
        if let Some(value) = hit {
            log::debug!("[api] cache hit {key}");
            return decode(endpoint, value);
        }

        let value = self.request(HttpMethod::Get, endpoint, RequestBody::Empty).await?;
        let typed = decode(endpoint, value.clone())?;
        // an empty answer is never cached
        if !value.is_null() {
            self.cache().set(key, value);
        }
        Ok(typed)
    }

    pub async fn get_categories(&self, include_inactive: bool) -> ClientResult<Vec<Category>> {
        let key = format!("categories:{include_inactive}");
        let endpoint = if include_inactive {
            "/webapp/categories?include_inactive=true".to_string()
        } else {
            "/webapp/categories".to_string()
        };
        self.cached_get(&key, &endpoint).await
    }

    pub async fn get_category(
        &self,
        category_id: CategoryId,
        include_inactive: bool,
    ) -> ClientResult<CategoryDetail> {
        let key = format!("category:{category_id}:{include_inactive}");
        let endpoint = if include_inactive {
            format!("/webapp/category/{category_id}?include_inactive=true")
        } else {
            format!("/webapp/category/{category_id}")
        };
        let found: Option<CategoryDetail> = self.cached_get(&key, &endpoint).await?;
        found.ok_or(ClientError::NotFound)
    }

    pub async fn get_current_user(&self) -> ClientResult<CurrentUser> {
        self.cached_get(cache_consts::CURRENT_USER_KEY, "/webapp/me").await
    }

    /// Drop every cached read.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    pub fn invalidate(&self, key: &str) {
        self.cache().invalidate(key);
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(format!("{endpoint}: {e}")))
}
