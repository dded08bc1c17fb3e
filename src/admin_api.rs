//! Mutating admin endpoints.
//!
//! Every successful call clears the read cache so the full reload that
//! follows a mutation observes it instead of a cached copy.

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{
    CategoryDetail, CategoryId, CategoryReorder, FileId, FileInfo, Item, ItemId, ItemReorder,
    MutationAck, Upload,
};
use crate::transport::{FormPart, HttpMethod, RequestBody};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

fn json_body<B: Serialize>(body: &B) -> ClientResult<RequestBody> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| crate::error::ClientError::Validation(format!("cannot encode body: {e}")))
}

fn hard_delete_query(hard_delete: bool) -> &'static str {
    if hard_delete {
        "?hard_delete=true"
    } else {
        ""
    }
}

impl ApiClient {
    async fn mutate<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: RequestBody,
    ) -> ClientResult<T> {
        let value = self.request(method, endpoint, body).await?;
        self.clear_cache();
        // 204-style empty answers decode as an empty object
        let value = if value.is_null() {
            Value::Object(Default::default())
        } else {
            value
        };
        serde_json::from_value(value)
            .map_err(|e| crate::error::ClientError::Decode(format!("{endpoint}: {e}")))
    }

    // ----- categories -----

    pub async fn create_category<B: Serialize>(&self, data: &B) -> ClientResult<CategoryDetail> {
        self.mutate(HttpMethod::Post, "/webapp/category", json_body(data)?)
            .await
    }

    /// `data` is either a full `CategoryPayload` or a `CategoryPatch`.
    pub async fn update_category<B: Serialize>(
        &self,
        category_id: CategoryId,
        data: &B,
    ) -> ClientResult<CategoryDetail> {
        let endpoint = format!("/webapp/category/{category_id}");
        self.mutate(HttpMethod::Put, &endpoint, json_body(data)?).await
    }

    pub async fn delete_category(
        &self,
        category_id: CategoryId,
        hard_delete: bool,
    ) -> ClientResult<MutationAck> {
        let endpoint = format!(
            "/webapp/category/{category_id}{}",
            hard_delete_query(hard_delete)
        );
        self.mutate(HttpMethod::Delete, &endpoint, RequestBody::Empty)
            .await
    }

    /// Submit the complete new ordering; list position becomes the order index.
    pub async fn reorder_categories(&self, category_ids: &[CategoryId]) -> ClientResult<Value> {
        let body = CategoryReorder {
            category_ids: category_ids.to_vec(),
        };
        self.mutate(HttpMethod::Post, "/webapp/categories/reorder", json_body(&body)?)
            .await
    }

    // ----- items -----

    pub async fn create_item<B: Serialize>(
        &self,
        category_id: CategoryId,
        data: &B,
    ) -> ClientResult<Item> {
        let endpoint = format!("/webapp/category/{category_id}/items");
        self.mutate(HttpMethod::Post, &endpoint, json_body(data)?).await
    }

    pub async fn update_item<B: Serialize>(
        &self,
        category_id: CategoryId,
        item_id: ItemId,
        data: &B,
    ) -> ClientResult<Item> {
        let endpoint = format!("/webapp/category/{category_id}/items/{item_id}");
        self.mutate(HttpMethod::Put, &endpoint, json_body(data)?).await
    }

    pub async fn delete_item(
        &self,
        category_id: CategoryId,
        item_id: ItemId,
        hard_delete: bool,
    ) -> ClientResult<MutationAck> {
        let endpoint = format!(
            "/webapp/category/{category_id}/items/{item_id}{}",
            hard_delete_query(hard_delete)
        );
        self.mutate(HttpMethod::Delete, &endpoint, RequestBody::Empty)
            .await
    }

    pub async fn reorder_items(
        &self,
        category_id: CategoryId,
        item_ids: &[ItemId],
    ) -> ClientResult<Value> {
        let endpoint = format!("/webapp/category/{category_id}/items/reorder");
        let body = ItemReorder {
            item_ids: item_ids.to_vec(),
        };
        self.mutate(HttpMethod::Post, &endpoint, json_body(&body)?)
            .await
    }

    // ----- files -----

    /// Multipart upload; the content type header is left to the transport
    /// so the boundary is set correctly.
    pub async fn upload_file(&self, upload: Upload) -> ClientResult<FileInfo> {
        let mut parts = vec![FormPart::File {
            name: "file".into(),
            file_name: upload.file_name,
            mime_type: upload.mime_type,
            bytes: upload.bytes,
        }];
        if let Some(description) = upload.description.filter(|s| !s.is_empty()) {
            parts.push(FormPart::Text {
                name: "description".into(),
                value: description,
            });
        }
        if let Some(tag) = upload.tag.filter(|s| !s.is_empty()) {
            parts.push(FormPart::Text {
                name: "tag".into(),
                value: tag,
            });
        }
        self.mutate(HttpMethod::Post, "/webapp/upload", RequestBody::Multipart(parts))
            .await
    }

    pub async fn delete_file(&self, file_id: FileId) -> ClientResult<MutationAck> {
        let endpoint = format!("/webapp/file/{file_id}");
        self.mutate(HttpMethod::Delete, &endpoint, RequestBody::Empty)
            .await
    }
}
