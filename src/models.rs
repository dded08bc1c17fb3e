use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub type CategoryId = i64;
pub type ItemId = i64;
pub type FileId = i64;

fn default_true() -> bool {
    true
}

/// Category as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub cover_file_id: Option<FileId>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub items_count: u32,
}

/// Category with its items, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryDetail {
    pub id: CategoryId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub cover_file_id: Option<FileId>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl CategoryDetail {
    /// Items sorted by `order_index` (stable for equal indices).
    pub fn sorted_items(&self) -> Vec<Item> {
        let mut items = self.items.clone();
        items.sort_by_key(|item| item.order_index);
        items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Text,
    Image,
    Document,
    Video,
    Link,
    Button,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Text,
        ItemType::Image,
        ItemType::Document,
        ItemType::Video,
        ItemType::Link,
        ItemType::Button,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Text => "TEXT",
            ItemType::Image => "IMAGE",
            ItemType::Document => "DOCUMENT",
            ItemType::Video => "VIDEO",
            ItemType::Link => "LINK",
            ItemType::Button => "BUTTON",
        }
    }

    /// Types that carry an uploaded file.
    pub fn has_file(&self) -> bool {
        matches!(self, ItemType::Image | ItemType::Document | ItemType::Video)
    }
}

impl FromStr for ItemType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown item type: {s}"))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of content within a category.
///
/// The type is kept as the raw wire string so that an item of a type this
/// client does not know can still be decoded (and skipped when rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub r#type: String,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub rich_metadata: Option<Value>,
    #[serde(default)]
    pub file: Option<FileInfo>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub target_category_id: Option<CategoryId>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Item {
    pub fn kind(&self) -> Option<ItemType> {
        self.r#type.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    pub id: FileId,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

// ----- request bodies -----

/// Full category body for create and form-based update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryPayload {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub cover_file_id: Option<FileId>,
}

/// Partial category update; absent fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Full item body for create and form-based update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemPayload {
    pub r#type: ItemType,
    pub text_content: Option<String>,
    pub is_active: bool,
    pub file_id: Option<FileId>,
    pub button_text: Option<String>,
    pub target_category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryReorder {
    pub category_ids: Vec<CategoryId>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemReorder {
    pub item_ids: Vec<ItemId>,
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MutationAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
}

/// File to upload: bytes plus the metadata the multipart form carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
    pub description: Option<String>,
    pub tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_detail_decodes_backend_shape() {
        let v = json!({
            "id": 3, "slug": "faq", "title": "FAQ", "description": null,
            "cover_url": null, "order_index": 1, "is_active": true,
            "items": [
                {"id": 10, "type": "TEXT", "text_content": "hi", "order_index": 1, "is_active": true},
                {"id": 11, "type": "BUTTON", "button_text": "Go", "target_category_id": 4,
                 "order_index": 0, "is_active": false}
            ]
        });
        let cat: CategoryDetail = serde_json::from_value(v).unwrap();
        assert_eq!(cat.items.len(), 2);
        let sorted = cat.sorted_items();
        assert_eq!(sorted[0].id, 11);
        assert_eq!(sorted[0].kind(), Some(ItemType::Button));
    }

    #[test]
    fn unknown_item_type_still_decodes() {
        let item: Item =
            serde_json::from_value(json!({"id": 1, "type": "POLL", "order_index": 0})).unwrap();
        assert_eq!(item.kind(), None);
        assert!(item.is_active);
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = CategoryPatch {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"is_active": false}));
    }

    #[test]
    fn item_payload_uses_wire_type_names() {
        let payload = ItemPayload {
            r#type: ItemType::Document,
            text_content: None,
            is_active: true,
            file_id: Some(7),
            button_text: None,
            target_category_id: None,
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["type"], "DOCUMENT");
        assert_eq!(v["text_content"], Value::Null);
    }
}
