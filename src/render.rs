//! View models for category items.
//!
//! The DOM shell turns each [`ItemView`] into elements; everything that needs
//! a decision (fallback labels, icons, sizes, markdown) is settled here.

use crate::models::{CategoryId, FileInfo, Item, ItemId, ItemType};
use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemBody {
    Text {
        html: String,
    },
    Image {
        src: String,
        alt: String,
        width: Option<u32>,
        height: Option<u32>,
        caption: Option<String>,
    },
    Document {
        icon: &'static str,
        name: String,
        size: Option<String>,
        url: Option<String>,
    },
    Video {
        src: Option<String>,
        title: Option<String>,
        placeholder: Option<String>,
    },
    Link {
        url: String,
        label: String,
    },
    Button {
        label: String,
        target_category_id: Option<CategoryId>,
        disabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub is_active: bool,
    #[serde(flatten)]
    pub body: ItemBody,
}

/// Build views for `items`, in the given order. Items of an unknown type are
/// logged and left out; the rest of the list is unaffected.
pub fn render_items(items: &[Item]) -> Vec<ItemView> {
    items.iter().filter_map(render_item).collect()
}

pub fn render_item(item: &Item) -> Option<ItemView> {
    let Some(kind) = item.kind() else {
        log::warn!("[render] Unknown item type: {}", item.r#type);
        return None;
    };
    let text = item.text_content.as_deref().filter(|s| !s.is_empty());
    let file = item.file.as_ref();

    let body = match kind {
        ItemType::Text => ItemBody::Text {
            html: markdown_to_html(text.unwrap_or_default()),
        },
        ItemType::Image => ItemBody::Image {
            src: file.and_then(|f| f.file_url.clone()).unwrap_or_default(),
            alt: file
                .and_then(|f| f.description.clone())
                .or_else(|| text.map(str::to_string))
                .unwrap_or_else(|| "Изображение".to_string()),
            // Both or neither.
            width: file.and_then(|f| f.width.zip(f.height)).map(|(w, _)| w),
            height: file.and_then(|f| f.width.zip(f.height)).map(|(_, h)| h),
            caption: text.map(str::to_string),
        },
        ItemType::Document => ItemBody::Document {
            icon: document_icon(file.and_then(|f| f.mime_type.as_deref())),
            name: file
                .and_then(|f| f.original_name.clone())
                .or_else(|| text.map(str::to_string))
                .unwrap_or_else(|| "Документ".to_string()),
            size: file.and_then(|f| f.file_size).filter(|s| *s > 0).map(format_file_size),
            url: file.and_then(|f| f.file_url.clone()),
        },
        ItemType::Video => video_body(file, text),
        ItemType::Link => {
            let url = item
                .rich_metadata
                .as_ref()
                .and_then(|m| m.get("url"))
                .and_then(|u| u.as_str())
                .map(str::to_string)
                .or_else(|| text.map(str::to_string))
                .unwrap_or_else(|| "#".to_string());
            let label = item
                .button_text
                .clone()
                .or_else(|| text.map(str::to_string))
                .unwrap_or_else(|| url.clone());
            ItemBody::Link { url, label }
        }
        ItemType::Button => ItemBody::Button {
            label: item
                .button_text
                .clone()
                .or_else(|| text.map(str::to_string))
                .unwrap_or_else(|| "Перейти".to_string()),
            target_category_id: item.target_category_id,
            disabled: item.target_category_id.is_none(),
        },
    };

    Some(ItemView {
        id: item.id,
        is_active: item.is_active,
        body,
    })
}

fn video_body(file: Option<&FileInfo>, text: Option<&str>) -> ItemBody {
    match file.and_then(|f| f.file_url.clone()) {
        Some(src) => ItemBody::Video {
            src: Some(src),
            title: text.map(str::to_string),
            placeholder: None,
        },
        None => ItemBody::Video {
            src: None,
            title: None,
            placeholder: Some(text.unwrap_or("Видео").to_string()),
        },
    }
}

/// Icon for a document, chosen by MIME type.
pub fn document_icon(mime_type: Option<&str>) -> &'static str {
    let Some(mime) = mime_type else {
        return "📄";
    };
    let mime = mime.to_lowercase();
    let has = |needle: &str| mime.contains(needle);
    if has("pdf") {
        "📑"
    } else if has("word") || has("document") {
        "📝"
    } else if has("excel") || has("spreadsheet") || has("powerpoint") || has("presentation") {
        "📊"
    } else if has("zip") || has("archive") {
        "📦"
    } else {
        "📄"
    }
}

/// `"512 B"`, `"1.5 KB"`, `"2.0 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Light markdown for TEXT items. Single newlines are kept as line breaks
/// and links open in a new tab.
pub fn markdown_to_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
    let events = parser.map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Start(Tag::Link { dest_url, .. }) => Event::Html(CowStr::from(format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
            escape_attr(&dest_url)
        ))),
        Event::End(TagEnd::Link) => Event::Html(CowStr::Borrowed("</a>")),
        other => other,
    });
    let mut html = String::new();
    push_html(&mut html, events);
    html
}

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
