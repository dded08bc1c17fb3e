//! Admin editing through a session: mode toggle, confirm-before-delete,
//! adjacent-swap reordering, forms and uploads.

mod common;

use common::{detail, Harness};
use serde_json::json;
use tgcatalog::admin::{CategoryForm, ItemForm, UploadTarget};
use tgcatalog::constants::text;
use tgcatalog::models::ItemType;
use tgcatalog::navigation::CrumbTarget;
use tgcatalog::reorder::Move;
use tgcatalog::transport::{HttpMethod, RequestBody};
use tgcatalog::{Session, UiAction};

async fn admin_session(h: &Harness) -> Session {
    h.seed_catalog();
    h.make_admin();
    let mut session = h.session();
    session.start().await;
    session.dispatch(UiAction::ToggleAdminMode).await;
    h.toasts.drain();
    h.transport.clear_requests();
    session
}

#[tokio::test]
async fn non_admin_cannot_enter_admin_mode() {
    let h = Harness::new();
    h.seed_catalog();
    let mut session = h.session();
    session.start().await;
    session.dispatch(UiAction::ToggleAdminMode).await;

    assert!(!session.admin().admin_mode());
    assert!(!session.admin().toolbar().toggle_visible);
    assert!(session.admin().inline_controls().is_empty());
}

#[tokio::test]
async fn non_admin_edits_never_reach_the_backend() {
    let h = Harness::new();
    h.seed_catalog();
    let mut session = h.session();
    session.start().await;
    assert!(!session.admin().is_admin());
    h.auto_confirm(true);
    h.transport.clear_requests();

    session.dispatch(UiAction::ToggleCategoryActive { id: 1 }).await;
    session.dispatch(UiAction::DeleteItem { item_id: 10 }).await;
    session
        .dispatch(UiAction::MoveCategory { id: 2, dir: Move::Up })
        .await;
    session.dispatch(UiAction::OpenManageCategories).await;

    assert!(h.transport.calls().is_empty());
    assert!(!session.admin().manage_open());
    assert!(!h.gate.is_pending());
}

#[tokio::test]
async fn admin_edits_wait_for_admin_mode() {
    let h = Harness::new();
    h.seed_catalog();
    h.make_admin();
    let mut session = h.session();
    session.start().await;
    h.auto_confirm(true);
    h.transport.clear_requests();

    session.dispatch(UiAction::DeleteItem { item_id: 10 }).await;
    session
        .dispatch(UiAction::OpenCategoryPanel { edit: None })
        .await;

    assert!(h.transport.calls().is_empty());
    assert!(session.admin().category_form().is_none());
}

#[tokio::test]
async fn deleting_an_unknown_item_asks_nothing() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.auto_confirm(true);

    session.dispatch(UiAction::DeleteItem { item_id: 99 }).await;

    assert!(h.transport.calls().is_empty());
    assert!(h.toast_messages().is_empty());
}

#[tokio::test]
async fn admin_mode_shows_toolbar_and_inline_controls() {
    let h = Harness::new();
    h.seed_catalog();
    h.make_admin();
    let mut session = h.session();
    session.start().await;
    session.dispatch(UiAction::ToggleAdminMode).await;

    assert_eq!(h.toast_messages(), vec!["Режим администратора активен"]);
    let toolbar = session.admin().toolbar();
    assert!(toolbar.toolbar_visible && toolbar.edit_category_enabled);

    let controls = session.admin().inline_controls();
    assert_eq!(controls.len(), 3);
    assert!(!controls[0].move_up);
    assert!(!controls[2].move_down);
}

#[tokio::test]
async fn move_item_submits_swapped_order_and_reloads() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport
        .ok(HttpMethod::Post, "/webapp/category/1/items/reorder", json!({ "ok": true }));

    session
        .dispatch(UiAction::MoveItem { item_id: 11, dir: Move::Up })
        .await;

    assert_eq!(
        h.transport.calls(),
        vec!["POST /webapp/category/1/items/reorder", "GET /webapp/category/1"]
    );
    assert_eq!(
        h.transport.requests()[0].body,
        RequestBody::Json(json!({ "item_ids": [11, 10, 12] }))
    );
    assert_eq!(h.toast_messages(), vec!["Порядок обновлён"]);
}

#[tokio::test]
async fn moving_past_the_edge_sends_nothing() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    session
        .dispatch(UiAction::MoveItem { item_id: 10, dir: Move::Up })
        .await;
    session
        .dispatch(UiAction::MoveItem { item_id: 12, dir: Move::Down })
        .await;
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn declined_delete_sends_no_request() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.auto_confirm(false);

    session.dispatch(UiAction::DeleteItem { item_id: 11 }).await;

    assert!(h.transport.calls().is_empty());
    assert!(!h.gate.is_pending());
}

#[tokio::test]
async fn confirmed_delete_is_hard_and_reloads() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport.ok(
        HttpMethod::Delete,
        "/webapp/category/1/items/11?hard_delete=true",
        json!({ "success": true }),
    );

    let gate = h.gate.clone();
    let (_, seen) = tokio::join!(session.dispatch(UiAction::DeleteItem { item_id: 11 }), async {
        let seen = gate.pending_message();
        gate.answer(true);
        seen
    });

    assert!(seen.unwrap().contains("удалить этот элемент"));
    assert_eq!(
        h.transport.calls(),
        vec![
            "DELETE /webapp/category/1/items/11?hard_delete=true",
            "GET /webapp/category/1",
        ]
    );
    assert_eq!(h.toast_messages(), vec!["Элемент удалён"]);
}

#[tokio::test]
async fn category_delete_asks_with_title() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport.ok(
        HttpMethod::Delete,
        "/webapp/category/2?hard_delete=true",
        json!({ "success": true }),
    );
    let messages = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = messages.clone();
    let gate = h.gate.clone();
    h.gate.set_listener(move |msg| {
        sink.borrow_mut().push(msg.to_string());
        gate.answer(true);
    });

    session.dispatch(UiAction::DeleteCategory { id: 2 }).await;

    assert!(messages.borrow()[0].contains("\"Документы\""));
    let calls = h.transport.calls();
    assert_eq!(calls[0], "DELETE /webapp/category/2?hard_delete=true");
    assert!(calls.contains(&"GET /webapp/categories".to_string()), "full reload");
}

#[tokio::test]
async fn manage_list_reorders_categories() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport
        .ok(HttpMethod::Post, "/webapp/categories/reorder", json!({ "ok": true }));

    session.dispatch(UiAction::OpenManageCategories).await;
    let rows = session.admin().manage_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].meta, "3 элемента");
    assert!(!rows[0].move_up && rows[0].move_down);

    session
        .dispatch(UiAction::MoveCategory { id: 2, dir: Move::Up })
        .await;
    let reorder = h
        .transport
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/webapp/categories/reorder"))
        .unwrap();
    assert_eq!(reorder.body, RequestBody::Json(json!({ "category_ids": [2, 1] })));
}

#[tokio::test]
async fn toggling_a_category_sends_a_patch() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport
        .ok(HttpMethod::Put, "/webapp/category/2", detail(2, "Документы", vec![]));

    session.dispatch(UiAction::ToggleCategoryActive { id: 2 }).await;

    let put = &h.transport.requests()[0];
    assert_eq!(put.body, RequestBody::Json(json!({ "is_active": false })));
    assert_eq!(h.toast_messages(), vec!["Категория деактивирована"]);
}

#[tokio::test]
async fn item_panel_needs_an_open_category() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    session
        .dispatch(UiAction::Breadcrumb { target: CrumbTarget::Home })
        .await;

    session.dispatch(UiAction::OpenItemPanel { edit: None }).await;

    assert!(session.admin().item_form().is_none());
    assert_eq!(h.toast_messages(), vec![text::SELECT_CATEGORY_FIRST]);
}

#[tokio::test]
async fn edit_panel_is_prefilled_from_the_item() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    session
        .dispatch(UiAction::OpenItemPanel { edit: Some(11) })
        .await;

    let form = session.admin().item_form().unwrap();
    assert_eq!(form.id, Some(11));
    assert_eq!(form.category_id, Some(1));
    assert_eq!(form.text_content, "второй");
    assert_eq!(form.panel_title(), "Редактировать элемент");
}

#[tokio::test]
async fn upload_fills_the_target_field() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport.ok(
        HttpMethod::Post,
        "/webapp/upload",
        json!({ "id": 42, "original_name": "photo.jpg" }),
    );

    session.dispatch(UiAction::OpenItemPanel { edit: None }).await;
    session
        .dispatch(UiAction::SetItemType { item_type: ItemType::Image })
        .await;
    session
        .dispatch(UiAction::OpenUploadPanel { target: Some(UploadTarget::ItemFile) })
        .await;
    session
        .dispatch(UiAction::UploadFile {
            file_name: "photo.jpg".into(),
            mime_type: Some("image/jpeg".into()),
            bytes: vec![0xff, 0xd8],
            description: None,
            tag: None,
        })
        .await;

    let form = session.admin().item_form().unwrap();
    assert_eq!(form.r#type, ItemType::Image);
    assert_eq!(form.file_id, Some(42));
    assert!(form.field_groups().file);
    assert!(!session.admin().upload_open());
    assert_eq!(h.toast_messages(), vec!["Файл загружен: photo.jpg (ID: 42)"]);
}

#[tokio::test]
async fn invalid_category_form_is_rejected_locally() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    session
        .dispatch(UiAction::OpenCategoryPanel { edit: None })
        .await;

    let form = CategoryForm {
        slug: "faq".into(),
        ..session.admin().category_form().cloned().unwrap()
    };
    session.dispatch(UiAction::SubmitCategory { form }).await;

    assert!(h.transport.calls().is_empty());
    assert!(session.admin().category_form().is_some(), "panel stays open");
    let toasts = h.toast_messages();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].starts_with("Ошибка:"));
}

#[tokio::test]
async fn new_category_is_created_then_everything_reloads() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport
        .ok(HttpMethod::Post, "/webapp/category", detail(3, "FAQ", vec![]));

    let form = CategoryForm {
        slug: "faq".into(),
        title: "FAQ".into(),
        is_active: true,
        ..Default::default()
    };
    session.dispatch(UiAction::SubmitCategory { form }).await;

    let calls = h.transport.calls();
    assert_eq!(calls[0], "POST /webapp/category");
    assert_eq!(calls[1], "GET /webapp/categories");
    assert_eq!(
        h.transport.requests()[0].body,
        RequestBody::Json(json!({
            "slug": "faq",
            "title": "FAQ",
            "description": null,
            "is_active": true,
            "cover_file_id": null,
        }))
    );
    assert!(session.admin().category_form().is_none());
    assert_eq!(h.toast_messages(), vec!["Категория создана"]);
}

#[tokio::test]
async fn new_item_posts_to_the_open_category() {
    let h = Harness::new();
    let mut session = admin_session(&h).await;
    h.transport.ok(
        HttpMethod::Post,
        "/webapp/category/1/items",
        common::text_item(13, 1, 3, "новый"),
    );

    session.dispatch(UiAction::OpenItemPanel { edit: None }).await;
    let form = ItemForm {
        text_content: "новый".into(),
        ..session.admin().item_form().cloned().unwrap()
    };
    session.dispatch(UiAction::SubmitItem { form }).await;

    let calls = h.transport.calls();
    assert_eq!(calls[0], "POST /webapp/category/1/items");
    assert_eq!(calls[1], "GET /webapp/category/1");
    assert!(session.admin().item_form().is_none());
}
