//! Admin editor: CRUD panels, file upload, the category management list and
//! the inline per-item controls. Active only for users the backend flags as
//! admins.
//!
//! Every successful mutation is followed by a full reload of the affected
//! scope (the category list or the open category).

use crate::app::AppController;
use crate::confirm::ConfirmGate;
use crate::constants::text;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Category, CategoryDetail, CategoryId, CategoryPatch, CategoryPayload, CurrentUser, FileId,
    FileInfo, Item, ItemId, ItemPatch, ItemPayload, ItemType, Upload,
};
use crate::navigation::LoadContext;
use crate::plural::item_count_label;
use crate::reorder::{can_move, move_id, Move};
use serde::{Deserialize, Serialize};

/// Category form as submitted by the panel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub id: Option<CategoryId>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_file_id: Option<FileId>,
    #[serde(default)]
    pub is_active: bool,
}

impl CategoryForm {
    fn new_category() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }

    fn from_detail(category: &CategoryDetail) -> Self {
        Self {
            id: Some(category.id),
            slug: category.slug.clone(),
            title: category.title.clone(),
            description: category.description.clone().unwrap_or_default(),
            cover_file_id: category.cover_file_id,
            is_active: category.is_active,
        }
    }

    fn from_category(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            slug: category.slug.clone(),
            title: category.title.clone(),
            description: category.description.clone().unwrap_or_default(),
            cover_file_id: category.cover_file_id,
            is_active: category.is_active,
        }
    }

    pub fn panel_title(&self) -> &'static str {
        if self.id.is_some() {
            "Редактировать категорию"
        } else {
            "Добавить категорию"
        }
    }

    pub fn to_payload(&self) -> ClientResult<CategoryPayload> {
        let slug = self.slug.trim();
        let title = self.title.trim();
        if slug.is_empty() || title.is_empty() {
            return Err(ClientError::Validation(
                "Укажите slug и название категории".to_string(),
            ));
        }
        Ok(CategoryPayload {
            slug: slug.to_string(),
            title: title.to_string(),
            description: non_empty(&self.description),
            is_active: self.is_active,
            cover_file_id: self.cover_file_id,
        })
    }
}

/// Item form as submitted by the panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub r#type: ItemType,
    #[serde(default)]
    pub text_content: String,
    #[serde(default)]
    pub file_id: Option<FileId>,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub target_category_id: Option<CategoryId>,
    #[serde(default)]
    pub is_active: bool,
}

/// Which optional field groups the item form shows for its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ItemFieldGroups {
    pub text: bool,
    pub file: bool,
    pub button: bool,
    pub target: bool,
}

impl ItemForm {
    fn new_item(category_id: CategoryId) -> Self {
        Self {
            id: None,
            category_id: Some(category_id),
            r#type: ItemType::Text,
            text_content: String::new(),
            file_id: None,
            button_text: String::new(),
            target_category_id: None,
            is_active: true,
        }
    }

    fn from_item(item: &Item, fallback_category: Option<CategoryId>) -> Self {
        Self {
            id: Some(item.id),
            category_id: item.category_id.or(fallback_category),
            r#type: item.kind().unwrap_or(ItemType::Text),
            text_content: item.text_content.clone().unwrap_or_default(),
            file_id: item.file.as_ref().map(|f| f.id),
            button_text: item.button_text.clone().unwrap_or_default(),
            target_category_id: item.target_category_id,
            is_active: item.is_active,
        }
    }

    pub fn panel_title(&self) -> &'static str {
        if self.id.is_some() {
            "Редактировать элемент"
        } else {
            "Добавить элемент"
        }
    }

    pub fn field_groups(&self) -> ItemFieldGroups {
        let button = self.r#type == ItemType::Button;
        ItemFieldGroups {
            text: true,
            file: self.r#type.has_file(),
            button,
            target: button,
        }
    }

    pub fn to_payload(&self) -> ItemPayload {
        ItemPayload {
            r#type: self.r#type,
            text_content: non_empty(&self.text_content),
            is_active: self.is_active,
            file_id: self.file_id,
            button_text: non_empty(&self.button_text),
            target_category_id: self.target_category_id,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Form field an uploaded file id is written into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadTarget {
    CategoryCover,
    ItemFile,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolbarState {
    pub toggle_visible: bool,
    pub toggle_pressed: bool,
    pub toggle_label: &'static str,
    pub toolbar_visible: bool,
    pub edit_category_enabled: bool,
    pub add_item_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemControls {
    pub item_id: ItemId,
    pub move_up: bool,
    pub move_down: bool,
    pub is_active: bool,
    pub toggle_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManageRow {
    pub id: CategoryId,
    pub title: String,
    pub slug: String,
    pub meta: String,
    pub is_active: bool,
    pub status: &'static str,
    pub move_up: bool,
    pub move_down: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TargetChoice {
    pub id: CategoryId,
    pub title: String,
}

fn toggle_label(is_active: bool) -> &'static str {
    if is_active {
        "Деактивировать"
    } else {
        "Активировать"
    }
}

#[derive(Default)]
pub struct AdminEditor {
    current_user: Option<CurrentUser>,
    admin_mode: bool,
    current_category: Option<CategoryId>,
    current_items: Vec<Item>,
    category_form: Option<CategoryForm>,
    item_form: Option<ItemForm>,
    target_choices: Vec<TargetChoice>,
    upload_target: Option<UploadTarget>,
    upload_open: bool,
    manage_open: bool,
    manage_list: Vec<Category>,
    confirm: ConfirmGate,
}

impl AdminEditor {
    pub fn new(confirm: ConfirmGate) -> Self {
        Self {
            confirm,
            ..Self::default()
        }
    }

    /// Look up the current user; failures leave the editor inactive.
    pub async fn init(&mut self, app: &AppController) {
        match app.api().get_current_user().await {
            Ok(user) => {
                log::info!("[admin] current user is_admin={}", user.is_admin);
                self.current_user = Some(user);
            }
            Err(e) => log::error!("[admin] Failed to check admin status: {e}"),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    pub fn admin_mode(&self) -> bool {
        self.admin_mode
    }

    /// Editing is allowed only for an admin who has switched admin mode on.
    pub fn can_edit(&self) -> bool {
        self.is_admin() && self.admin_mode
    }

    pub fn confirm_gate(&self) -> ConfirmGate {
        self.confirm.clone()
    }

    pub fn toggle_admin_mode(&mut self, app: &AppController) {
        if !self.is_admin() {
            log::warn!("[admin] toggle ignored: user is not an admin");
            return;
        }
        self.admin_mode = !self.admin_mode;
        let notifier = app.notifier();
        if self.admin_mode {
            notifier.info("Режим администратора активен");
        } else {
            notifier.info("Режим пользователя активен");
        }
    }

    /// Track the category the application controller now shows.
    pub fn on_category_loaded(&mut self, category: Option<&CategoryDetail>) {
        self.current_category = category.map(|c| c.id);
        self.current_items = category.map(CategoryDetail::sorted_items).unwrap_or_default();
    }

    pub fn toolbar(&self) -> ToolbarState {
        let enabled = self.admin_mode && self.current_category.is_some();
        ToolbarState {
            toggle_visible: self.is_admin(),
            toggle_pressed: self.admin_mode,
            toggle_label: if self.admin_mode {
                "Перейти в режим пользователя"
            } else {
                "Перейти в режим администратора"
            },
            toolbar_visible: self.admin_mode,
            edit_category_enabled: enabled,
            add_item_enabled: enabled,
        }
    }

    /// Controls for each item of the open category, in display order.
    pub fn inline_controls(&self) -> Vec<ItemControls> {
        if !self.admin_mode || self.current_category.is_none() {
            return Vec::new();
        }
        let total = self.current_items.len();
        self.current_items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemControls {
                item_id: item.id,
                move_up: can_move(index, total, Move::Up),
                move_down: can_move(index, total, Move::Down),
                is_active: item.is_active,
                toggle_label: toggle_label(item.is_active),
            })
            .collect()
    }

    // ----- category panel -----

    pub fn category_form(&self) -> Option<&CategoryForm> {
        self.category_form.as_ref()
    }

    /// Open the category panel, empty for `None` or filled for an edit.
    pub fn open_category_panel(&mut self, app: &AppController, edit: Option<CategoryId>) {
        let form = match edit {
            None => CategoryForm::new_category(),
            Some(id) => {
                let from_current = app
                    .current_category()
                    .filter(|c| c.id == id)
                    .map(CategoryForm::from_detail);
                let from_lists = || {
                    self.manage_list
                        .iter()
                        .chain(app.categories())
                        .find(|c| c.id == id)
                        .map(CategoryForm::from_category)
                };
                match from_current.or_else(from_lists) {
                    Some(form) => form,
                    None => {
                        log::warn!("[admin] category {id} is not loaded; cannot edit");
                        return;
                    }
                }
            }
        };
        self.manage_open = false;
        self.category_form = Some(form);
    }

    pub fn close_category_panel(&mut self) {
        self.category_form = None;
    }

    pub async fn submit_category(
        &mut self,
        app: &mut AppController,
        form: CategoryForm,
    ) -> ClientResult<()> {
        let notifier = app.notifier();
        let result = async {
            let payload = form.to_payload()?;
            match form.id {
                Some(id) => {
                    app.api().update_category(id, &payload).await?;
                    notifier.success("Категория обновлена");
                }
                None => {
                    app.api().create_category(&payload).await?;
                    notifier.success("Категория создана");
                }
            }
            Ok::<(), ClientError>(())
        }
        .await;

        if let Err(e) = result {
            log::error!("[admin] Failed to save category: {e}");
            notifier.error(&format!("Ошибка: {e}"));
            return Err(e);
        }
        self.close_category_panel();
        self.reload_all(app).await;
        Ok(())
    }

    // ----- item panel -----

    pub fn item_form(&self) -> Option<&ItemForm> {
        self.item_form.as_ref()
    }

    pub fn target_choices(&self) -> &[TargetChoice] {
        &self.target_choices
    }

    /// Open the item panel for a new item in the open category, or to edit
    /// `edit`. Without an open category there is nothing to add to.
    pub fn open_item_panel(&mut self, app: &AppController, edit: Option<ItemId>) -> ClientResult<()> {
        let category_id = app.current_category().map(|c| c.id);
        let form = match edit {
            Some(item_id) => match self.current_items.iter().find(|i| i.id == item_id) {
                Some(item) => ItemForm::from_item(item, category_id),
                None => {
                    log::warn!("[admin] item {item_id} is not in the open category");
                    return Err(ClientError::Validation(format!("unknown item {item_id}")));
                }
            },
            None => match category_id {
                Some(id) => ItemForm::new_item(id),
                None => {
                    app.notifier().warning(text::SELECT_CATEGORY_FIRST);
                    return Err(ClientError::Validation(text::SELECT_CATEGORY_FIRST.to_string()));
                }
            },
        };
        self.target_choices = app
            .categories()
            .iter()
            .map(|c| TargetChoice {
                id: c.id,
                title: c.title.clone(),
            })
            .collect();
        self.item_form = Some(form);
        Ok(())
    }

    /// Change the type in the open item form (updates the visible groups).
    pub fn set_item_type(&mut self, item_type: ItemType) {
        if let Some(form) = self.item_form.as_mut() {
            form.r#type = item_type;
        }
    }

    pub fn close_item_panel(&mut self) {
        self.item_form = None;
    }

    pub async fn submit_item(&mut self, app: &mut AppController, form: ItemForm) -> ClientResult<()> {
        let notifier = app.notifier();
        let Some(category_id) = form.category_id else {
            notifier.warning(text::SELECT_CATEGORY_FIRST);
            return Err(ClientError::Validation(text::SELECT_CATEGORY_FIRST.to_string()));
        };

        let payload = form.to_payload();
        let result = match form.id {
            Some(item_id) => app
                .api()
                .update_item(category_id, item_id, &payload)
                .await
                .map(|_| "Элемент обновлён"),
            None => app
                .api()
                .create_item(category_id, &payload)
                .await
                .map(|_| "Элемент создан"),
        };

        match result {
            Ok(message) => notifier.success(message),
            Err(e) => {
                log::error!("[admin] Failed to save item: {e}");
                notifier.error(&format!("Ошибка: {e}"));
                return Err(e);
            }
        }
        self.close_item_panel();
        self.reload_category(app, category_id).await;
        Ok(())
    }

    // ----- file upload -----

    pub fn upload_open(&self) -> bool {
        self.upload_open
    }

    pub fn upload_target(&self) -> Option<UploadTarget> {
        self.upload_target
    }

    /// Open the upload panel; with a target the uploaded id fills that field.
    pub fn open_upload_panel(&mut self, target: Option<UploadTarget>) {
        self.upload_open = true;
        self.upload_target = target;
    }

    pub fn close_upload_panel(&mut self) {
        self.upload_open = false;
        self.upload_target = None;
    }

    pub async fn upload_file(&mut self, app: &AppController, upload: Upload) -> ClientResult<FileInfo> {
        let notifier = app.notifier();
        if upload.file_name.is_empty() && upload.bytes.is_empty() {
            notifier.error(text::SELECT_FILE);
            return Err(ClientError::Validation(text::SELECT_FILE.to_string()));
        }

        let file_name = upload.file_name.clone();
        let info = match app.api().upload_file(upload).await {
            Ok(info) => info,
            Err(e) => {
                log::error!("[admin] Failed to upload file: {e}");
                notifier.error(&format!("Ошибка загрузки: {e}"));
                return Err(e);
            }
        };
        notifier.success(&format!("Файл загружен: {file_name} (ID: {})", info.id));

        match self.upload_target {
            Some(UploadTarget::CategoryCover) => {
                if let Some(form) = self.category_form.as_mut() {
                    form.cover_file_id = Some(info.id);
                }
            }
            Some(UploadTarget::ItemFile) => {
                if let Some(form) = self.item_form.as_mut() {
                    form.file_id = Some(info.id);
                }
            }
            None => {}
        }
        self.close_upload_panel();
        Ok(info)
    }

    // ----- manage categories -----

    pub fn manage_open(&self) -> bool {
        self.manage_open
    }

    pub async fn open_manage_categories(&mut self, app: &AppController) {
        self.manage_open = true;
        self.load_categories_list(app).await;
    }

    pub fn close_manage_categories(&mut self) {
        self.manage_open = false;
    }

    /// Refresh the management list, including inactive categories.
    pub async fn load_categories_list(&mut self, app: &AppController) {
        match app.api().get_categories(true).await {
            Ok(categories) => self.manage_list = categories,
            Err(e) => {
                log::error!("[admin] Failed to load categories: {e}");
                app.notifier().error("Не удалось загрузить категории");
            }
        }
    }

    pub fn manage_rows(&self) -> Vec<ManageRow> {
        let total = self.manage_list.len();
        self.manage_list
            .iter()
            .enumerate()
            .map(|(index, c)| ManageRow {
                id: c.id,
                title: c.title.clone(),
                slug: c.slug.clone(),
                meta: item_count_label(u64::from(c.items_count)),
                is_active: c.is_active,
                status: if c.is_active {
                    "✅ Активна"
                } else {
                    "⚠️ Неактивна"
                },
                move_up: can_move(index, total, Move::Up),
                move_down: can_move(index, total, Move::Down),
            })
            .collect()
    }

    /// Swap a category with its neighbour and submit the whole new order.
    pub async fn move_category(
        &mut self,
        app: &mut AppController,
        id: CategoryId,
        dir: Move,
    ) -> ClientResult<()> {
        let ids: Vec<CategoryId> = self.manage_list.iter().map(|c| c.id).collect();
        let Some(order) = move_id(&ids, id, dir) else {
            return Ok(());
        };
        let notifier = app.notifier();
        if let Err(e) = app.api().reorder_categories(&order).await {
            log::error!("[admin] Failed to reorder: {e}");
            notifier.error("Ошибка изменения порядка");
            return Err(e);
        }
        notifier.success("Порядок обновлён");
        self.load_categories_list(app).await;
        self.reload_all(app).await;
        Ok(())
    }

    pub async fn toggle_category_active(
        &mut self,
        app: &mut AppController,
        id: CategoryId,
    ) -> ClientResult<()> {
        let Some(is_active) = self.find_category(app, id).map(|c| c.is_active) else {
            log::warn!("[admin] toggle of unknown category {id}");
            return Ok(());
        };
        let patch = CategoryPatch {
            is_active: Some(!is_active),
            ..Default::default()
        };
        let notifier = app.notifier();
        if let Err(e) = app.api().update_category(id, &patch).await {
            log::error!("[admin] Failed to toggle category: {e}");
            notifier.error("Ошибка изменения статуса");
            return Err(e);
        }
        notifier.success(if is_active {
            "Категория деактивирована"
        } else {
            "Категория активирована"
        });
        self.load_categories_list(app).await;
        self.reload_all(app).await;
        Ok(())
    }

    /// Delete a category after the user confirms; declining changes nothing.
    pub async fn delete_category(&mut self, app: &mut AppController, id: CategoryId) -> ClientResult<()> {
        let Some(title) = self.find_category(app, id).map(|c| c.title.clone()) else {
            log::warn!("[admin] delete of unknown category {id}");
            return Ok(());
        };
        let message = format!(
            "Вы уверены, что хотите удалить категорию \"{title}\"? Это действие нельзя отменить."
        );
        if !self.confirm.request(message).await {
            log::debug!("[admin] delete of category {id} declined");
            return Ok(());
        }

        let notifier = app.notifier();
        if let Err(e) = app.api().delete_category(id, true).await {
            log::error!("[admin] Failed to delete category: {e}");
            notifier.error("Ошибка удаления категории");
            return Err(e);
        }
        notifier.success("Категория удалена");
        self.load_categories_list(app).await;
        self.reload_all(app).await;
        Ok(())
    }

    fn find_category<'a>(&'a self, app: &'a AppController, id: CategoryId) -> Option<&'a Category> {
        self.manage_list
            .iter()
            .chain(app.categories())
            .find(|c| c.id == id)
    }

    // ----- item controls -----

    pub async fn move_item(&mut self, app: &mut AppController, item_id: ItemId, dir: Move) -> ClientResult<()> {
        let Some(category_id) = self.current_category else {
            return Ok(());
        };
        let ids: Vec<ItemId> = self.current_items.iter().map(|i| i.id).collect();
        let Some(order) = move_id(&ids, item_id, dir) else {
            return Ok(());
        };
        let notifier = app.notifier();
        if let Err(e) = app.api().reorder_items(category_id, &order).await {
            log::error!("[admin] Failed to reorder items: {e}");
            notifier.error("Ошибка изменения порядка");
            return Err(e);
        }
        notifier.success("Порядок обновлён");
        self.reload_category(app, category_id).await;
        Ok(())
    }

    pub async fn toggle_item_active(&mut self, app: &mut AppController, item_id: ItemId) -> ClientResult<()> {
        let Some(category_id) = self.current_category else {
            return Ok(());
        };
        let Some(is_active) = self.current_items.iter().find(|i| i.id == item_id).map(|i| i.is_active)
        else {
            return Ok(());
        };
        let patch = ItemPatch {
            is_active: Some(!is_active),
            ..Default::default()
        };
        let notifier = app.notifier();
        if let Err(e) = app.api().update_item(category_id, item_id, &patch).await {
            log::error!("[admin] Failed to toggle item: {e}");
            notifier.error("Ошибка изменения статуса");
            return Err(e);
        }
        notifier.success(if is_active {
            "Элемент деактивирован"
        } else {
            "Элемент активирован"
        });
        self.reload_category(app, category_id).await;
        Ok(())
    }

    /// Delete an item after the user confirms; declining changes nothing.
    pub async fn delete_item(&mut self, app: &mut AppController, item_id: ItemId) -> ClientResult<()> {
        let Some(category_id) = self.current_category else {
            return Ok(());
        };
        if !self.current_items.iter().any(|i| i.id == item_id) {
            log::warn!("[admin] delete of unknown item {item_id} ignored");
            return Ok(());
        }
        let confirmed = self
            .confirm
            .request("Вы уверены, что хотите удалить этот элемент? Это действие нельзя отменить.")
            .await;
        if !confirmed {
            log::debug!("[admin] delete of item {item_id} declined");
            return Ok(());
        }

        let notifier = app.notifier();
        if let Err(e) = app.api().delete_item(category_id, item_id, true).await {
            log::error!("[admin] Failed to delete item: {e}");
            notifier.error("Ошибка удаления элемента");
            return Err(e);
        }
        notifier.success("Элемент удалён");
        self.reload_category(app, category_id).await;
        Ok(())
    }

    pub fn close_all_panels(&mut self) {
        self.close_category_panel();
        self.close_item_panel();
        self.close_upload_panel();
        self.close_manage_categories();
    }

    async fn reload_all(&mut self, app: &mut AppController) {
        if let Err(e) = app.load_initial_data().await {
            log::warn!("[admin] reload after mutation failed: {e}");
        }
        self.on_category_loaded(app.current_category());
    }

    async fn reload_category(&mut self, app: &mut AppController, id: CategoryId) {
        if let Err(e) = app.load_category(id, LoadContext::default()).await {
            log::warn!("[admin] reload of category {id} failed: {e}");
        }
        self.on_category_loaded(app.current_category());
    }
}
