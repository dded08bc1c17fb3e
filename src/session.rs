//! One browsing session: the application controller, the admin editor and
//! the dispatch of DOM actions onto them.

use crate::admin::AdminEditor;
use crate::app::AppController;
use crate::confirm::ConfirmGate;
use crate::error::ClientResult;
use crate::models::Upload;
use crate::navigation::{LoadContext, NavOrigin};
use crate::notify::Toast;
use crate::ui_snapshot::{UiAction, UiSnapshot};

pub struct Session {
    app: AppController,
    admin: AdminEditor,
}

impl Session {
    pub fn new(app: AppController, confirm: ConfirmGate) -> Self {
        Self {
            app,
            admin: AdminEditor::new(confirm),
        }
    }

    pub fn app(&self) -> &AppController {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut AppController {
        &mut self.app
    }

    pub fn admin(&self) -> &AdminEditor {
        &self.admin
    }

    pub fn confirm_gate(&self) -> ConfirmGate {
        self.admin.confirm_gate()
    }

    /// Initial load, then the admin check.
    pub async fn start(&mut self) {
        if let Err(e) = self.app.load_initial_data().await {
            log::warn!("[session] initial load failed: {e}");
        }
        self.admin.init(&self.app).await;
        self.admin.on_category_loaded(self.app.current_category());
    }

    pub fn snapshot(&self, toasts: Vec<Toast>) -> UiSnapshot {
        UiSnapshot::from_session(self, toasts)
    }

    pub async fn dispatch(&mut self, action: UiAction) {
        log::debug!("[session] dispatch {action:?}");
        if let Err(e) = self.apply(action).await {
            // Already surfaced through the view state or a notification.
            log::debug!("[session] action failed: {e}");
        }
        self.admin.on_category_loaded(self.app.current_category());
    }

    async fn apply(&mut self, action: UiAction) -> ClientResult<()> {
        if action.requires_admin_mode() && !self.admin.can_edit() {
            log::warn!("[session] admin action ignored: admin mode is not active");
            return Ok(());
        }
        let app = &mut self.app;
        let admin = &mut self.admin;
        match action {
            UiAction::SelectCategory { id, origin } => {
                match app.navigation().on_category_click(id, origin) {
                    Some(request) => app.navigate(request).await?,
                    None => log::debug!("[session] category {id} already active"),
                }
            }
            UiAction::Breadcrumb { target } => {
                if let Some(request) = app.navigation().on_breadcrumb_click(target) {
                    app.navigate(request).await?;
                }
            }
            UiAction::FollowButton { target_category_id } => {
                app.load_category(
                    target_category_id,
                    LoadContext::from_origin(NavOrigin::Button),
                )
                .await?;
            }
            UiAction::Retry => app.retry().await?,
            UiAction::PageHide => app.page_hide(),

            UiAction::ToggleAdminMode => admin.toggle_admin_mode(app),
            UiAction::CloseAllPanels => admin.close_all_panels(),

            UiAction::OpenCategoryPanel { edit } => admin.open_category_panel(app, edit),
            UiAction::CloseCategoryPanel => admin.close_category_panel(),
            UiAction::SubmitCategory { form } => admin.submit_category(app, form).await?,

            UiAction::OpenItemPanel { edit } => admin.open_item_panel(app, edit)?,
            UiAction::SetItemType { item_type } => admin.set_item_type(item_type),
            UiAction::CloseItemPanel => admin.close_item_panel(),
            UiAction::SubmitItem { form } => admin.submit_item(app, form).await?,

            UiAction::OpenUploadPanel { target } => admin.open_upload_panel(target),
            UiAction::CloseUploadPanel => admin.close_upload_panel(),
            UiAction::UploadFile {
                file_name,
                mime_type,
                bytes,
                description,
                tag,
            } => {
                let upload = Upload {
                    file_name,
                    mime_type,
                    bytes,
                    description,
                    tag,
                };
                admin.upload_file(app, upload).await?;
            }

            UiAction::OpenManageCategories => admin.open_manage_categories(app).await,
            UiAction::CloseManageCategories => admin.close_manage_categories(),
            UiAction::MoveCategory { id, dir } => admin.move_category(app, id, dir).await?,
            UiAction::ToggleCategoryActive { id } => admin.toggle_category_active(app, id).await?,
            UiAction::DeleteCategory { id } => admin.delete_category(app, id).await?,

            UiAction::MoveItem { item_id, dir } => admin.move_item(app, item_id, dir).await?,
            UiAction::ToggleItemActive { item_id } => admin.toggle_item_active(app, item_id).await?,
            UiAction::DeleteItem { item_id } => admin.delete_item(app, item_id).await?,
        }
        Ok(())
    }
}
