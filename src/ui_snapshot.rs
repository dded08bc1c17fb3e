//! UI snapshot and action types for DOM-based rendering
//!
//! This module provides a clean boundary between the headless controllers
//! and the DOM frontend, enabling the wasm façade to serialize state as JSON.

use serde::{Deserialize, Serialize};

use crate::admin::{
    CategoryForm, ItemControls, ItemFieldGroups, ItemForm, ManageRow, TargetChoice, ToolbarState,
    UploadTarget,
};
use crate::app::{PageView, ViewState};
use crate::models::{CategoryId, ItemId, ItemType};
use crate::navigation::{CategoryButton, CrumbTarget, CrumbView, NavOrigin};
use crate::notify::Toast;
use crate::reorder::Move;
use crate::session::Session;

/// Snapshot of session state for DOM rendering (one-way data flow: Rust → JS)
#[derive(Debug, Clone, Serialize)]
pub struct UiSnapshot {
    /// Loading / error / content / empty
    pub view: ViewState,

    /// Title, description, meta line, hero, items or overview cards
    pub page: PageView,

    pub mode_badge: &'static str,

    /// Sidebar and floating lists (same entries, same order)
    pub categories: Vec<CategoryButton>,

    pub breadcrumbs: Vec<CrumbView>,

    pub current_category_id: Option<CategoryId>,

    pub admin: AdminSnapshot,

    /// Message of the outstanding confirmation, if any
    pub confirm: Option<String>,

    /// Notifications raised since the previous snapshot
    pub toasts: Vec<Toast>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSnapshot {
    pub toolbar: ToolbarState,
    pub item_controls: Vec<ItemControls>,
    pub category_panel: Option<CategoryPanel>,
    pub item_panel: Option<ItemPanel>,
    pub upload_panel: Option<UploadPanel>,
    /// Rows of the management list while its panel is open
    pub manage_categories: Option<Vec<ManageRow>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPanel {
    pub title: &'static str,
    pub form: CategoryForm,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemPanel {
    pub title: &'static str,
    pub form: ItemForm,
    pub fields: ItemFieldGroups,
    pub target_choices: Vec<TargetChoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadPanel {
    pub target: Option<UploadTarget>,
}

impl UiSnapshot {
    pub fn from_session(session: &Session, toasts: Vec<Toast>) -> Self {
        let app = session.app();
        let admin = session.admin();
        let nav = app.navigation();

        let admin_snapshot = AdminSnapshot {
            toolbar: admin.toolbar(),
            item_controls: admin.inline_controls(),
            category_panel: admin.category_form().map(|form| CategoryPanel {
                title: form.panel_title(),
                form: form.clone(),
            }),
            item_panel: admin.item_form().map(|form| ItemPanel {
                title: form.panel_title(),
                form: form.clone(),
                fields: form.field_groups(),
                target_choices: admin.target_choices().to_vec(),
            }),
            upload_panel: admin.upload_open().then(|| UploadPanel {
                target: admin.upload_target(),
            }),
            manage_categories: admin.manage_open().then(|| admin.manage_rows()),
        };

        UiSnapshot {
            view: app.view().clone(),
            page: app.page().clone(),
            mode_badge: app.mode_badge(),
            categories: nav.category_buttons(),
            breadcrumbs: nav.breadcrumb_view(),
            current_category_id: app.current_category().map(|c| c.id),
            admin: admin_snapshot,
            confirm: session.confirm_gate().pending_message(),
            toasts,
        }
    }
}

/// User actions from DOM (data flow: JS → Rust)
///
/// Confirmation answers are not actions: they go straight to the confirm
/// gate because the action waiting for them still holds the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum UiAction {
    // ----- Navigation -----
    /// Sidebar, floating list or overview card click
    SelectCategory {
        id: CategoryId,
        #[serde(default)]
        origin: NavOrigin,
    },
    /// Breadcrumb click (home or trail entry)
    Breadcrumb { target: CrumbTarget },
    /// BUTTON item linking to another category
    FollowButton { target_category_id: CategoryId },
    /// Retry button of the error state
    Retry,
    /// `pagehide` / `beforeunload`
    PageHide,

    // ----- Admin mode -----
    ToggleAdminMode,
    CloseAllPanels,

    // ----- Category panel -----
    OpenCategoryPanel {
        #[serde(default)]
        edit: Option<CategoryId>,
    },
    CloseCategoryPanel,
    SubmitCategory { form: CategoryForm },

    // ----- Item panel -----
    OpenItemPanel {
        #[serde(default)]
        edit: Option<ItemId>,
    },
    SetItemType { item_type: ItemType },
    CloseItemPanel,
    SubmitItem { form: ItemForm },

    // ----- File upload -----
    OpenUploadPanel {
        #[serde(default)]
        target: Option<UploadTarget>,
    },
    CloseUploadPanel,
    UploadFile {
        file_name: String,
        #[serde(default)]
        mime_type: Option<String>,
        #[serde(default)]
        bytes: Vec<u8>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        tag: Option<String>,
    },

    // ----- Category management -----
    OpenManageCategories,
    CloseManageCategories,
    MoveCategory { id: CategoryId, dir: Move },
    ToggleCategoryActive { id: CategoryId },
    DeleteCategory { id: CategoryId },

    // ----- Inline item controls -----
    MoveItem { item_id: ItemId, dir: Move },
    ToggleItemActive { item_id: ItemId },
    DeleteItem { item_id: ItemId },
}

impl UiAction {
    /// Actions that only an admin with admin mode on may run. Closing panels
    /// and the mode toggle itself stay open to everyone.
    pub fn requires_admin_mode(&self) -> bool {
        !matches!(
            self,
            UiAction::SelectCategory { .. }
                | UiAction::Breadcrumb { .. }
                | UiAction::FollowButton { .. }
                | UiAction::Retry
                | UiAction::PageHide
                | UiAction::ToggleAdminMode
                | UiAction::CloseAllPanels
                | UiAction::CloseCategoryPanel
                | UiAction::CloseItemPanel
                | UiAction::CloseUploadPanel
                | UiAction::CloseManageCategories
        )
    }
}
