//! Category chrome: sidebar/floating button lists, active highlighting and
//! the breadcrumb trail.
//!
//! The controller is headless. Clicks come in as method calls and go out as
//! [`NavRequest`] intents for the application controller to carry out.

use crate::constants::text;
use crate::models::{Category, CategoryId};
use serde::{Deserialize, Serialize};

/// Where a navigation request came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavOrigin {
    #[default]
    Direct,
    Sidebar,
    Floating,
    Card,
    /// A BUTTON item linking to another category
    Button,
    /// Explicit breadcrumb click at `index`
    Breadcrumb { index: usize },
}

/// Options for one category load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadContext {
    /// Do not flash the loading state (caller already shows one)
    #[serde(default)]
    pub skip_loading: bool,
    #[serde(default)]
    pub from_initial_load: bool,
    #[serde(default)]
    pub origin: NavOrigin,
}

impl LoadContext {
    pub fn initial() -> Self {
        Self {
            skip_loading: true,
            from_initial_load: true,
            origin: NavOrigin::Direct,
        }
    }

    pub fn from_origin(origin: NavOrigin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn breadcrumb_index(&self) -> Option<usize> {
        match self.origin {
            NavOrigin::Breadcrumb { index } => Some(index),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavRequest {
    Home,
    Category { id: CategoryId, context: LoadContext },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub id: CategoryId,
    pub title: String,
}

/// Linear path from the overview to the current category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreadcrumbTrail {
    crumbs: Vec<Crumb>,
}

impl BreadcrumbTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncate to an existing occurrence of `id`, else append it.
    pub fn visit(&mut self, id: CategoryId, title: &str) {
        if let Some(pos) = self.crumbs.iter().position(|c| c.id == id) {
            self.crumbs.truncate(pos + 1);
        } else {
            self.crumbs.push(Crumb {
                id,
                title: title.to_string(),
            });
        }
    }

    /// Keep entries `0..=index`.
    pub fn truncate_to(&mut self, index: usize) {
        self.crumbs.truncate(index.saturating_add(1));
    }

    pub fn clear(&mut self) {
        self.crumbs.clear();
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    pub fn get(&self, index: usize) -> Option<&Crumb> {
        self.crumbs.get(index)
    }

    pub fn last(&self) -> Option<&Crumb> {
        self.crumbs.last()
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryButton {
    pub id: CategoryId,
    pub title: String,
    pub active: bool,
}

/// Breadcrumb target as carried by the DOM (`data-breadcrumb-index`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrumbTarget {
    Home,
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CrumbView {
    pub target: CrumbTarget,
    pub label: String,
    pub aria_label: String,
    pub current: bool,
}

#[derive(Debug, Default)]
pub struct NavigationController {
    categories: Vec<Category>,
    active_category_id: Option<CategoryId>,
    trail: BreadcrumbTrail,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the known categories; button lists follow the given order.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn set_active_category(&mut self, id: Option<CategoryId>) {
        self.active_category_id = id;
    }

    pub fn active_category(&self) -> Option<CategoryId> {
        self.active_category_id
    }

    pub fn update_breadcrumb_trail(&mut self, id: CategoryId, title: &str) {
        self.trail.visit(id, title);
    }

    pub fn trim_breadcrumb_trail(&mut self, index: usize) {
        self.trail.truncate_to(index);
    }

    pub fn reset_breadcrumbs(&mut self) {
        self.trail.clear();
    }

    pub fn trail(&self) -> &BreadcrumbTrail {
        &self.trail
    }

    /// Buttons for the sidebar; the floating list renders the same entries.
    pub fn category_buttons(&self) -> Vec<CategoryButton> {
        self.categories
            .iter()
            .map(|c| CategoryButton {
                id: c.id,
                title: c.title.clone(),
                active: self.active_category_id == Some(c.id),
            })
            .collect()
    }

    pub fn breadcrumb_view(&self) -> Vec<CrumbView> {
        let mut out = Vec::with_capacity(self.trail.len() + 1);
        out.push(CrumbView {
            target: CrumbTarget::Home,
            label: text::HOME_CRUMB.to_string(),
            aria_label: "Вернуться к списку категорий".to_string(),
            current: self.trail.is_empty(),
        });
        let last = self.trail.len().saturating_sub(1);
        for (index, crumb) in self.trail.crumbs().iter().enumerate() {
            out.push(CrumbView {
                target: CrumbTarget::Index(index),
                label: crumb.title.clone(),
                aria_label: format!("Перейти к категории {}", crumb.title),
                current: index == last,
            });
        }
        out
    }

    /// Sidebar / floating / card click. Clicking the active category is a no-op.
    pub fn on_category_click(&self, id: CategoryId, origin: NavOrigin) -> Option<NavRequest> {
        if self.active_category_id == Some(id) {
            return None;
        }
        Some(NavRequest::Category {
            id,
            context: LoadContext::from_origin(origin),
        })
    }

    /// Breadcrumb click. Unknown indices and the active category are ignored.
    pub fn on_breadcrumb_click(&self, target: CrumbTarget) -> Option<NavRequest> {
        match target {
            CrumbTarget::Home => Some(NavRequest::Home),
            CrumbTarget::Index(index) => {
                let crumb = self.trail.get(index)?;
                if self.active_category_id == Some(crumb.id) {
                    return None;
                }
                Some(NavRequest::Category {
                    id: crumb.id,
                    context: LoadContext::from_origin(NavOrigin::Breadcrumb { index }),
                })
            }
        }
    }
}
