//! Application controller: initial load, category navigation, scroll
//! persistence and the loading / error / content / empty display states.

use crate::api::ApiClient;
use crate::config::Mode;
use crate::constants::text;
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, CategoryDetail, CategoryId};
use crate::nav_state::NavState;
use crate::navigation::{LoadContext, NavRequest, NavigationController};
use crate::notify::Notifier;
use crate::plural::item_count_label;
use crate::render::{render_items, ItemView};
use crate::surfaces::{ScrollBehavior, Surfaces};
use serde::Serialize;
use std::rc::Rc;

/// Mutually exclusive display states.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Loading { message: String },
    /// Shown over whatever content was rendered before the failure.
    Error { message: String, detail: Option<String> },
    Content,
    Empty,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hero {
    pub image_url: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryCard {
    pub id: CategoryId,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub meta: String,
}

/// What the content area currently shows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageView {
    pub title: String,
    pub description: String,
    pub meta: String,
    pub hero: Option<Hero>,
    pub items: Vec<ItemView>,
    pub cards: Vec<CategoryCard>,
}

impl PageView {
    fn overview(cards: Vec<CategoryCard>) -> Self {
        PageView {
            title: text::OVERVIEW_TITLE.to_string(),
            description: text::OVERVIEW_DESCRIPTION.to_string(),
            cards,
            ..Default::default()
        }
    }

    fn category(category: &CategoryDetail) -> Self {
        let hero = category.cover_url.as_ref().map(|url| Hero {
            image_url: url.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
        });
        PageView {
            title: category.title.clone(),
            description: category.description.clone().unwrap_or_default(),
            meta: item_count_label(category.item_count() as u64),
            hero,
            items: render_items(&category.sorted_items()),
            cards: Vec::new(),
        }
    }
}

/// Action replayed by [`AppController::retry`].
#[derive(Clone, Copy, Debug, PartialEq)]
enum Intent {
    InitialLoad,
    Category { id: CategoryId, context: LoadContext },
}

pub struct AppController {
    api: ApiClient,
    surfaces: Surfaces,
    mode: Mode,
    nav: NavigationController,
    nav_state: NavState,
    view: ViewState,
    page: PageView,
    current_category: Option<CategoryDetail>,
    last_intent: Intent,
}

impl AppController {
    /// Build the controller and restore persisted navigation state.
    pub fn new(api: ApiClient, surfaces: Surfaces, mode: Mode) -> Self {
        let nav_state = NavState::restore(surfaces.storage.as_ref());
        Self {
            api,
            surfaces,
            mode,
            nav: NavigationController::new(),
            nav_state,
            view: ViewState::Loading {
                message: text::LOADING_CATEGORIES.to_string(),
            },
            page: PageView::default(),
            current_category: None,
            last_intent: Intent::InitialLoad,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut ApiClient {
        &mut self.api
    }

    pub fn notifier(&self) -> Rc<dyn Notifier> {
        Rc::clone(&self.surfaces.notifier)
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn page(&self) -> &PageView {
        &self.page
    }

    pub fn current_category(&self) -> Option<&CategoryDetail> {
        self.current_category.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        self.nav.categories()
    }

    pub fn last_category_id(&self) -> Option<CategoryId> {
        self.nav_state.last_category_id()
    }

    pub fn mode_badge(&self) -> &'static str {
        match self.mode {
            Mode::Admin => text::MODE_ADMIN,
            Mode::User => text::MODE_USER,
        }
    }

    /// Fetch the category list and open the initial category.
    pub async fn load_initial_data(&mut self) -> ClientResult<()> {
        self.last_intent = Intent::InitialLoad;
        self.show_loading(text::LOADING_CATEGORIES);

        let categories = match self.api.get_categories(false).await {
            Ok(categories) => categories,
            Err(e) => {
                log::error!("[app] failed to load categories: {e}");
                self.show_error(text::ERROR_CATEGORIES, &e);
                return Err(e);
            }
        };
        log::info!("[app] loaded {} categories", categories.len());
        self.nav.set_categories(categories);

        match self.initial_category_id() {
            Some(id) => self.load_category(id, LoadContext::initial()).await,
            None => {
                self.show_category_overview(false);
                self.view = ViewState::Empty;
                Ok(())
            }
        }
    }

    /// Last viewed category if it is still listed, else the first one.
    pub fn initial_category_id(&self) -> Option<CategoryId> {
        let categories = self.nav.categories();
        self.nav_state
            .last_category_id()
            .filter(|last| categories.iter().any(|c| c.id == *last))
            .or_else(|| categories.first().map(|c| c.id))
    }

    /// Fetch and show one category. On failure the error state is shown and
    /// the previously rendered content stays as it was.
    pub async fn load_category(&mut self, id: CategoryId, context: LoadContext) -> ClientResult<()> {
        if self.current_category.is_some() {
            self.save_scroll_position(false);
        }
        self.last_intent = Intent::Category { id, context };
        if !context.skip_loading {
            self.show_loading(text::LOADING_CONTENT);
        }

        let category = match self.api.get_category(id, false).await {
            Ok(category) => category,
            Err(e) => {
                log::error!("[app] failed to load category {id}: {e}");
                self.show_error(text::ERROR_CATEGORY, &e);
                return Err(e);
            }
        };

        self.nav_state
            .set_last_category(self.surfaces.storage.as_ref(), Some(category.id));
        self.nav.set_active_category(Some(id));
        match context.breadcrumb_index() {
            Some(index) => self.nav.trim_breadcrumb_trail(index),
            None => self.nav.update_breadcrumb_trail(category.id, &category.title),
        }

        self.page = PageView::category(&category);
        self.view = if category.items.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Content
        };
        let category_id = category.id;
        self.current_category = Some(category);

        if !self.restore_scroll_position(category_id, context.from_initial_load) {
            let behavior = if context.from_initial_load {
                ScrollBehavior::Auto
            } else {
                ScrollBehavior::Smooth
            };
            self.surfaces.viewport.scroll_to(0.0, behavior);
        }
        Ok(())
    }

    /// Follow a navigation intent produced by the navigation controller.
    pub async fn navigate(&mut self, request: NavRequest) -> ClientResult<()> {
        match request {
            NavRequest::Home => {
                self.show_category_overview(true);
                Ok(())
            }
            NavRequest::Category { id, context } => self.load_category(id, context).await,
        }
    }

    /// Leave the current category and show the category overview.
    pub fn show_category_overview(&mut self, render_cards: bool) {
        self.current_category = None;
        self.last_intent = Intent::InitialLoad;
        self.nav_state
            .set_last_category(self.surfaces.storage.as_ref(), None);
        self.nav.set_active_category(None);
        self.nav.reset_breadcrumbs();

        let cards = if render_cards {
            self.category_cards()
        } else {
            Vec::new()
        };
        self.page = PageView::overview(cards);
        self.view = ViewState::Content;
    }

    fn category_cards(&self) -> Vec<CategoryCard> {
        self.nav
            .categories()
            .iter()
            .map(|c| CategoryCard {
                id: c.id,
                title: c.title.clone(),
                description: c.description.clone(),
                cover_url: c.cover_url.clone(),
                meta: item_count_label(u64::from(c.items_count)),
            })
            .collect()
    }

    /// Replay the action that last failed (or was last requested).
    pub async fn retry(&mut self) -> ClientResult<()> {
        match self.last_intent {
            Intent::InitialLoad => self.load_initial_data().await,
            Intent::Category { id, context } => {
                let context = LoadContext {
                    skip_loading: false,
                    ..context
                };
                self.load_category(id, context).await
            }
        }
    }

    /// Remember the current scroll offset; `persist` also writes all offsets
    /// to session storage.
    pub fn save_scroll_position(&mut self, persist: bool) {
        let Some(id) = self.current_category.as_ref().map(|c| c.id) else {
            return;
        };
        let offset = self.surfaces.viewport.scroll_y();
        self.nav_state.remember_scroll(id, offset);
        if persist {
            self.nav_state
                .persist_scroll_positions(self.surfaces.storage.as_ref());
        }
    }

    /// Page is being hidden or unloaded.
    pub fn page_hide(&mut self) {
        self.save_scroll_position(true);
    }

    fn restore_scroll_position(&self, id: CategoryId, from_initial_load: bool) -> bool {
        let Some(offset) = self.nav_state.scroll_position(id) else {
            return false;
        };
        let behavior = if from_initial_load {
            ScrollBehavior::Auto
        } else {
            ScrollBehavior::Instant
        };
        self.surfaces.viewport.scroll_to(offset, behavior);
        true
    }

    fn show_loading(&mut self, message: &str) {
        self.view = ViewState::Loading {
            message: message.to_string(),
        };
    }

    fn show_error(&mut self, message: &str, error: &ClientError) {
        self.view = ViewState::Error {
            message: message.to_string(),
            detail: Some(error.to_string()),
        };
    }
}
