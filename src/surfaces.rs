//! Host capabilities the controllers need, gathered in one struct that is
//! built once at startup.

use crate::notify::Notifier;
use crate::storage::SessionStore;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Jump without animation
    Instant,
    /// Browser default (`auto`), used on the very first load
    Auto,
    Smooth,
}

/// Vertical scroll position of the content page.
pub trait Viewport {
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);
}

/// Viewport that only remembers the last requested position; used by the
/// CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewport {
    inner: Rc<RefCell<RecordingViewportState>>,
}

#[derive(Debug, Clone, Default)]
struct RecordingViewportState {
    y: f64,
    scrolls: Vec<(f64, ScrollBehavior)>,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user scrolling.
    pub fn user_scroll(&self, y: f64) {
        self.inner.borrow_mut().y = y;
    }

    pub fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
        self.inner.borrow().scrolls.last().copied()
    }

    pub fn scroll_count(&self) -> usize {
        self.inner.borrow().scrolls.len()
    }
}

impl Viewport for RecordingViewport {
    fn scroll_y(&self) -> f64 {
        self.inner.borrow().y
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let mut state = self.inner.borrow_mut();
        state.y = top;
        state.scrolls.push((top, behavior));
    }
}

pub struct Surfaces {
    pub storage: Box<dyn SessionStore>,
    pub viewport: Box<dyn Viewport>,
    pub notifier: Rc<dyn Notifier>,
}

/// Raised when the page lacks an element the client cannot work without.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("required element #{0} is missing from the page")]
    MissingElement(String),
    #[error("browser window is not available")]
    NoWindow,
}

/// Element ids the DOM shell must provide.
pub const REQUIRED_ELEMENT_IDS: &[&str] = &[
    "categoryTitle",
    "categoryDescription",
    "categoryMeta",
    "categoryHero",
    "contentItems",
    "loadingState",
    "errorState",
    "errorMessage",
    "retryButton",
    "emptyState",
    "categoryList",
    "floatingCategoryList",
    "breadcrumbs",
];

/// Check every required id against `exists`, reporting the first missing one.
pub fn validate_required_elements(exists: impl Fn(&str) -> bool) -> Result<(), SurfaceError> {
    match REQUIRED_ELEMENT_IDS.iter().find(|id| !exists(id)) {
        Some(id) => Err(SurfaceError::MissingElement((*id).to_string())),
        None => Ok(()),
    }
}
