//! Navigation state that survives reloads within a browser session:
//! per-category scroll offsets and the last viewed category.
//!
//! Missing, unreadable or corrupt entries read as "no prior state"; storage
//! failures are logged and never reach the user.

use crate::constants::storage as keys;
use crate::models::CategoryId;
use crate::storage::SessionStore;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavState {
    scroll_positions: HashMap<CategoryId, f64>,
    last_category_id: Option<CategoryId>,
}

impl NavState {
    pub fn restore(store: &dyn SessionStore) -> Self {
        let mut state = NavState::default();

        match store.get_item(keys::SCROLL_POSITIONS) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<(CategoryId, f64)>>(&raw) {
                Ok(entries) => state.scroll_positions = entries.into_iter().collect(),
                Err(e) => log::warn!("[nav_state] ignoring corrupt scroll positions: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("[nav_state] failed to restore scroll positions: {e}"),
        }

        match store.get_item(keys::LAST_CATEGORY) {
            Ok(Some(raw)) => state.last_category_id = parse_leading_int(&raw),
            Ok(None) => {}
            Err(e) => log::warn!("[nav_state] failed to restore last category: {e}"),
        }

        state
    }

    pub fn last_category_id(&self) -> Option<CategoryId> {
        self.last_category_id
    }

    pub fn scroll_position(&self, id: CategoryId) -> Option<f64> {
        self.scroll_positions.get(&id).copied()
    }

    pub fn remember_scroll(&mut self, id: CategoryId, offset: f64) {
        self.scroll_positions.insert(id, offset);
    }

    pub fn persist_scroll_positions(&self, store: &dyn SessionStore) {
        let mut entries: Vec<(CategoryId, f64)> =
            self.scroll_positions.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(id, _)| *id);
        let raw = match serde_json::to_string(&entries) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("[nav_state] failed to encode scroll positions: {e}");
                return;
            }
        };
        if let Err(e) = store.set_item(keys::SCROLL_POSITIONS, &raw) {
            log::warn!("[nav_state] failed to persist scroll positions: {e}");
        }
    }

    /// Record (or clear, for `None`) the last viewed category and persist it.
    pub fn set_last_category(&mut self, store: &dyn SessionStore, id: Option<CategoryId>) {
        self.last_category_id = id;
        let res = match id {
            Some(id) => store.set_item(keys::LAST_CATEGORY, &id.to_string()),
            None => store.remove_item(keys::LAST_CATEGORY),
        };
        if let Err(e) = res {
            log::warn!("[nav_state] failed to persist last category: {e}");
        }
    }
}

/// `parseInt`-style: optional sign and leading digits, rest ignored.
fn parse_leading_int(raw: &str) -> Option<CategoryId> {
    let s = raw.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<CategoryId>().ok().map(|n| n * sign)
}
