//! Application constants
//!
//! Centralized constants for HTTP wiring, caching, persisted state keys and
//! the user-facing strings shared between the controller and the DOM shell.

/// HTTP and API wiring
pub mod http {
    /// Header carrying the host-supplied signed init data
    pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

    /// Query parameter consulted when the host shell has no init data
    pub const INIT_DATA_QUERY_PARAM: &str = "initData";

    /// Content type sent on every non-upload request
    pub const JSON_CONTENT_TYPE: &str = "application/json";
}

/// Read cache settings
pub mod cache {
    /// Time-to-live for cached reads (5 minutes)
    pub const TTL_MS: u64 = 5 * 60 * 1000;

    /// Cache key for the current user record
    pub const CURRENT_USER_KEY: &str = "current_user";
}

/// Session storage keys (must stay stable across releases)
pub mod storage {
    /// JSON array of `[categoryId, offset]` pairs
    pub const SCROLL_POSITIONS: &str = "webapp_scroll_positions";

    /// String-encoded integer id of the last viewed category
    pub const LAST_CATEGORY: &str = "webapp_last_category";
}

/// User-facing text
pub mod text {
    pub const OVERVIEW_TITLE: &str = "Категории";
    pub const OVERVIEW_DESCRIPTION: &str = "Выберите категорию для просмотра контента";
    pub const HOME_CRUMB: &str = "Категории";

    pub const LOADING_CATEGORIES: &str = "Загрузка категорий...";
    pub const LOADING_CONTENT: &str = "Загрузка контента...";

    pub const ERROR_CATEGORIES: &str = "Не удалось загрузить категории. Проверьте соединение.";
    pub const ERROR_CATEGORY: &str = "Не удалось загрузить категорию. Попробуйте снова.";
    pub const CATEGORY_NOT_FOUND: &str = "Категория не найдена";

    pub const MODE_ADMIN: &str = "Администратор";
    pub const MODE_USER: &str = "Пользовательский режим";

    pub const SELECT_CATEGORY_FIRST: &str = "Выберите категорию сначала";
    pub const SELECT_FILE: &str = "Выберите файл";
}
