//! tgcatalog - Telegram mini-app catalog client
//!
//! This library provides the headless core of the catalog mini-app: a REST
//! client with a TTL read cache, category navigation with a breadcrumb trail,
//! the application controller (loading / error / content / empty states,
//! scroll persistence) and the admin editor for CRUD and reordering.
//!
//! ## Architecture
//!
//! The core owns state and talks HTTP; it never touches the DOM. It runs in
//! two shells:
//! - **Native**: the `tgcatalog` CLI (tokio + reqwest) for browsing and
//!   administering the backend from a terminal
//! - **Web**: the `tgcatalog-web-dom` wasm façade, which hands JSON
//!   snapshots to a DOM shell and takes JSON actions back
//!
//! ## Usage
//!
//! For native builds:
//! ```bash
//! cargo build --features native
//! ```
//!
//! For web builds:
//! ```bash
//! cargo build --target wasm32-unknown-unknown --no-default-features --features dom-web --bin tgcatalog-web-dom
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Read cache and HTTP plumbing
pub mod cache;
pub mod transport;
pub mod api;
pub mod admin_api;

// Navigation and page state
pub mod navigation;
pub mod nav_state;
pub mod plural;
pub mod render;
pub mod app;

// Admin editor
pub mod admin;
pub mod confirm;
pub mod reorder;

// Host capabilities
pub mod notify;
pub mod storage;
pub mod surfaces;

// UI snapshot types for DOM-based rendering (all platforms)
pub mod session;
pub mod ui_snapshot;

// Platform abstraction layer
pub mod platform;

pub use admin::AdminEditor;
pub use api::ApiClient;
pub use app::{AppController, ViewState};
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use config::{Config, Mode, WebAppConfig};
pub use error::{ClientError, ClientResult};
pub use navigation::{BreadcrumbTrail, NavigationController};
pub use session::Session;
pub use transport::{HttpTransport, ReqwestTransport};
pub use ui_snapshot::{UiAction, UiSnapshot};
