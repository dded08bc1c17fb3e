//! Platform abstraction (session storage, viewport, page access).

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod web;
        pub use web::{
            element_exists, host_init_data, host_ready, page_config_json, page_origin, page_query,
            BrowserSessionStorage, WindowViewport,
        };
    } else {
        mod native;
        pub use native::headless_surfaces;
    }
}
