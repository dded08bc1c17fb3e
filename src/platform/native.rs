//! Native platform: no browser, so storage lives in memory and the viewport
//! only records what it was asked to do.

use std::rc::Rc;

use crate::notify::LogNotifier;
use crate::storage::MemoryStorage;
use crate::surfaces::{RecordingViewport, Surfaces};

/// Surfaces for running the controllers outside a browser (CLI `browse`).
pub fn headless_surfaces(storage: MemoryStorage) -> Surfaces {
    Surfaces {
        storage: Box::new(storage),
        viewport: Box::new(RecordingViewport::new()),
        notifier: Rc::new(LogNotifier),
    }
}
