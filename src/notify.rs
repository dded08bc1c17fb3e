//! One-shot user notifications (toasts). The toast UI itself lives in the
//! DOM shell; the core only says what to show.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

pub trait Notifier {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message)
    }
    fn info(&self, message: &str) {
        self.notify(Level::Info, message)
    }
    fn warning(&self, message: &str) {
        self.notify(Level::Warning, message)
    }
    fn error(&self, message: &str) {
        self.notify(Level::Error, message)
    }
}

/// Writes notifications to the log; used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Error => log::error!("[notify] {message}"),
            Level::Warning => log::warn!("[notify] {message}"),
            Level::Success | Level::Info => log::info!("[notify] {message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: Level,
    pub message: String,
}

/// Queues notifications so a snapshot can hand them to the DOM shell.
#[derive(Debug, Clone, Default)]
pub struct QueueNotifier {
    queue: Rc<RefCell<Vec<Toast>>>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything queued so far.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn pending(&self) -> Vec<Toast> {
        self.queue.borrow().clone()
    }
}

impl Notifier for QueueNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.queue.borrow_mut().push(Toast {
            level,
            message: message.to_string(),
        });
    }
}
