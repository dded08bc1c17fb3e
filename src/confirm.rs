//! Single-slot confirmation gate.
//!
//! A destructive admin action calls [`ConfirmGate::request`] and awaits the
//! answer; the DOM shell shows the modal for [`ConfirmGate::pending_message`]
//! and reports the click through [`ConfirmGate::answer`]. Only one request is
//! outstanding: a newer request cancels the older one, which resolves `false`.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use tokio::sync::oneshot;

struct Pending {
    message: String,
    reply: oneshot::Sender<bool>,
}

type Listener = Rc<dyn Fn(&str)>;

/// Cloning yields another handle to the same slot.
#[derive(Clone, Default)]
pub struct ConfirmGate {
    slot: Rc<RefCell<Option<Pending>>>,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the message whenever a new request is registered.
    pub fn set_listener(&self, listener: impl Fn(&str) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Register a confirmation and return a future for the user's answer.
    ///
    /// The request is registered before the future is first polled, so a
    /// caller can answer it right after this returns.
    pub fn request(&self, message: impl Into<String>) -> impl Future<Output = bool> {
        let (tx, rx) = oneshot::channel();
        let previous = self.slot.borrow_mut().replace(Pending {
            message: message.into(),
            reply: tx,
        });
        if let Some(prev) = previous {
            log::debug!("[confirm] superseded pending request: {}", prev.message);
            let _ = prev.reply.send(false);
        }
        let listener = self.listener.borrow().clone();
        if let (Some(listener), Some(message)) = (listener, self.pending_message()) {
            listener(&message);
        }
        // A dropped gate counts as "declined".
        async move { rx.await.unwrap_or(false) }
    }

    /// Resolve the pending request. Returns false when nothing was pending.
    pub fn answer(&self, confirmed: bool) -> bool {
        match self.slot.borrow_mut().take() {
            Some(pending) => {
                let _ = pending.reply.send(confirmed);
                true
            }
            None => {
                log::debug!("[confirm] answer with no pending request ignored");
                false
            }
        }
    }

    pub fn pending_message(&self) -> Option<String> {
        self.slot.borrow().as_ref().map(|p| p.message.clone())
    }

    pub fn is_pending(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answer_resolves_request() {
        let gate = ConfirmGate::new();
        let fut = gate.request("Удалить?");
        assert_eq!(gate.pending_message().as_deref(), Some("Удалить?"));
        assert!(gate.answer(true));
        assert!(fut.await);
        assert!(!gate.is_pending());
    }

    #[tokio::test]
    async fn newer_request_cancels_older() {
        let gate = ConfirmGate::new();
        let first = gate.request("first");
        let second = gate.request("second");
        assert!(!first.await);
        assert_eq!(gate.pending_message().as_deref(), Some("second"));
        gate.answer(true);
        assert!(second.await);
    }

    #[tokio::test]
    async fn listener_sees_each_request() {
        let gate = ConfirmGate::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        gate.set_listener(move |msg| sink.borrow_mut().push(msg.to_string()));
        let fut = gate.request("Удалить элемент?");
        gate.answer(true);
        assert!(fut.await);
        assert_eq!(*seen.borrow(), vec!["Удалить элемент?".to_string()]);
    }

    #[test]
    fn stray_answer_is_ignored() {
        let gate = ConfirmGate::new();
        assert!(!gate.answer(true));
    }

    #[tokio::test]
    async fn declined_resolves_false() {
        let gate = ConfirmGate::new();
        let fut = gate.request("x");
        gate.answer(false);
        assert!(!fut.await);
    }
}
