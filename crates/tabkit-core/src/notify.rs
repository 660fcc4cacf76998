//! Host-facing notifications.
//!
//! Observers see a shared reference to the notification and nothing else,
//! so they cannot reach back into the page and re-enter activation.

use crate::controller::AfterActivation;

/// Something host page code may want to know about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A tab set finished activating a panel.
    AfterActivation(AfterActivation),
    /// The host reported the widget stylesheet as loaded.
    StylesheetReady,
}

/// A host callback.
pub type Observer = Box<dyn FnMut(&Notification)>;

/// Observers in registration order.
#[derive(Default)]
pub struct Notifier {
    observers: Vec<Observer>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    /// Deliver to every observer, synchronously, in registration order.
    pub fn emit(&mut self, notification: &Notification) {
        for observer in &mut self.observers {
            observer(notification);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}
