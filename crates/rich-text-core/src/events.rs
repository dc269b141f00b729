//! Event subscriptions.
//!
//! The engine reports everything a host could care about through one event
//! stream. Subscriptions are explicit objects: `subscribe` hands back an id
//! and `unsubscribe` removes exactly that registration, so repeated
//! mount/unmount cycles cannot leak listeners.

use crate::keys::KeyEvent;

/// Payload of a style-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleChangePayload {
    /// Event label (e.g. `"Style Event"`, `"Action Click Event"`).
    pub name: String,
    /// The toolbar component or command involved, if any.
    pub component: Option<String>,
    /// Whether UI was requested for the underlying primitive.
    pub show_ui: Option<bool>,
    /// Value passed to the underlying primitive (color, URL).
    pub value: Option<String>,
}

/// Events emitted by the editor shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A key was released in the editable surface.
    TextChange {
        /// The originating key event.
        key: KeyEvent,
    },
    /// A formatting action ran.
    StyleChange(StyleChangePayload),
    /// The surface gained focus.
    Focus,
    /// The surface lost focus.
    Blur,
    /// The link popover resolved `open`; the host should navigate to `url` in
    /// a new browsing context.
    LinkOpenRequested {
        /// Target URL.
        url: String,
    },
}

/// Handle to one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EventCallback = Box<dyn FnMut(&EditorEvent) + Send>;

/// Subscription registry with paired deregistration.
#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, EventCallback)>,
}

impl EventHub {
    /// New hub with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; the returned id removes it again.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(existing, _)| *existing != id);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver an event to every subscriber, in registration order.
    pub fn emit(&mut self, event: &EditorEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_subscribe_and_emit() {
        let mut hub = EventHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        hub.subscribe(move |event| {
            seen_clone.lock().unwrap().push(event.clone());
        });

        hub.emit(&EditorEvent::Focus);
        hub.emit(&EditorEvent::Blur);

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], EditorEvent::Focus);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut hub = EventHub::new();
        let count = Arc::new(Mutex::new(0usize));
        let count_clone = count.clone();
        let id = hub.subscribe(move |_| {
            *count_clone.lock().unwrap() += 1;
        });

        hub.emit(&EditorEvent::Focus);
        hub.unsubscribe(id);
        hub.emit(&EditorEvent::Focus);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_ignored() {
        let mut hub = EventHub::new();
        let id = hub.subscribe(|_| {});
        hub.unsubscribe(id);
        hub.unsubscribe(id);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
