//! Publish/subscribe points for input notifications.
//!
//! Each controller exposes one [`EventChannel`] per notification category
//! (pointer moved, left clicked, key pressed, ...).  Handlers run
//! synchronously on whichever thread emits: the caller's thread for
//! injections, the hook message-pump thread for observed events.
//!
//! # Re-entrancy
//!
//! `emit` copies the handler list out of the lock before calling anything,
//! so a handler may subscribe, unsubscribe, or trigger another emission on
//! the same channel without deadlocking.  A handler removed during an
//! emission may still receive that one in-flight event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Identifies one subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A thread-safe list of handlers for one event category.
pub struct EventChannel<T> {
    handlers: RwLock<Vec<(SubscriptionId, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> EventChannel<T> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `handler` and returns the id needed to remove it.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(handler)));
        id
    }

    /// Removes a subscription.  Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    /// Calls every registered handler with `event`, in subscription order.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_reaches_every_subscriber_in_order() {
        // Arrange
        let channel = EventChannel::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            channel.subscribe(move |value: &u32| seen.lock().unwrap().push((tag, *value)));
        }

        // Act
        channel.emit(&7);

        // Assert
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_emit_without_subscribers_is_a_no_op() {
        let channel = EventChannel::<String>::new();
        channel.emit(&"nobody listening".to_string());
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        // Arrange
        let channel = EventChannel::<u8>::new();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let id = channel.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        channel.emit(&1);

        // Act
        let removed = channel.unsubscribe(id);
        channel.emit(&2);

        // Assert
        assert!(removed);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!channel.unsubscribe(id), "second removal must report false");
    }

    #[test]
    fn test_handler_may_subscribe_during_emit() {
        // Arrange – a handler that registers another handler re-enters the lock.
        let channel = Arc::new(EventChannel::<u8>::new());
        let inner = Arc::clone(&channel);
        channel.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        // Act
        channel.emit(&0);

        // Assert
        assert_eq!(channel.subscriber_count(), 2);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let channel = EventChannel::<()>::new();
        let a = channel.subscribe(|_| {});
        let b = channel.subscribe(|_| {});
        assert_ne!(a, b);
    }
}
