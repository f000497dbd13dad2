//! Scoped turn notifications.
//!
//! Callers register a callback and get a [`Subscription`] back. The callback
//! stays registered exactly as long as the subscription lives.

use std::sync::Arc;

use parking_lot::Mutex;

type Callback<E> = Box<dyn Fn(&E) + Send>;

struct Registry<E> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<E>)>,
}

/// Registry of callbacks notified with every event of type `E`
pub struct TurnObservers<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E: 'static> TurnObservers<E> {
    /// Creates an empty registry
    pub fn new() -> Self {
        TurnObservers {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Registers `callback` until the returned subscription is dropped
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + 'static,
    {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.push((id, Box::new(callback)));
            id
        };
        let registry = Arc::clone(&self.registry);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                registry.lock().callbacks.retain(|(entry, _)| *entry != id);
            })),
        }
    }

    /// Calls every registered callback with `event`
    ///
    /// Callbacks run under the registry lock and must not subscribe or
    /// unsubscribe from inside.
    pub fn notify(&self, event: &E) {
        let registry = self.registry.lock();
        for (_, callback) in &registry.callbacks {
            callback(event);
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.registry.lock().callbacks.len()
    }

    /// True if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for TurnObservers<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a callback registered; dropping it unsubscribes
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Unsubscribes now
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
