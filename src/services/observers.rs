// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Observer registry for change notifications.
//!
//! Callbacks run synchronously on the task that performed the mutation.
//! Dropping the returned [`Subscription`] deregisters the callback.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: AtomicU64,
    callbacks: DashMap<u64, Callback<E>>,
}

/// Set of callbacks interested in events of type `E`.
pub struct Observers<E> {
    registry: Arc<Registry<E>>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                callbacks: DashMap::new(),
            }),
        }
    }
}

impl<E: 'static> Observers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It stays registered until the subscription drops.
    #[must_use = "dropping the subscription immediately deregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.callbacks.insert(id, Arc::new(callback));

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.callbacks.remove(&id);
                }
            })),
        }
    }

    /// Invoke every registered callback in registration order.
    pub fn notify(&self, event: &E) {
        // Snapshot first: a callback may drop its own subscription, and
        // DashMap shard locks must not be held while user code runs.
        let mut callbacks: Vec<(u64, Callback<E>)> = self
            .registry
            .callbacks
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        callbacks.sort_by_key(|(id, _)| *id);

        for (_, callback) in callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.callbacks.is_empty()
    }
}

/// Handle keeping a callback registered.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
