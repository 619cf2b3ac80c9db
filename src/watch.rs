//! Watch/notify: path-keyed content watchers and typed change events.
//!
//! Watchers let an open editor buffer react to programmatic writes to the
//! path it displays. Change events are the coarser feed an explorer panel
//! subscribes to for refreshes. Delivery is synchronous and in-process:
//! called once per successful write, in registration order, no debouncing.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// File system change event. One payload shape per message kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created { path: String },
    Written { path: String },
    Removed { path: String },
    Renamed { from: String, to: String },
}

type WatchCallback = Arc<dyn Fn(&str) + Send + Sync>;
type ChangeCallback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    next_token: u64,
    watchers: HashMap<String, Vec<(u64, WatchCallback)>>,
    subscribers: Vec<(u64, ChangeCallback)>,
}

/// Watcher registry shared between the service and outstanding handles.
#[derive(Clone, Default)]
pub struct WatchRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for writes to exactly `path`.
    ///
    /// The returned handle removes exactly that callback; the path's entry
    /// is dropped entirely once its last callback is gone.
    pub fn watch(
        &self,
        path: &str,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> WatchHandle {
        let mut inner = self.inner.write();
        let token = inner.next_token;
        inner.next_token += 1;
        inner
            .watchers
            .entry(path.to_string())
            .or_default()
            .push((token, Arc::new(callback)));
        WatchHandle {
            inner: Arc::clone(&self.inner),
            path: path.to_string(),
            token,
        }
    }

    /// Subscribe to the typed change-event feed.
    pub fn subscribe(
        &self,
        callback: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let mut inner = self.inner.write();
        let token = inner.next_token;
        inner.next_token += 1;
        inner.subscribers.push((token, Arc::new(callback)));
        SubscriptionHandle {
            inner: Arc::clone(&self.inner),
            token,
        }
    }

    /// Invoke every watcher registered for `path`, in registration order.
    ///
    /// Callbacks run outside the registry lock so they may register or
    /// unsubscribe watchers themselves.
    pub fn notify(&self, path: &str, content: &str) {
        let callbacks: Vec<WatchCallback> = {
            let inner = self.inner.read();
            match inner.watchers.get(path) {
                Some(entries) => entries.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
                None => return,
            }
        };
        debug!(path, watchers = callbacks.len(), "notifying watchers");
        for callback in callbacks {
            callback(content);
        }
    }

    /// Broadcast a change event to all subscribers, in registration order.
    pub fn emit(&self, event: &ChangeEvent) {
        let callbacks: Vec<ChangeCallback> = {
            let inner = self.inner.read();
            inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback(event);
        }
    }

    #[cfg(test)]
    fn watched_path_count(&self) -> usize {
        self.inner.read().watchers.len()
    }
}

/// Removes exactly the callback it was created for.
pub struct WatchHandle {
    inner: Arc<RwLock<RegistryInner>>,
    path: String,
    token: u64,
}

impl WatchHandle {
    pub fn unsubscribe(self) {
        let mut inner = self.inner.write();
        if let Some(entries) = inner.watchers.get_mut(&self.path) {
            entries.retain(|(token, _)| *token != self.token);
            if entries.is_empty() {
                inner.watchers.remove(&self.path);
            }
        }
    }
}

/// Removes a change-event subscription.
pub struct SubscriptionHandle {
    inner: Arc<RwLock<RegistryInner>>,
    token: u64,
}

impl SubscriptionHandle {
    pub fn unsubscribe(self) {
        let mut inner = self.inner.write();
        inner.subscribers.retain(|(token, _)| *token != self.token);
    }
}
