//! Reloadable config section with change notification.
//!
//! Sections that a long-running processor has to react to (rather than
//! just read on each request) live in a [`ConfigStore`]. The processor
//! holds a [`ConfigWatcher`] and rebuilds whatever it derived from the
//! section when the watcher fires.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, watch};

/// A shared config section.
pub struct ConfigStore<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    data: RwLock<T>,
    version_tx: watch::Sender<u64>,
}

/// Fires after [`ConfigStore::update`]. Updates that land before the
/// watcher wakes are seen as one change.
pub struct ConfigWatcher {
    version_rx: watch::Receiver<u64>,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(Inner {
                data: RwLock::new(initial),
                version_tx,
            }),
        }
    }

    /// Swap in a new value and wake every watcher.
    pub async fn update(&self, value: T) {
        let mut guard = self.inner.data.write().await;
        *guard = value;
        // Release the write lock first so woken watchers can read right away.
        drop(guard);
        self.inner.version_tx.send_modify(|version| *version += 1);
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.data.read().await
    }

    pub fn subscribe(&self) -> ConfigWatcher {
        ConfigWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ConfigWatcher {
    /// Wait for the next update. Errors once the store is dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.version_rx.changed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_update_wakes_watcher() {
        let store = ConfigStore::new(1u32);
        let mut watcher = store.subscribe();

        let writer = store.clone();
        tokio::spawn(async move { writer.update(2).await });

        tokio::time::timeout(Duration::from_secs(1), watcher.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*store.read().await, 2);
    }

    #[tokio::test]
    async fn test_updates_before_wakeup_coalesce() {
        let store = ConfigStore::new(1u32);
        let mut watcher = store.subscribe();

        store.update(2).await;
        store.update(3).await;
        watcher.changed().await.unwrap();
        assert_eq!(*store.read().await, 3);

        let pending = tokio::time::timeout(Duration::from_millis(50), watcher.changed()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_watcher_errors_after_store_dropped() {
        let store = ConfigStore::new("a".to_string());
        let mut watcher = store.subscribe();
        assert_eq!(*store.read().await, "a");
        drop(store);
        assert!(watcher.changed().await.is_err());
    }
}
