//! Cycling the transport's data-store connection.

use crate::core::ConfigHandle;
use crate::document::TransportConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Seam to the key-value store client whose connection the reconciler
/// cycles. The client itself lives outside this crate.
///
/// The transition signals are one-shot: each call hands out a fresh
/// receiver that fires at most once, so repeated cycles never accumulate
/// listeners on the client.
#[async_trait]
pub trait StoreConnection: Send + Sync + 'static {
    /// Signal fired when the current connection has fully closed.
    fn closed_signal(&self) -> oneshot::Receiver<()>;

    /// Signal fired when a fresh connection is ready for traffic.
    fn ready_signal(&self) -> oneshot::Receiver<()>;

    /// Request a graceful shutdown of the current connection.
    async fn quit(&self) -> Result<()>;

    /// Open a fresh connection using the given transport settings.
    async fn connect(&self, transport: &TransportConfig) -> Result<()>;
}

/// Cycle the store connection: shut it down gracefully and reconnect with
/// whatever transport settings are current once the close is observed.
///
/// Fire-and-forget: the cycle runs on a spawned task and the update
/// pipeline never waits for it. Both transition signals are obtained
/// before the shutdown request so neither transition can be missed.
/// Failures are logged and never roll back the applied configuration.
pub(crate) fn cycle_store(store: Arc<dyn StoreConnection>, handle: ConfigHandle) {
    let closed = store.closed_signal();
    let ready = store.ready_signal();

    tokio::spawn(async move {
        debug!("requesting store shutdown");
        if let Err(err) = store.quit().await {
            error!(error = %err, "store shutdown request failed; connection left as-is");
            return;
        }

        if closed.await.is_err() {
            warn!("store closed signal dropped before firing");
            return;
        }
        info!("store connection closed");

        let transport = handle.snapshot().transport.clone();
        if let Err(err) = store.connect(&transport).await {
            error!(error = %err, url = %transport.store.url, "store reconnect failed");
            return;
        }

        if ready.await.is_ok() {
            info!("store connection ready");
        } else {
            warn!("store ready signal dropped before firing");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ConfigDocument;
    use crate::error::ConfigError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedStore {
        fail_quit: bool,
        quits: AtomicUsize,
        connects: Mutex<Vec<TransportConfig>>,
        closed_tx: Mutex<Option<oneshot::Sender<()>>>,
        ready_tx: Mutex<Option<oneshot::Sender<()>>>,
    }

    #[async_trait]
    impl StoreConnection for ScriptedStore {
        fn closed_signal(&self) -> oneshot::Receiver<()> {
            let (tx, rx) = oneshot::channel();
            *self.closed_tx.lock().unwrap() = Some(tx);
            rx
        }

        fn ready_signal(&self) -> oneshot::Receiver<()> {
            let (tx, rx) = oneshot::channel();
            *self.ready_tx.lock().unwrap() = Some(tx);
            rx
        }

        async fn quit(&self) -> Result<()> {
            if self.fail_quit {
                return Err(ConfigError::Resource("store refused shutdown".into()));
            }
            self.quits.fetch_add(1, Ordering::SeqCst);
            if let Some(tx) = self.closed_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
            Ok(())
        }

        async fn connect(&self, transport: &TransportConfig) -> Result<()> {
            self.connects.lock().unwrap().push(transport.clone());
            if let Some(tx) = self.ready_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
            Ok(())
        }
    }

    fn handle_with_store_url(url: &str) -> ConfigHandle {
        let mut document = ConfigDocument::default();
        document.transport.store.url = url.into();
        ConfigHandle::new(document)
    }

    #[tokio::test]
    async fn cycle_quits_then_reconnects_with_current_settings() {
        let store = Arc::new(ScriptedStore::default());
        let handle = handle_with_store_url("redis://new-host:6379");

        cycle_store(Arc::clone(&store) as Arc<dyn StoreConnection>, handle);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.quits.load(Ordering::SeqCst), 1);
        let connects = store.connects.lock().unwrap();
        assert_eq!(connects.len(), 1);
        assert_eq!(connects[0].store.url, "redis://new-host:6379");
    }

    #[tokio::test]
    async fn failed_shutdown_aborts_the_cycle() {
        let store = Arc::new(ScriptedStore {
            fail_quit: true,
            ..ScriptedStore::default()
        });
        let handle = handle_with_store_url("redis://unused:6379");

        cycle_store(Arc::clone(&store) as Arc<dyn StoreConnection>, handle);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(store.connects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reconnect_uses_settings_current_at_close_time() {
        let store = Arc::new(ScriptedStore::default());
        let handle = handle_with_store_url("redis://first:6379");

        // settings change between scheduling and the observed close
        cycle_store(Arc::clone(&store) as Arc<dyn StoreConnection>, handle.clone());
        let mut updated = (*handle.snapshot()).clone();
        updated.transport.store.url = "redis://second:6379".into();
        handle.replace(updated);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let connects = store.connects.lock().unwrap();
        assert_eq!(connects.len(), 1);
        assert_eq!(connects[0].store.url, "redis://second:6379");
    }
}
