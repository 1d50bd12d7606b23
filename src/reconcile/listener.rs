//! Cycling the network-facing listener when its bind address changes.

use crate::core::ConfigHandle;
use crate::document::TransportConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info};

/// Default drain window between initiating a listener close and restarting
/// it, giving in-flight responses a chance to finish. Best effort: requests
/// arriving inside the window are not queued or retried.
pub const DEFAULT_DRAIN_WINDOW: Duration = Duration::from_secs(1);

/// Seam to the HTTP server framework whose listener the reconciler cycles.
#[async_trait]
pub trait ListenerControl: Send + Sync + 'static {
    /// Stop accepting connections on the current address.
    async fn close(&self) -> Result<()>;

    /// Re-initialize the network-facing worker on the given address.
    async fn reopen(&self, ip: &str, port: u16) -> Result<()>;
}

/// Schedules close-then-reopen restarts of the listener.
///
/// Restarts are debounced to the latest target: each schedule supersedes
/// any still-pending one, and the restart binds the address and port read
/// from the running configuration at fire time, not at scheduling time.
/// Two address-changing updates inside one drain window therefore produce
/// a single restart, to the newest address.
pub struct ListenerCycler {
    control: Arc<dyn ListenerControl>,
    drain_window: Duration,
    generation: Arc<AtomicU64>,
}

impl ListenerCycler {
    /// Create a cycler with the default drain window.
    pub fn new(control: Arc<dyn ListenerControl>) -> Self {
        Self::with_drain_window(control, DEFAULT_DRAIN_WINDOW)
    }

    /// Create a cycler with a custom drain window.
    pub fn with_drain_window(control: Arc<dyn ListenerControl>, drain_window: Duration) -> Self {
        Self {
            control,
            drain_window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The configured drain window.
    pub fn drain_window(&self) -> Duration {
        self.drain_window
    }

    /// Schedule a restart if the bind address or port changed.
    ///
    /// A close failure skips the reopen so two listeners are never live at
    /// once; failures are logged and never propagate.
    pub(crate) fn maybe_cycle(
        &self,
        previous: &TransportConfig,
        incoming: &TransportConfig,
        handle: &ConfigHandle,
    ) {
        if previous.service_ip == incoming.service_ip
            && previous.service_port == incoming.service_port
        {
            return;
        }

        let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            ip = %incoming.service_ip,
            port = incoming.service_port,
            drain_ms = self.drain_window.as_millis() as u64,
            "listener restart scheduled"
        );

        let control = Arc::clone(&self.control);
        let generation = Arc::clone(&self.generation);
        let handle = handle.clone();
        let drain_window = self.drain_window;

        tokio::spawn(async move {
            tokio::time::sleep(drain_window).await;

            if generation.load(Ordering::SeqCst) != scheduled {
                debug!("listener restart superseded by a newer schedule");
                return;
            }

            let transport = handle.snapshot().transport.clone();
            if let Err(err) = control.close().await {
                error!(error = %err, "listener close failed; restart skipped");
                return;
            }
            if let Err(err) = control.reopen(&transport.service_ip, transport.service_port).await {
                error!(error = %err, "listener reopen failed");
                return;
            }
            info!(ip = %transport.service_ip, port = transport.service_port, "listener restarted");
        });
    }
}
