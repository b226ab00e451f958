use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

/// Shutdown coordinator that manages graceful application shutdown.
///
/// Cloneable handle around a `watch` channel. Any clone may trigger
/// shutdown; every clone (and every future from [`cancelled`]) observes it.
///
/// [`cancelled`]: ShutdownCoordinator::cancelled
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    tx: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Check if shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        *self.tx.borrow()
    }

    /// Initiate shutdown and notify all subscribers. Idempotent.
    pub fn shutdown(&self) {
        let initiated = self.tx.send_if_modified(|down| {
            if *down {
                false
            } else {
                *down = true;
                true
            }
        });
        if initiated {
            info!("Initiating graceful shutdown");
        }
    }

    /// Resolves once shutdown has been initiated, immediately if it already was.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|down| *down).await;
    }

    /// Wait for SIGTERM or SIGINT, then initiate shutdown.
    ///
    /// Also returns if shutdown was triggered some other way first.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown");
            },
            _ = self.cancelled() => return,
        }

        self.shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
