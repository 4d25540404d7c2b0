//! One shutdown signal for the admin server and anything else the daemon runs.

use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Clone, Default)]
pub struct ShutdownController {
    notify: Arc<Notify>,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the shutdown signal on SIGINT, SIGTERM or SIGQUIT.
    pub fn install_signal_handler(&self) {
        tracing::debug!("install_signal_handler");

        let notify = self.notify.clone();
        tokio::task::spawn(async move {
            match shutdown_stream().await {
                Ok(()) => notify.notify_waiters(),
                Err(e) => tracing::error!("Failed to listen for shutdown signals: {e}"),
            }
        });
    }

    pub fn shutdown(&self) {
        tracing::info!("Shutting down scout.");
        self.notify.notify_waiters();
    }

    pub async fn wait_for_shutdown(self) {
        self.notify.notified().await;
    }
}

#[cfg(unix)]
async fn shutdown_stream() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    let mut terminate_signal = signal(SignalKind::terminate())?;
    let mut quit_signal = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt_signal.recv() => {
            tracing::info!("Received ctrl-c signal.");
        }
        _ = terminate_signal.recv() => {
            tracing::info!("Received SIGTERM signal.");
        }
        _ = quit_signal.recv() => {
            tracing::info!("Received SIGQUIT signal.");
        }
    }
    Ok(())
}

#[cfg(windows)]
async fn shutdown_stream() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received ctrl-c signal.");
    Ok(())
}
