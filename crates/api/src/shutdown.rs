use std::io;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Process stop signals: ctrl-c everywhere, SIGTERM on unix.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Register the SIGTERM handler immediately, so a signal delivered before
    /// anyone awaits `recv` is still observed.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    /// Wait for the first stop signal and return its name.
    #[cfg_attr(not(unix), allow(unused_mut))]
    pub async fn recv(mut self) -> &'static str {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = self.terminate.recv();
        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            _ = ctrl_c => "ctrl-c",
            _ = terminate => "SIGTERM",
        }
    }
}

/// Cancel `shutdown` once a stop signal arrives. Used as the server's
/// graceful-shutdown future; the same token stops the reload worker.
pub async fn shutdown_on_signal(signal: ShutdownSignal, shutdown: CancellationToken) {
    let name = signal.recv().await;
    info!(signal = name, "shutdown requested");
    shutdown.cancel();
}
