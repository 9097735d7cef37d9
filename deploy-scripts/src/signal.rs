//! Signal handling for interrupting a deployment run
//!
//! The first SIGINT or SIGTERM cancels the run's token, so no further networks
//! are started while in-flight deployments finish. A second signal aborts the
//! process.

use std::{future::Future, io};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::constants::INTERRUPTED_EXIT_CODE;

/// Installs SIGINT + SIGTERM handlers that cancel the given token
pub fn setup_signal_handler(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(handle_interrupts(cancel, wait_for_signal, || {
        std::process::exit(i32::from(INTERRUPTED_EXIT_CODE))
    }))
}

/// Cancel the token on the first signal and call `abort` on the second
pub async fn handle_interrupts<F, Fut>(
    cancel: CancellationToken,
    mut next_signal: F,
    abort: impl FnOnce(),
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        error!("failed to listen for signals: {}", e);
        return;
    }
    warn!("interrupted, no further networks will be started (interrupt again to abort)");
    cancel.cancel();

    match next_signal().await {
        Ok(()) => {
            error!("interrupted again, aborting with deployments in flight");
            abort();
        }
        Err(e) => error!("failed to listen for signals: {}", e),
    }
}

/// Wait for the next SIGINT or SIGTERM
#[cfg(unix)]
async fn wait_for_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = sigterm.recv() => Ok(()),
    }
}

/// Wait for the next SIGINT
#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
