//! Shutdown signal handling.

use std::fmt;

use anyhow::Result;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Signal that ended the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    CtrlC,
    Sigterm,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CtrlC => f.write_str("Ctrl+C"),
            Self::Sigterm => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for Ctrl+C or SIGTERM, whichever comes first.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> Result<ShutdownSignal> {
    let received = tokio::select! {
        result = wait_ctrl_c() => result?,
        result = wait_sigterm() => result?,
    };
    tracing::info!(signal = %received, "Shutdown signal received, initiating graceful shutdown");
    Ok(received)
}

/// Cancel `token` on the first shutdown signal.
///
/// A failure to install the handlers also cancels, so the host never runs
/// without a way to stop it.
pub fn cancel_on_shutdown(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = wait_for_shutdown() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Signal handling failed; shutting down");
                }
                token.cancel();
            }
            () = token.cancelled() => {}
        }
    })
}

async fn wait_ctrl_c() -> Result<ShutdownSignal> {
    signal::ctrl_c().await?;
    Ok(ShutdownSignal::CtrlC)
}

#[cfg(unix)]
async fn wait_sigterm() -> Result<ShutdownSignal> {
    let mut handler = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    handler.recv().await;
    Ok(ShutdownSignal::Sigterm)
}

#[cfg(not(unix))]
async fn wait_sigterm() -> Result<ShutdownSignal> {
    std::future::pending::<Result<ShutdownSignal>>().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn waiter_exits_when_token_is_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let waiter = cancel_on_shutdown(token.clone());
        token.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[test]
    fn signal_names() {
        assert_eq!(ShutdownSignal::CtrlC.to_string(), "Ctrl+C");
        assert_eq!(ShutdownSignal::Sigterm.to_string(), "SIGTERM");
    }
}
