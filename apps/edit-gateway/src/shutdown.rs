// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process signal handling for graceful shutdown.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel `shutdown` on Ctrl-C or, on Unix, SIGTERM.
///
/// The SIGTERM handler is installed before this returns, so a signal sent
/// right after the call is already caught.
pub fn spawn_signal_listener(shutdown: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        #[cfg(unix)]
        let terminated = terminate.recv();
        #[cfg(not(unix))]
        let terminated = std::future::pending::<Option<()>>();

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                    return;
                }
                tracing::info!(signal = "SIGINT", "Shutdown signal received");
            }
            _ = terminated => {
                tracing::info!(signal = "SIGTERM", "Shutdown signal received");
            }
        }
        shutdown.cancel();
    }))
}

#[cfg(test)]
mod tests {
    use std::process::Command;
    use std::time::Duration;

    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_cancels_the_token() {
        let shutdown = CancellationToken::new();
        let listener = spawn_signal_listener(shutdown.clone()).unwrap();

        let sent = Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status();
        if !matches!(sent, Ok(status) if status.success()) {
            eprintln!("kill unavailable, skipping");
            return;
        }

        tokio::time::timeout(Duration::from_secs(5), shutdown.cancelled())
            .await
            .expect("SIGTERM should cancel the shutdown token");
        listener.await.unwrap();
    }
}
