//! Foreground lifecycle of the watch command.
//!
//! Runs the monitor until the operator interrupts it, then closes the
//! device link. Pending dialogs and emails are not waited for.

use crate::libs::classifier::Classifier;
use crate::libs::messages::Message;
use crate::libs::monitor::Monitor;
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;

/// Runs the monitor with signal handling for graceful shutdown.
pub async fn run_with_signal_handling<K: Classifier>(monitor: &mut Monitor<K>) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    tokio::select! {
        result = monitor.run() => {
            match result {
                Ok(()) => msg_info!(Message::MonitorExitedNormally),
                Err(e) => msg_error!(Message::MonitorError(e.to_string())),
            }
        }
        _ = shutdown_rx => {
            msg_info!(Message::MonitorShuttingDown);
        }
    }

    monitor.shutdown();
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(_) => {
            msg_error!(Message::FailedToCreateSigtermHandler);
            return wait_for_ctrl_c().await;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(sigint) => sigint,
        Err(_) => {
            msg_error!(Message::FailedToCreateSigintHandler);
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            msg_info!(Message::WatcherReceivedSigterm);
        }
        _ = sigint.recv() => {
            msg_info!(Message::WatcherReceivedSigint);
        }
    }
}

#[cfg(windows)]
async fn wait_for_shutdown_signal() {
    wait_for_ctrl_c().await
}

#[cfg(not(any(unix, windows)))]
async fn wait_for_shutdown_signal() {
    msg_warning!(Message::WatcherSignalHandlingNotSupported);
    std::future::pending::<()>().await
}

#[cfg_attr(not(any(unix, windows)), allow(dead_code))]
async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
        Err(e) => {
            msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
            // Without a signal source the monitor only stops when the process is killed
            msg_warning!(Message::WatcherSignalHandlingNotSupported);
            std::future::pending::<()>().await
        }
    }
}
