//! # Termination signals.
//!
//! [`wait_for_shutdown_signal`] completes when the process is asked to stop.
//! [`RedialScheduler::run_until_signal`](crate::RedialScheduler::run_until_signal)
//! awaits it before draining the in-flight attempt.
//!
//! | Platform | Signals                       |
//! |----------|-------------------------------|
//! | unix     | `SIGINT`, `SIGTERM`, `SIGQUIT` |
//! | other    | Ctrl-C                        |

/// Resolves on the first termination signal.
///
/// Listeners are installed per call. Fails only if a listener cannot be
/// registered.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt.recv() => {},
        _ = terminate.recv() => {},
        _ = quit.recv() => {},
    }
    Ok(())
}

/// Resolves on Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
