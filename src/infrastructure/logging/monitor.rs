use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::fallback;
use super::rotation::{ActiveLogHandle, Rotated};
use crate::domain::error::LogError;
use crate::domain::ports::ConsoleWriter;

/// Default wake-up period of the rotation monitor.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted wake-up period; a zero period would stall the timer.
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);

/// Background task that rotates the active file when it is due.
///
/// Checks the handle every 10 seconds by default. Rotation failures are
/// reported to the fallback channel and the loop carries on with the old
/// file.
///
/// # Example
///
/// ```rust,no_run
/// use rotolog::infrastructure::logging::{ActiveLogHandle, RotationMonitor, TermConsole};
/// use std::sync::Arc;
///
/// # fn example() -> anyhow::Result<()> {
/// let handle = Arc::new(ActiveLogHandle::open("./log", "server")?);
/// let monitor = RotationMonitor::new(handle, Arc::new(TermConsole::stderr())).spawn()?;
///
/// // Later: stop the loop and wait for it
/// monitor.stop();
/// # Ok(())
/// # }
/// ```
pub struct RotationMonitor {
    handle: Arc<ActiveLogHandle>,
    console: Arc<dyn ConsoleWriter>,
    check_interval: Duration,
}

impl RotationMonitor {
    pub fn new(handle: Arc<ActiveLogHandle>, console: Arc<dyn ConsoleWriter>) -> Self {
        Self {
            handle,
            console,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Periods shorter than [`MIN_CHECK_INTERVAL`] are raised to it.
    #[must_use]
    pub const fn with_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = if check_interval.as_nanos() < MIN_CHECK_INTERVAL.as_nanos() {
            MIN_CHECK_INTERVAL
        } else {
            check_interval
        };
        self
    }

    /// Run one check, rotating if the handle reports it is due.
    pub fn check(&self) -> Option<Rotated> {
        if !self.handle.needs_rotation() {
            return None;
        }

        match self.handle.rotate() {
            Ok(rotated) => Some(rotated),
            Err(e) => {
                fallback::report(self.console.as_ref(), "log rotation failed", &e);
                None
            }
        }
    }

    /// Check on every tick until a shutdown signal arrives or the sender is dropped.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.check_interval);

        // Skip first tick (fires immediately)
        interval.tick().await;

        info!(
            check_interval_ms = u64::try_from(self.check_interval.as_millis()).unwrap_or(u64::MAX),
            path = %self.handle.current_path().display(),
            "rotation monitor started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(rotated) = self.check() {
                        debug!(new_path = %rotated.current.display(), "monitor rotated log file");
                    }
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }

        info!("rotation monitor stopped");
    }

    /// Run the loop on a dedicated thread with its own single-threaded runtime.
    ///
    /// The logger is called from plain threads as often as from async tasks,
    /// so the monitor never borrows the caller's runtime.
    pub fn spawn(self) -> std::io::Result<MonitorHandle> {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let console = Arc::clone(&self.console);

        let thread = std::thread::Builder::new()
            .name("rotolog-monitor".to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(self.run(shutdown_rx)),
                    Err(e) => fallback::report(
                        console.as_ref(),
                        "rotation monitor could not start",
                        &LogError::io("rotolog-monitor", e),
                    ),
                }
            })?;

        Ok(MonitorHandle {
            shutdown_tx,
            thread: Some(thread),
        })
    }
}

/// Owner of a running monitor thread. Dropping it stops the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown_tx: broadcast::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal shutdown and wait for the loop to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                debug!("rotation monitor thread panicked");
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
