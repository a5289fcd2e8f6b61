//! Fixed-delay scheduling of the collect cycle.
//!
//! The loop sleeps one full interval, runs a cycle to completion, and
//! sleeps again. The delay is measured from the end of one cycle to
//! the start of the next, so a slow pass never causes overlapping
//! cycles. A failed cycle is logged and the loop keeps going.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::cycle::Collector;

pub struct Scheduler {
    collector: Arc<Collector>,
    interval: Duration,
    running: Mutex<Option<Running>>,
}

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    pub fn new(collector: Arc<Collector>, interval: Duration) -> Self {
        Self {
            collector,
            interval,
            running: Mutex::new(None),
        }
    }

    /// Start the sweep loop. The first cycle runs one full interval
    /// after start. Calling `start` on a running scheduler is a no-op.
    pub fn start(&self) {
        let mut running = self.running.lock().unwrap();
        if running.is_some() {
            return;
        }

        let (shutdown, mut signal) = watch::channel(false);
        let collector = Arc::clone(&self.collector);
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = signal.changed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                match collector.run().await {
                    Ok(report) => info!(%report, "Collect cycle complete"),
                    Err(e) => error!(error = %e, "Collect cycle aborted"),
                }
            }
            info!("Sweep loop stopped");
        });

        *running = Some(Running { shutdown, handle });
        info!(interval_secs = interval.as_secs(), "Sweep scheduler started");
    }

    /// Stop the loop. Waits for an in-flight cycle to finish; a cycle
    /// is never cancelled mid-wallet. Stopping an idle scheduler is a
    /// no-op.
    pub async fn stop(&self) {
        let running = self.running.lock().unwrap().take();
        if let Some(Running { shutdown, handle }) = running {
            let _ = shutdown.send(true);
            let _ = handle.await;
            info!("Sweep scheduler stopped");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
