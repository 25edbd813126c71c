// Control loop: poll -> (report | decide + act) -> sleep, until a fatal error or shutdown.
// One decision stream; each cycle runs to completion before the next poll.

use crate::error::{Result, ZramError};
use crate::policy::PolicyEngine;
use crate::report;
use crate::zram_repo::{self, ZramDevice};
use std::io::Write;
use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print capacity and backing-device statistics.
    Report,
    /// Apply compaction/writeback policy.
    Control,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Report => "report",
            Mode::Control => "control",
        }
    }
}

/// Device, report sink, and shutdown for the worker.
pub struct WorkerDeps<W> {
    pub device: Arc<dyn ZramDevice>,
    /// Standard output: report blocks in [`Mode::Report`], write confirmations in [`Mode::Control`].
    pub out: W,
    /// Checked while sleeping between cycles. Dropping the sender also stops the loop.
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker mode and timing.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    pub mode: Mode,
    /// Sleep between cycles.
    pub interval: Duration,
    /// Pause between requesting writeback and marking pages idle.
    pub writeback_cooldown: Duration,
}

/// Runs the loop. Returns `Ok(())` on shutdown and the first fatal error otherwise.
pub async fn run<W: Write>(deps: WorkerDeps<W>, config: WorkerConfig) -> Result<()> {
    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        mode = config.mode.as_str(),
        interval_ms = config.interval.as_millis() as u64
    );
    run_cycles(deps, config).instrument(worker_span).await
}

async fn run_cycles<W: Write>(deps: WorkerDeps<W>, config: WorkerConfig) -> Result<()> {
    let WorkerDeps {
        device,
        mut out,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        mode,
        interval,
        writeback_cooldown,
    } = config;
    let engine = PolicyEngine::new(Arc::clone(&device), writeback_cooldown);

    loop {
        let stats = zram_repo::blocking(&device, |d| d.read_capacity_stats()).await?;
        match mode {
            Mode::Report => {
                let bd = zram_repo::blocking(&device, |d| d.read_backing_stats()).await?;
                let block = report::render(&stats, &bd);
                if let Err(e) = out
                    .write_all(block.as_bytes())
                    .and_then(|()| out.flush())
                {
                    tracing::warn!(error = %e, operation = "write_report", "report output failed");
                }
            }
            Mode::Control => {
                let actions = engine.apply(&stats, &mut out).await?;
                tracing::debug!(actions = ?actions, "policy cycle complete");
            }
        }

        tokio::select! {
            _ = sleep(interval) => {}
            _ = &mut shutdown_rx => {
                tracing::debug!("Worker shutting down");
                break;
            }
        }
    }
    Ok(())
}

/// Spawns [`run`] on the runtime.
pub fn spawn<W>(deps: WorkerDeps<W>, config: WorkerConfig) -> tokio::task::JoinHandle<Result<()>>
where
    W: Write + Send + 'static,
{
    tokio::spawn(run(deps, config))
}

/// Logs a fatal loop error with its path before the caller terminates.
pub fn log_fatal(error: &ZramError) {
    match error.path() {
        Some(path) => tracing::error!(path = %path.display(), error = %error, "fatal device error"),
        None => tracing::error!(error = %error, "fatal error"),
    }
}
