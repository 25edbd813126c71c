// Process wiring shared by zraminfo and zramtracker

use crate::config::AppConfig;
use crate::error::ZramError;
use crate::memlock;
use crate::models::ControlFile;
use crate::policy::IDLE_PAYLOAD;
use crate::worker::{self, Mode, WorkerConfig, WorkerDeps};
use crate::zram_repo::{self, SysfsDevice, ZramDevice};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loop timing for `mode`.
pub fn worker_config(mode: Mode, config: &AppConfig) -> WorkerConfig {
    let interval = match mode {
        Mode::Report => config.monitoring.report_interval(),
        Mode::Control => config.monitoring.control_interval(),
    };
    WorkerConfig {
        mode,
        interval,
        writeback_cooldown: config.monitoring.writeback_cooldown(),
    }
}

/// Controller startup: pin memory, then mark every page idle once so the first
/// writeback has candidates (kernels before 5.16 cannot select pages by age).
pub async fn prepare_controller<W: Write>(
    device: &Arc<dyn ZramDevice>,
    config: &AppConfig,
    out: &mut W,
) -> Result<(), ZramError> {
    if config.memory.lock_pages {
        memlock::lock_memory_pages();
    }
    zram_repo::send_confirmed(device, ControlFile::Idle, IDLE_PAYLOAD, out).await?;
    Ok(())
}

/// Runs `mode` against the configured device until a fatal error, which is logged once.
pub async fn run(mode: Mode) -> ExitCode {
    finish(try_run(mode).await)
}

/// Maps the outcome of a run to the process exit status, logging a failure with its timestamp.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ZramError>() {
                Some(zram) => worker::log_fatal(zram),
                None => {
                    let error = format!("{e:#}");
                    tracing::error!(error = %error, "startup failed");
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn try_run(mode: Mode) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    tracing::info!(
        version = VERSION,
        mode = mode.as_str(),
        sysfs_root = %config.device.sysfs_root,
        "Started"
    );

    let device: Arc<dyn ZramDevice> = Arc::new(SysfsDevice::new(&config.device.sysfs_root));
    // No signal handling: the sender lives as long as the process.
    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let mut out = std::io::stdout();

    if mode == Mode::Control {
        prepare_controller(&device, &config, &mut out).await?;
    }
    let deps = WorkerDeps {
        device: Arc::clone(&device),
        out,
        shutdown_rx,
    };
    worker::run(deps, worker_config(mode, &config)).await?;
    Ok(())
}
