// zram device access: statistics reads and control writes under /sys/block/<dev>

pub mod parse;
pub mod sysfs;

use crate::error::{Result, ZramError};
use crate::models::{BackingDeviceStats, CapacityStats, ControlFile, StatFile, StatRecord};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

pub use sysfs::WriteOutcome;

/// Default device directory.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/block/zram0";

/// Everything the control loop needs from the device. Calls block; run them via [`blocking`].
pub trait ZramDevice: Send + Sync {
    fn read_capacity_stats(&self) -> Result<CapacityStats>;
    fn read_backing_stats(&self) -> Result<BackingDeviceStats>;
    fn control_path(&self, control: ControlFile) -> PathBuf;
    /// `Err` only when the control file cannot be opened; a short write is an `Ok` outcome.
    fn send_command(&self, control: ControlFile, payload: &str) -> Result<WriteOutcome>;
}

/// The real device, backed by sysfs attribute files.
#[derive(Debug, Clone)]
pub struct SysfsDevice {
    root: PathBuf,
}

impl Default for SysfsDevice {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl SysfsDevice {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn stat_path(&self, file: StatFile) -> PathBuf {
        self.root.join(file.file_name())
    }

    /// Reads one record of kind `R` from its statistics file.
    pub fn read_record<R: StatRecord>(&self) -> Result<R> {
        let path = self.stat_path(R::SOURCE);
        let buf = sysfs::read_once(&path)?;
        parse::parse_record::<R>(&buf).map_err(|source| ZramError::Parse { path, source })
    }
}

impl ZramDevice for SysfsDevice {
    #[instrument(skip(self), fields(repo = "zram", operation = "read_capacity_stats"))]
    fn read_capacity_stats(&self) -> Result<CapacityStats> {
        self.read_record()
    }

    #[instrument(skip(self), fields(repo = "zram", operation = "read_backing_stats"))]
    fn read_backing_stats(&self) -> Result<BackingDeviceStats> {
        self.read_record()
    }

    fn control_path(&self, control: ControlFile) -> PathBuf {
        self.root.join(control.file_name())
    }

    fn send_command(&self, control: ControlFile, payload: &str) -> Result<WriteOutcome> {
        let path = self.control_path(control);
        tracing::info!(path = %path.display(), payload, "writing control command");
        let outcome = match sysfs::write_once(&path, payload) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(path = %path.display(), payload, error = %e, "control file unavailable");
                return Err(e);
            }
        };
        if let WriteOutcome::ShortWrite {
            written,
            expected,
            error,
        } = &outcome
        {
            let error = error
                .as_ref()
                .map_or_else(|| "short write".to_string(), ToString::to_string);
            tracing::warn!(
                path = %path.display(),
                payload,
                written,
                expected,
                error = %error,
                "failed to write command"
            );
        }
        Ok(outcome)
    }
}

/// Runs a blocking device call on tokio's blocking pool.
pub async fn blocking<T, F>(device: &Arc<dyn ZramDevice>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn ZramDevice) -> Result<T> + Send + 'static,
{
    let device = Arc::clone(device);
    tokio::task::spawn_blocking(move || f(device.as_ref()))
        .await
        .map_err(|e| ZramError::Runtime {
            details: format!("device task join: {e}"),
        })?
}

/// Sends `payload` and, once the control file was opened, prints a confirmation line to `out`.
pub async fn send_confirmed<W: Write>(
    device: &Arc<dyn ZramDevice>,
    control: ControlFile,
    payload: &'static str,
    out: &mut W,
) -> Result<WriteOutcome> {
    let outcome = blocking(device, move |d| d.send_command(control, payload)).await?;
    let path = device.control_path(control);
    if let Err(e) = writeln!(out, "Writing to {} content: [{payload}]", path.display())
        .and_then(|()| out.flush())
    {
        tracing::warn!(error = %e, operation = "write_confirmation", "confirmation output failed");
    }
    Ok(outcome)
}
