// Shared test helpers: fake device, capturing writer, fake sysfs directories

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zramwatch::error::{Result, ZramError};
use zramwatch::models::{BackingDeviceStats, CapacityStats, ControlFile};
use zramwatch::zram_repo::{WriteOutcome, ZramDevice};

pub const GIB: u64 = 1 << 30;

/// Stats that trip neither rule.
pub fn quiet_stats() -> CapacityStats {
    CapacityStats {
        orig_size: 400 * 1024 * 1024,
        compressed_size: 100 * 1024 * 1024,
        mem_used_total: 110 * 1024 * 1024,
        mem_limit: 4 * GIB,
        mem_used_max: 120 * 1024 * 1024,
        same_filled_pages: 10,
        pages_compacted: 0,
        huge_pages: 2,
    }
}

/// How the fake answers control writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBehavior {
    Complete,
    Short,
    MissingFile,
}

pub struct FakeDevice {
    pub capacity: CapacityStats,
    pub backing: BackingDeviceStats,
    pub behavior: WriteBehavior,
    pub reads: AtomicUsize,
    pub commands: Mutex<Vec<(ControlFile, String)>>,
}

impl FakeDevice {
    pub fn new(capacity: CapacityStats) -> Self {
        Self {
            capacity,
            backing: BackingDeviceStats::default(),
            behavior: WriteBehavior::Complete,
            reads: AtomicUsize::new(0),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn with_behavior(mut self, behavior: WriteBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_backing(mut self, backing: BackingDeviceStats) -> Self {
        self.backing = backing;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<(ControlFile, String)> {
        self.commands.lock().unwrap().clone()
    }
}

impl ZramDevice for FakeDevice {
    fn read_capacity_stats(&self) -> Result<CapacityStats> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.capacity)
    }

    fn read_backing_stats(&self) -> Result<BackingDeviceStats> {
        Ok(self.backing)
    }

    fn control_path(&self, control: ControlFile) -> PathBuf {
        Path::new("/fake").join(control.file_name())
    }

    fn send_command(&self, control: ControlFile, payload: &str) -> Result<WriteOutcome> {
        if self.behavior == WriteBehavior::MissingFile {
            return Err(ZramError::OpenWrite {
                path: self.control_path(control),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            });
        }
        self.commands
            .lock()
            .unwrap()
            .push((control, payload.to_string()));
        Ok(match self.behavior {
            WriteBehavior::Short => WriteOutcome::ShortWrite {
                written: 0,
                expected: payload.len(),
                error: None,
            },
            _ => WriteOutcome::Written,
        })
    }
}

/// Cloneable in-memory writer for report output.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Formats `stats` the way the kernel lays out mm_stat (space-padded columns, trailing newline).
pub fn mm_stat_line(stats: &CapacityStats) -> String {
    format!(
        "{:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        stats.orig_size,
        stats.compressed_size,
        stats.mem_used_total,
        stats.mem_limit,
        stats.mem_used_max,
        stats.same_filled_pages,
        stats.pages_compacted,
        stats.huge_pages
    )
}

/// Creates a fake /sys/block/zramN directory with statistics and, optionally, control files.
pub fn fake_sysfs(dir: &Path, mm_stat: &str, bd_stat: &str, with_controls: bool) {
    std::fs::write(dir.join("mm_stat"), mm_stat).unwrap();
    std::fs::write(dir.join("bd_stat"), bd_stat).unwrap();
    if with_controls {
        for name in ["compact", "writeback", "idle"] {
            std::fs::write(dir.join(name), "").unwrap();
        }
    }
}
