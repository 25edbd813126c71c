// zram statistics records (mm_stat, bd_stat) bound positionally from extracted integers

/// Backing-device counters are reported in 4 KiB blocks.
pub const BACKING_BLOCK_SIZE: u64 = 4096;

/// Statistics file a record is read from, relative to the device's sysfs directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFile {
    MmStat,
    BdStat,
}

impl StatFile {
    pub fn file_name(self) -> &'static str {
        match self {
            StatFile::MmStat => "mm_stat",
            StatFile::BdStat => "bd_stat",
        }
    }
}

/// Write-only control attributes of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFile {
    Compact,
    Writeback,
    Idle,
}

impl ControlFile {
    pub fn file_name(self) -> &'static str {
        match self {
            ControlFile::Compact => "compact",
            ControlFile::Writeback => "writeback",
            ControlFile::Idle => "idle",
        }
    }
}

/// A fixed-shape record filled by position from a statistics file.
pub trait StatRecord: Sized {
    /// Number of leading integers consumed; extra trailing integers are ignored.
    const ARITY: usize;
    const SOURCE: StatFile;

    /// Binds `fields` in declaration order. `None` when fewer than `ARITY` values are given.
    fn from_fields(fields: &[u64]) -> Option<Self>;
}

/// `mm_stat`: capacity and allocator usage of the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityStats {
    /// Uncompressed size of stored data (bytes).
    pub orig_size: u64,
    /// Compressed size of stored data (bytes).
    pub compressed_size: u64,
    /// Memory allocated for the device, including allocator overhead (bytes).
    pub mem_used_total: u64,
    /// Maximum memory the device may use (bytes).
    pub mem_limit: u64,
    /// Peak memory usage (bytes).
    pub mem_used_max: u64,
    pub same_filled_pages: u64,
    pub pages_compacted: u64,
    /// Incompressible pages.
    pub huge_pages: u64,
}

impl StatRecord for CapacityStats {
    const ARITY: usize = 8;
    const SOURCE: StatFile = StatFile::MmStat;

    fn from_fields(fields: &[u64]) -> Option<Self> {
        let [
            orig_size,
            compressed_size,
            mem_used_total,
            mem_limit,
            mem_used_max,
            same_filled_pages,
            pages_compacted,
            huge_pages,
            ..,
        ] = *fields
        else {
            return None;
        };
        Some(Self {
            orig_size,
            compressed_size,
            mem_used_total,
            mem_limit,
            mem_used_max,
            same_filled_pages,
            pages_compacted,
            huge_pages,
        })
    }
}

/// `bd_stat`: backing-device I/O, all in 4 KiB blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackingDeviceStats {
    pub block_count: u64,
    pub reads: u64,
    pub writes: u64,
}

impl BackingDeviceStats {
    pub fn stored_bytes(&self) -> u64 {
        self.block_count.saturating_mul(BACKING_BLOCK_SIZE)
    }

    pub fn read_bytes(&self) -> u64 {
        self.reads.saturating_mul(BACKING_BLOCK_SIZE)
    }

    pub fn written_bytes(&self) -> u64 {
        self.writes.saturating_mul(BACKING_BLOCK_SIZE)
    }
}

impl StatRecord for BackingDeviceStats {
    const ARITY: usize = 3;
    const SOURCE: StatFile = StatFile::BdStat;

    fn from_fields(fields: &[u64]) -> Option<Self> {
        let [block_count, reads, writes, ..] = *fields else {
            return None;
        };
        Some(Self {
            block_count,
            reads,
            writes,
        })
    }
}
