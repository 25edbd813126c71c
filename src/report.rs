// Human-readable rendering of one statistics poll

use crate::models::{BackingDeviceStats, CapacityStats};

const MIB: f64 = 1024.0 * 1024.0;

/// Bytes to mebibytes.
pub fn mb(bytes: u64) -> f64 {
    bytes as f64 / MIB
}

/// One-decimal MB figure, e.g. `1.0` for 1_048_576 bytes.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.1}", mb(bytes))
}

/// Renders a full report block, terminated by a blank line. Pure: same input, same text.
pub fn render(stats: &CapacityStats, bd: &BackingDeviceStats) -> String {
    format!(
        "Orig: {orig} MB\n\
         Compr: {compr} MB\n\
         Mem used: {used} MB\n\
         Mem used max: {used_max} MB\n\
         Mem limit: {limit} MB\n\
         Same pages: {same}\n\
         Compacted pages: {compacted}\n\
         Huge pages: {huge}\n\
         Stored on  backing device: {stored} MB\n\
         Written to backing device: {written} MB\n\
         Read from  backing device: {read} MB\n\
         \n",
        orig = format_mb(stats.orig_size),
        compr = format_mb(stats.compressed_size),
        used = format_mb(stats.mem_used_total),
        used_max = format_mb(stats.mem_used_max),
        limit = format_mb(stats.mem_limit),
        same = stats.same_filled_pages,
        compacted = stats.pages_compacted,
        huge = stats.huge_pages,
        stored = format_mb(bd.stored_bytes()),
        written = format_mb(bd.written_bytes()),
        read = format_mb(bd.read_bytes()),
    )
}
