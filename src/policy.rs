// Pressure policy: compaction when allocator overhead grows, idle writeback when compressed data nears the limit

use crate::error::Result;
use crate::models::{CapacityStats, ControlFile};
use crate::zram_repo::{self, WriteOutcome, ZramDevice};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Allocator overhead (`mem_used_total - compressed_size`) above which compaction is requested.
pub const COMPACTION_OVERHEAD_LIMIT: u64 = 1 << 30;

/// Writeback is requested once `compressed_size * WRITEBACK_RATIO > mem_limit`.
pub const WRITEBACK_RATIO: u64 = 4;

pub const COMPACT_PAYLOAD: &str = "1";
pub const WRITEBACK_PAYLOAD: &str = "idle";
pub const IDLE_PAYLOAD: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Compact,
    Writeback,
}

pub fn needs_compaction(stats: &CapacityStats) -> bool {
    stats.mem_used_total.saturating_sub(stats.compressed_size) > COMPACTION_OVERHEAD_LIMIT
}

pub fn needs_writeback(stats: &CapacityStats) -> bool {
    u128::from(stats.compressed_size) * u128::from(WRITEBACK_RATIO) > u128::from(stats.mem_limit)
}

/// Actions due for `stats`, in execution order (compaction is always checked first).
pub fn evaluate(stats: &CapacityStats) -> Vec<Action> {
    let mut actions = Vec::with_capacity(2);
    if needs_compaction(stats) {
        actions.push(Action::Compact);
    }
    if needs_writeback(stats) {
        actions.push(Action::Writeback);
    }
    actions
}

/// Executes policy decisions against a device. Runs to completion, including the writeback cool-down.
pub struct PolicyEngine {
    device: Arc<dyn ZramDevice>,
    writeback_cooldown: Duration,
}

impl PolicyEngine {
    pub fn new(device: Arc<dyn ZramDevice>, writeback_cooldown: Duration) -> Self {
        Self {
            device,
            writeback_cooldown,
        }
    }

    /// Evaluates `stats` and performs the resulting actions, confirming each write on `out`.
    /// Returns what was performed.
    pub async fn apply<W: Write>(&self, stats: &CapacityStats, out: &mut W) -> Result<Vec<Action>> {
        let actions = evaluate(stats);
        for action in &actions {
            match action {
                Action::Compact => {
                    tracing::info!(
                        mem_used_total = stats.mem_used_total,
                        compressed_size = stats.compressed_size,
                        "Request compaction"
                    );
                    self.send(ControlFile::Compact, COMPACT_PAYLOAD, out).await?;
                }
                Action::Writeback => {
                    tracing::info!(
                        compressed_size = stats.compressed_size,
                        mem_limit = stats.mem_limit,
                        "Request writeback of idle pages"
                    );
                    self.send(ControlFile::Writeback, WRITEBACK_PAYLOAD, out).await?;
                    // Let the writeback I/O drain before marking more pages idle.
                    tokio::time::sleep(self.writeback_cooldown).await;
                    self.send(ControlFile::Idle, IDLE_PAYLOAD, out).await?;
                }
            }
        }
        Ok(actions)
    }

    async fn send<W: Write>(
        &self,
        control: ControlFile,
        payload: &'static str,
        out: &mut W,
    ) -> Result<WriteOutcome> {
        zram_repo::send_confirmed(&self.device, control, payload, out).await
    }
}
