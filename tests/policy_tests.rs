// Policy thresholds and the ordered action sequence

mod common;

use common::{FakeDevice, GIB, WriteBehavior, quiet_stats};
use std::sync::Arc;
use std::time::Duration;
use zramwatch::error::ZramError;
use zramwatch::models::{CapacityStats, ControlFile};
use zramwatch::policy::{
    Action, PolicyEngine, evaluate, needs_compaction, needs_writeback,
};
use zramwatch::zram_repo::ZramDevice;

fn stats(compressed_size: u64, mem_used_total: u64, mem_limit: u64) -> CapacityStats {
    CapacityStats {
        compressed_size,
        mem_used_total,
        mem_limit,
        ..CapacityStats::default()
    }
}

#[test]
fn compaction_fires_above_one_gib_overhead() {
    assert!(needs_compaction(&stats(900_000_000, 2_000_000_000, u64::MAX)));
}

#[test]
fn compaction_does_not_fire_at_exactly_one_gib() {
    assert!(!needs_compaction(&stats(GIB, 2 * GIB, u64::MAX)));
    assert!(needs_compaction(&stats(GIB, 2 * GIB + 1, u64::MAX)));
}

#[test]
fn compaction_ignores_inverted_sizes() {
    // compressed_size > mem_used_total is unexpected; it must not wrap into a huge overhead.
    assert!(!needs_compaction(&stats(5 * GIB, GIB, u64::MAX)));
}

#[test]
fn writeback_threshold_is_strict() {
    assert!(needs_writeback(&stats(300, 0, 1199)));
    assert!(!needs_writeback(&stats(300, 0, 1200)));
}

#[test]
fn writeback_ratio_does_not_overflow() {
    assert!(needs_writeback(&stats(u64::MAX, 0, u64::MAX)));
}

#[test]
fn evaluate_orders_compaction_first() {
    let both = stats(900_000_000, 2_000_000_000, 1_000_000_000);
    assert_eq!(evaluate(&both), vec![Action::Compact, Action::Writeback]);
    assert!(evaluate(&quiet_stats()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn writeback_marks_idle_after_cooldown() {
    let fake = Arc::new(FakeDevice::new(stats(300, 300, 1199)));
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));

    let start = tokio::time::Instant::now();
    let actions = engine.apply(&fake.capacity, &mut Vec::<u8>::new()).await.unwrap();

    assert_eq!(actions, vec![Action::Writeback]);
    assert!(start.elapsed() >= Duration::from_secs(60));
    assert_eq!(
        fake.commands(),
        vec![
            (ControlFile::Writeback, "idle".to_string()),
            (ControlFile::Idle, "all".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn both_rules_fire_in_one_cycle() {
    let fake = Arc::new(FakeDevice::new(stats(
        900_000_000,
        2_000_000_000,
        1_000_000_000,
    )));
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));

    engine.apply(&fake.capacity, &mut Vec::<u8>::new()).await.unwrap();

    assert_eq!(
        fake.commands(),
        vec![
            (ControlFile::Compact, "1".to_string()),
            (ControlFile::Writeback, "idle".to_string()),
            (ControlFile::Idle, "all".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn quiet_stats_send_nothing() {
    let fake = Arc::new(FakeDevice::new(quiet_stats()));
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));

    let start = tokio::time::Instant::now();
    assert!(engine.apply(&fake.capacity, &mut Vec::<u8>::new()).await.unwrap().is_empty());
    assert!(fake.commands().is_empty());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn short_write_does_not_abort_the_sequence() {
    let fake = Arc::new(
        FakeDevice::new(stats(300, 300, 1199)).with_behavior(WriteBehavior::Short),
    );
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));

    engine.apply(&fake.capacity, &mut Vec::<u8>::new()).await.unwrap();
    assert_eq!(fake.commands().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn missing_control_file_aborts() {
    let fake = Arc::new(
        FakeDevice::new(stats(900_000_000, 2_000_000_000, u64::MAX))
            .with_behavior(WriteBehavior::MissingFile),
    );
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));

    let err = engine.apply(&fake.capacity, &mut Vec::<u8>::new()).await.unwrap_err();
    assert!(matches!(err, ZramError::OpenWrite { .. }));
}

#[tokio::test(start_paused = true)]
async fn each_write_is_confirmed_on_output() {
    let fake = Arc::new(FakeDevice::new(stats(
        900_000_000,
        2_000_000_000,
        1_000_000_000,
    )));
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));
    let mut out = Vec::new();

    engine.apply(&fake.capacity, &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Writing to /fake/compact content: [1]\n\
         Writing to /fake/writeback content: [idle]\n\
         Writing to /fake/idle content: [all]\n"
    );
}

#[tokio::test(start_paused = true)]
async fn failed_open_prints_no_confirmation() {
    let fake = Arc::new(
        FakeDevice::new(stats(900_000_000, 2_000_000_000, u64::MAX))
            .with_behavior(WriteBehavior::MissingFile),
    );
    let device: Arc<dyn ZramDevice> = fake.clone();
    let engine = PolicyEngine::new(device, Duration::from_secs(60));
    let mut out = Vec::<u8>::new();

    assert!(engine.apply(&fake.capacity, &mut out).await.is_err());
    assert!(out.is_empty());
}
