//! telemetry/snapshot.rs
//!
//! Immutable copies of the process-wide counters.
//!
//! Design notes:
//! - Counters keep moving while a snapshot is taken; each field is a single
//!   relaxed load, so fields are individually exact but not mutually atomic.
//! - Everything derives `Serialize`/`Deserialize` for export.
use serde::{Deserialize, Serialize};

use crate::compression::pool;
use crate::telemetry::counters::{Event, PoolKind, CODEC};

/// Lifecycle numbers for one context pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub kind: PoolKind,
    pub created: u64,
    pub reused: u64,
    pub purged: u64,
    pub idle: u64,
}

impl PoolSnapshot {
    /// Total acquisitions served by this pool.
    pub fn acquired(&self) -> u64 {
        self.created + self.reused
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub compress_fast_path: u64,
    pub compress_slow_path: u64,
    pub decompress_fast_path: u64,
    pub decompress_slow_path: u64,
    pub streaming_fallbacks: u64,
    pub slack_reclaims: u64,
    pub decompress_failures: u64,
    pub pools: Vec<PoolSnapshot>,
}

impl TelemetrySnapshot {
    pub fn pool(&self, kind: PoolKind) -> Option<&PoolSnapshot> {
        self.pools.iter().find(|p| p.kind == kind)
    }

    /// Count for a single event.
    pub fn event(&self, event: Event) -> u64 {
        match event {
            Event::CompressFastPath   => self.compress_fast_path,
            Event::CompressSlowPath   => self.compress_slow_path,
            Event::DecompressFastPath => self.decompress_fast_path,
            Event::DecompressSlowPath => self.decompress_slow_path,
            Event::StreamingFallback  => self.streaming_fallbacks,
            Event::SlackReclaim       => self.slack_reclaims,
            Event::DecompressFailure  => self.decompress_failures,
        }
    }
}

/// Capture the current counters.
pub fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        compress_fast_path: CODEC.get(Event::CompressFastPath),
        compress_slow_path: CODEC.get(Event::CompressSlowPath),
        decompress_fast_path: CODEC.get(Event::DecompressFastPath),
        decompress_slow_path: CODEC.get(Event::DecompressSlowPath),
        streaming_fallbacks: CODEC.get(Event::StreamingFallback),
        slack_reclaims: CODEC.get(Event::SlackReclaim),
        decompress_failures: CODEC.get(Event::DecompressFailure),
        pools: PoolKind::ALL.iter().map(|&kind| pool::pool_snapshot(kind)).collect(),
    }
}
