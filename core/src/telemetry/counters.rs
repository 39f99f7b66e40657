//! telemetry/counters.rs
//! Atomic counters bumped by the compression paths and the context pools.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Protocol events worth counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    CompressFastPath,
    CompressSlowPath,
    DecompressFastPath,
    DecompressSlowPath,
    StreamingFallback,
    SlackReclaim,
    DecompressFailure,
}

/// The five independent context pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Compress,
    CompressDict,
    Decompress,
    DecompressDict,
    StreamDecoder,
}

impl PoolKind {
    pub const ALL: [PoolKind; 5] = [
        PoolKind::Compress,
        PoolKind::CompressDict,
        PoolKind::Decompress,
        PoolKind::DecompressDict,
        PoolKind::StreamDecoder,
    ];
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolKind::Compress       => "cctx",
            PoolKind::CompressDict   => "cctx-dict",
            PoolKind::Decompress     => "dctx",
            PoolKind::DecompressDict => "dctx-dict",
            PoolKind::StreamDecoder  => "stream-decoder",
        };
        f.write_str(name)
    }
}

/// Buffer-protocol event counts.
pub(crate) struct CodecCounters {
    compress_fast: AtomicU64,
    compress_slow: AtomicU64,
    decompress_fast: AtomicU64,
    decompress_slow: AtomicU64,
    streaming_fallback: AtomicU64,
    slack_reclaim: AtomicU64,
    decompress_failure: AtomicU64,
}

impl CodecCounters {
    const fn new() -> Self {
        Self {
            compress_fast: AtomicU64::new(0),
            compress_slow: AtomicU64::new(0),
            decompress_fast: AtomicU64::new(0),
            decompress_slow: AtomicU64::new(0),
            streaming_fallback: AtomicU64::new(0),
            slack_reclaim: AtomicU64::new(0),
            decompress_failure: AtomicU64::new(0),
        }
    }

    fn slot(&self, event: Event) -> &AtomicU64 {
        match event {
            Event::CompressFastPath   => &self.compress_fast,
            Event::CompressSlowPath   => &self.compress_slow,
            Event::DecompressFastPath => &self.decompress_fast,
            Event::DecompressSlowPath => &self.decompress_slow,
            Event::StreamingFallback  => &self.streaming_fallback,
            Event::SlackReclaim       => &self.slack_reclaim,
            Event::DecompressFailure  => &self.decompress_failure,
        }
    }

    pub(crate) fn get(&self, event: Event) -> u64 {
        self.slot(event).load(Ordering::Relaxed)
    }
}

pub(crate) static CODEC: CodecCounters = CodecCounters::new();

/// Count one occurrence of `event`.
#[inline]
pub(crate) fn record(event: Event) {
    CODEC.slot(event).fetch_add(1, Ordering::Relaxed);
}

/// Per-pool lifecycle counts.
#[derive(Debug)]
pub(crate) struct PoolCounters {
    created: AtomicU64,
    reused: AtomicU64,
    purged: AtomicU64,
}

impl PoolCounters {
    pub(crate) const fn new() -> Self {
        Self {
            created: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            purged: AtomicU64::new(0),
        }
    }

    pub(crate) fn on_create(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn on_reuse(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn on_purge(&self, n: usize) {
        self.purged.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub(crate) fn reused(&self) -> u64 {
        self.reused.load(Ordering::Relaxed)
    }

    pub(crate) fn purged(&self) -> u64 {
        self.purged.load(Ordering::Relaxed)
    }
}
