//! compression/pool.rs
//! Reusable engine contexts.
//!
//! Design notes:
//! - One lock-free `SegQueue` per pool kind; acquire pops an idle context or
//!   builds a fresh one, the guard pushes it back on drop.
//! - Pools own their idle contexts outright. A context that leaves the pool
//!   and is dropped anywhere else frees its native handle in the engine
//!   type's destructor, so early returns and panics never leak it.
//! - A guard dropped while its thread panics frees the context instead of
//!   returning it.
//! - No upper bound on live contexts: contention simply creates more.
//!   `release_idle_contexts` is the only way a pool shrinks.
use std::ops::{Deref, DerefMut};
use std::thread;

use crossbeam::queue::SegQueue;
use zstd_safe::{CCtx, DCtx};

use crate::compression::engine::{create_cctx, create_dctx};
use crate::compression::fallback::StreamDecompressor;
use crate::telemetry::{PoolCounters, PoolKind, PoolSnapshot};

/// Something a `ContextPool` can build on a miss.
pub(crate) trait PooledContext: Send + Sized {
    fn create() -> Self;
}

/// Owns one native compression context.
pub(crate) struct CompressionContext(pub(crate) CCtx<'static>);

/// Owns one native decompression context.
pub(crate) struct DecompressionContext(pub(crate) DCtx<'static>);

impl PooledContext for CompressionContext {
    fn create() -> Self {
        Self(create_cctx())
    }
}

impl PooledContext for DecompressionContext {
    fn create() -> Self {
        Self(create_dctx())
    }
}

pub(crate) struct ContextPool<T> {
    kind: PoolKind,
    idle: SegQueue<T>,
    counters: PoolCounters,
}

impl<T> ContextPool<T> {
    pub(crate) const fn new(kind: PoolKind) -> Self {
        Self {
            kind,
            idle: SegQueue::new(),
            counters: PoolCounters::new(),
        }
    }
}

impl<T: PooledContext> ContextPool<T> {
    /// Take an idle context, or build one if none is idle.
    pub(crate) fn acquire(&self) -> Pooled<'_, T> {
        let ctx = match self.idle.pop() {
            Some(ctx) => {
                self.counters.on_reuse();
                ctx
            }
            None => {
                log::trace!("{} pool miss, creating context", self.kind);
                self.counters.on_create();
                T::create()
            }
        };
        Pooled { ctx: Some(ctx), pool: self }
    }

    fn release(&self, ctx: T) {
        self.idle.push(ctx);
    }

    pub(crate) fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Drop every idle context. Returns how many were freed.
    pub(crate) fn purge(&self) -> usize {
        let mut freed = 0;
        while let Some(ctx) = self.idle.pop() {
            drop(ctx);
            freed += 1;
        }
        self.counters.on_purge(freed);
        freed
    }

    pub(crate) fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            kind: self.kind,
            created: self.counters.created(),
            reused: self.counters.reused(),
            purged: self.counters.purged(),
            idle: self.idle() as u64,
        }
    }
}

/// Exclusive loan of a pooled context; returned to its pool on drop.
pub(crate) struct Pooled<'p, T: PooledContext> {
    ctx: Option<T>,
    pool: &'p ContextPool<T>,
}

impl<T: PooledContext> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.ctx {
            Some(ctx) => ctx,
            None => unreachable!("pooled context already returned"),
        }
    }
}

impl<T: PooledContext> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.ctx {
            Some(ctx) => ctx,
            None => unreachable!("pooled context already returned"),
        }
    }
}

impl<T: PooledContext> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        // A context abandoned mid-call by a panic may still hold session
        // state or a dictionary reference; free it instead of reusing it.
        if thread::panicking() {
            log::warn!("{} context dropped during panic, not returned to pool", self.pool.kind);
            drop(ctx);
            self.pool.counters.on_purge(1);
            return;
        }
        self.pool.release(ctx);
    }
}

// Dictionary-bound calls get their own pools so plain and dictionary
// contexts never mix.
static CCTX: ContextPool<CompressionContext> = ContextPool::new(PoolKind::Compress);
static CCTX_DICT: ContextPool<CompressionContext> = ContextPool::new(PoolKind::CompressDict);
static DCTX: ContextPool<DecompressionContext> = ContextPool::new(PoolKind::Decompress);
static DCTX_DICT: ContextPool<DecompressionContext> = ContextPool::new(PoolKind::DecompressDict);
static STREAM_DECODERS: ContextPool<StreamDecompressor> = ContextPool::new(PoolKind::StreamDecoder);

pub(crate) fn compression_pool(with_dict: bool) -> &'static ContextPool<CompressionContext> {
    if with_dict { &CCTX_DICT } else { &CCTX }
}

pub(crate) fn decompression_pool(with_dict: bool) -> &'static ContextPool<DecompressionContext> {
    if with_dict { &DCTX_DICT } else { &DCTX }
}

pub(crate) fn stream_decoder_pool() -> &'static ContextPool<StreamDecompressor> {
    &STREAM_DECODERS
}

pub(crate) fn pool_snapshot(kind: PoolKind) -> PoolSnapshot {
    match kind {
        PoolKind::Compress       => CCTX.snapshot(),
        PoolKind::CompressDict   => CCTX_DICT.snapshot(),
        PoolKind::Decompress     => DCTX.snapshot(),
        PoolKind::DecompressDict => DCTX_DICT.snapshot(),
        PoolKind::StreamDecoder  => STREAM_DECODERS.snapshot(),
    }
}

/// Free every idle pooled context in all pools. Contexts currently on loan
/// are unaffected and return to their (now empty) pools as usual.
///
/// Returns the number of native contexts released.
pub fn release_idle_contexts() -> usize {
    let freed = CCTX.purge()
        + CCTX_DICT.purge()
        + DCTX.purge()
        + DCTX_DICT.purge()
        + STREAM_DECODERS.purge();
    log::debug!("released {} idle contexts", freed);
    freed
}
