//! compression/compress.rs
//! Append-to-buffer compression.
//!
//! Two passes at most:
//! - fast path: compress straight into whatever spare capacity `dst` already
//!   has; "destination too small" is the only acceptable failure there.
//! - slow path: grow `dst` by the engine's compress bound and compress again.
//!   The bound is engine-provided, so any failure here is a contract bug.
//!
//! Frames declare their content size and end with a content checksum.
use crate::compression::buffer::{guarded, has_spare, reclaim_slack, SpareCapacity};
use crate::compression::dict::CompressionDictionary;
use crate::compression::engine::{self, clamp_level, compress_bound, invariant_violation};
use crate::compression::pool::{compression_pool, CompressionContext};
use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::telemetry::{record, Event};
use crate::types::EngineError;

/// Append the compressed form of `src` to `dst` at the default level.
///
/// Empty `src` leaves `dst` untouched: no frame is emitted.
pub fn compress(dst: &mut Vec<u8>, src: &[u8]) {
    compress_level(dst, src, DEFAULT_COMPRESSION_LEVEL);
}

/// Append the compressed form of `src` to `dst` at `level`.
///
/// Out-of-range levels are clamped to the nearest supported level.
pub fn compress_level(dst: &mut Vec<u8>, src: &[u8], level: i32) {
    compress_with(dst, src, Params::Level(clamp_level(level)));
}

/// Append the compressed form of `src` to `dst` using `dict`.
///
/// The level is the one `dict` was prepared with.
pub fn compress_dict(dst: &mut Vec<u8>, src: &[u8], dict: &CompressionDictionary) {
    compress_with(dst, src, Params::Dict(dict));
}

/// What a compression context gets bound to for one call.
#[derive(Clone, Copy)]
pub(crate) enum Params<'d> {
    Level(i32),
    Dict(&'d CompressionDictionary),
}

impl Params<'_> {
    pub(crate) fn has_dict(&self) -> bool {
        matches!(self, Params::Dict(_))
    }

    fn op_name(&self) -> &'static str {
        match self {
            Params::Level(_) => "ZSTD_compress2",
            Params::Dict(_) => "ZSTD_compress2 (CDict)",
        }
    }

    /// Bind `cctx` to these parameters. Pair with `engine::unbind_cctx`.
    pub(crate) fn bind(&self, cctx: &mut CompressionContext) -> Result<(), EngineError> {
        match self {
            Params::Level(level) => engine::bind_level(&mut cctx.0, *level),
            Params::Dict(dict) => engine::bind_cdict(&mut cctx.0, dict.cdict()),
        }
    }
}

fn compress_with(dst: &mut Vec<u8>, src: &[u8], params: Params<'_>) {
    if src.is_empty() {
        return;
    }
    let mut cctx = compression_pool(params.has_dict()).acquire();
    if let Err(e) = params.bind(&mut cctx) {
        invariant_violation("ZSTD_CCtx_setParameter", e);
    }
    compress_into(&mut cctx, dst, src, params);
    engine::unbind_cctx(&mut cctx.0);
}

fn compress_into(cctx: &mut CompressionContext, dst: &mut Vec<u8>, src: &[u8], params: Params<'_>) {
    if has_spare(dst) {
        let mut window = SpareCapacity::all(dst);
        match engine::compress(&mut cctx.0, &mut window, src) {
            Ok(_) => {
                record(Event::CompressFastPath);
                return;
            }
            Err(e) if e.is_dst_too_small() => {}
            Err(e) => invariant_violation(params.op_name(), e),
        }
    }

    record(Event::CompressSlowPath);
    let room = guarded(compress_bound(src.len()));
    log::debug!("compress slow path: {} byte src, growing dst by {}", src.len(), room);

    let mut window = SpareCapacity::reserve(dst, room);
    if let Err(e) = engine::compress(&mut cctx.0, &mut window, src) {
        invariant_violation(params.op_name(), e);
    }
    if reclaim_slack(dst) {
        record(Event::SlackReclaim);
    }
}
