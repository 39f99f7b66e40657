//! compression/engine.rs
//! Thin adapter over the zstd engine (`zstd-safe`).
//!
//! Design notes:
//! - Every engine call that can fail returns `Result<usize, EngineError>`;
//!   classification of the raw code lives in `types::EngineError`.
//! - Destinations are `SpareCapacity` windows so the engine only ever sees
//!   the region past the caller's logical length.
//! - Failures on paths with an engine-provided bound are contract violations
//!   and go through `invariant_violation`.
//! - Compression contexts are bound (level or referenced `CDict`, checksum on)
//!   before use and unbound after, so an idle pooled context never points at
//!   a dictionary.
use std::fmt::Display;

use zstd_safe::{CCtx, CDict, CParameter, DCtx, DDict, ResetDirective};

use crate::compression::buffer::SpareCapacity;
use crate::types::EngineError;

/// Declared decompressed size of the first frame in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameContentSize {
    Known(u64),
    Unknown,
    Error,
}

/// Upper bound on compressed output for `src_len` input bytes.
#[inline]
pub fn compress_bound(src_len: usize) -> usize {
    zstd_safe::compress_bound(src_len)
}

/// Read the content size declared in the frame header of `src`.
pub fn frame_content_size(src: &[u8]) -> FrameContentSize {
    match zstd_safe::get_frame_content_size(src) {
        Ok(Some(size)) => FrameContentSize::Known(size),
        Ok(None) => FrameContentSize::Unknown,
        Err(_) => FrameContentSize::Error,
    }
}

/// Clamp a requested level into the range the engine supports.
#[inline]
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(zstd_safe::min_c_level(), zstd_safe::max_c_level())
}

/// Abort on a broken engine contract. Never returns.
#[cold]
pub(crate) fn invariant_violation(op: &str, detail: impl Display) -> ! {
    log::error!("BUG: unexpected engine failure in {}: {}", op, detail);
    panic!("BUG: unexpected engine failure in {}: {}", op, detail);
}

pub(crate) fn create_cctx() -> CCtx<'static> {
    match CCtx::try_create() {
        Some(cctx) => cctx,
        None => invariant_violation("ZSTD_createCCtx", "null context"),
    }
}

pub(crate) fn create_dctx() -> DCtx<'static> {
    match DCtx::try_create() {
        Some(dctx) => dctx,
        None => invariant_violation("ZSTD_createDCtx", "null context"),
    }
}

fn reset_cctx(cctx: &mut CCtx<'_>) {
    if let Err(code) = cctx.reset(ResetDirective::SessionAndParameters) {
        invariant_violation("ZSTD_CCtx_reset", EngineError::from_raw(code));
    }
}

fn reset_dctx(dctx: &mut DCtx<'_>) {
    if let Err(code) = dctx.reset(ResetDirective::SessionAndParameters) {
        invariant_violation("ZSTD_DCtx_reset", EngineError::from_raw(code));
    }
}

/// Start `cctx` afresh at `level`. Every frame carries a content checksum.
pub(crate) fn bind_level(cctx: &mut CCtx<'static>, level: i32) -> Result<(), EngineError> {
    reset_cctx(cctx);
    cctx.set_parameter(CParameter::ChecksumFlag(true))
        .map_err(EngineError::from_raw)?;
    cctx.set_parameter(CParameter::CompressionLevel(level))
        .map_err(EngineError::from_raw)?;
    Ok(())
}

/// Start `cctx` afresh with a referenced prepared dictionary; the level is
/// the one `cdict` was prepared with.
///
/// The context keeps a pointer to `cdict` until `unbind_cctx`.
pub(crate) fn bind_cdict(cctx: &mut CCtx<'static>, cdict: &CDict<'static>) -> Result<(), EngineError> {
    reset_cctx(cctx);
    cctx.set_parameter(CParameter::ChecksumFlag(true))
        .map_err(EngineError::from_raw)?;
    cctx.ref_cdict(cdict).map_err(EngineError::from_raw)?;
    Ok(())
}

/// Drop every parameter and dictionary reference from `cctx`.
pub(crate) fn unbind_cctx(cctx: &mut CCtx<'static>) {
    reset_cctx(cctx);
}

/// Start `dctx` afresh, referencing `ddict` when given.
///
/// The context keeps a pointer to `ddict` until `unbind_dctx`.
pub(crate) fn bind_ddict(
    dctx: &mut DCtx<'static>,
    ddict: Option<&DDict<'static>>,
) -> Result<(), EngineError> {
    reset_dctx(dctx);
    if let Some(ddict) = ddict {
        dctx.ref_ddict(ddict).map_err(EngineError::from_raw)?;
    }
    Ok(())
}

pub(crate) fn unbind_dctx(dctx: &mut DCtx<'static>) {
    reset_dctx(dctx);
}

/// One-shot compression with whatever `cctx` is bound to.
pub(crate) fn compress(
    cctx: &mut CCtx<'_>,
    dst: &mut SpareCapacity<'_>,
    src: &[u8],
) -> Result<usize, EngineError> {
    cctx.compress2(dst, src).map_err(EngineError::from_raw)
}

pub(crate) fn decompress(
    dctx: &mut DCtx<'_>,
    dst: &mut SpareCapacity<'_>,
    src: &[u8],
) -> Result<usize, EngineError> {
    dctx.decompress(dst, src).map_err(EngineError::from_raw)
}

pub(crate) fn decompress_with_dict(
    dctx: &mut DCtx<'_>,
    dst: &mut SpareCapacity<'_>,
    src: &[u8],
    ddict: &DDict<'_>,
) -> Result<usize, EngineError> {
    dctx.decompress_using_ddict(dst, src, ddict)
        .map_err(EngineError::from_raw)
}
