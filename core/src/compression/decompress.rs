//! compression/decompress.rs
//! Append-to-buffer decompression of untrusted input.
//!
//! Same two-pass shape as compression, but every engine failure is a
//! recoverable `DecompressError` and `dst` keeps its original length on error.
//! When the output size cannot be trusted up front the call is handed to the
//! streaming fallback instead of committing to one large allocation.
use crate::compression::buffer::{guarded, has_spare, reclaim_slack, SpareCapacity};
use crate::compression::dict::DecompressionDictionary;
use crate::compression::engine::{self, frame_content_size, FrameContentSize};
use crate::compression::fallback::stream_decompress;
use crate::compression::pool::{decompression_pool, DecompressionContext};
use crate::config::max_frame_content_size;
use crate::telemetry::{record, Event};
use crate::types::{DecompressError, EngineError};

/// Append the decompressed form of `src` to `dst`.
pub fn decompress(dst: &mut Vec<u8>, src: &[u8]) -> Result<(), DecompressError> {
    decompress_with(dst, src, None)
}

/// Append the decompressed form of `src` to `dst` using `dict`.
pub fn decompress_dict(
    dst: &mut Vec<u8>,
    src: &[u8],
    dict: &DecompressionDictionary,
) -> Result<(), DecompressError> {
    decompress_with(dst, src, Some(dict))
}

fn decompress_with(
    dst: &mut Vec<u8>,
    src: &[u8],
    dict: Option<&DecompressionDictionary>,
) -> Result<(), DecompressError> {
    if src.is_empty() {
        return Ok(());
    }
    let result = {
        let mut dctx = decompression_pool(dict.is_some()).acquire();
        decompress_into(&mut dctx, dst, src, dict)
    };
    if result.is_err() {
        record(Event::DecompressFailure);
    }
    result
}

fn run(
    dctx: &mut DecompressionContext,
    window: &mut SpareCapacity<'_>,
    src: &[u8],
    dict: Option<&DecompressionDictionary>,
) -> Result<usize, EngineError> {
    match dict {
        None => engine::decompress(&mut dctx.0, window, src),
        Some(dict) => engine::decompress_with_dict(&mut dctx.0, window, src, dict.ddict()),
    }
}

fn decompress_into(
    dctx: &mut DecompressionContext,
    dst: &mut Vec<u8>,
    src: &[u8],
    dict: Option<&DecompressionDictionary>,
) -> Result<(), DecompressError> {
    if has_spare(dst) {
        let mut window = SpareCapacity::all(dst);
        match run(dctx, &mut window, src, dict) {
            Ok(_) => {
                record(Event::DecompressFastPath);
                return Ok(());
            }
            Err(e) if e.is_dst_too_small() => {}
            Err(e) => return Err(e.into()),
        }
    }

    record(Event::DecompressSlowPath);
    let content_size = match frame_content_size(src) {
        FrameContentSize::Error => return Err(DecompressError::InvalidInput),
        FrameContentSize::Unknown => None,
        FrameContentSize::Known(size) => usize::try_from(size)
            .ok()
            .filter(|&size| size <= max_frame_content_size()),
    };
    let Some(content_size) = content_size else {
        log::debug!("content size unknown or above ceiling, streaming {} byte src", src.len());
        return stream_decompress(dst, src, dict);
    };

    let mut window = SpareCapacity::reserve(dst, guarded(content_size));
    match run(dctx, &mut window, src, dict) {
        Ok(_) => {}
        // More frames follow the one whose size was declared.
        Err(e) if e.is_dst_too_small() => {
            log::debug!("declared size {} too small for src, streaming", content_size);
            return stream_decompress(dst, src, dict);
        }
        Err(e) => return Err(e.into()),
    }
    if reclaim_slack(dst) {
        record(Event::SlackReclaim);
    }
    Ok(())
}
