//! config.rs
//! Process-wide runtime tunables.
//!
//! Defaults come from `constants`; overrides are plain atomics so reading them
//! on the decompression slow path costs a single relaxed load.
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::constants::MAX_FRAME_CONTENT_SIZE;

static MAX_PREALLOC: AtomicUsize = AtomicUsize::new(MAX_FRAME_CONTENT_SIZE);

/// Ceiling on a frame's declared content size that the decompression slow
/// path will pre-allocate for in one go.
#[inline]
pub fn max_frame_content_size() -> usize {
    MAX_PREALLOC.load(Ordering::Relaxed)
}

/// Override the pre-allocation ceiling. Returns the previous value.
///
/// `0` routes every slow-path decompression through the streaming decoder.
pub fn set_max_frame_content_size(bytes: usize) -> usize {
    let prev = MAX_PREALLOC.swap(bytes, Ordering::Relaxed);
    log::debug!("max frame content size {} -> {}", prev, bytes);
    prev
}

/// Restore every tunable to its compiled-in default.
pub fn reset() {
    set_max_frame_content_size(MAX_FRAME_CONTENT_SIZE);
}
