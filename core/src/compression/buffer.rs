//! compression/buffer.rs
//! Append windows over a caller's `Vec<u8>`.
//!
//! The engine writes into the region between the vector's logical length and
//! some limit inside its capacity. `SpareCapacity` holds the `&mut Vec<u8>`
//! for the whole engine call, so the backing storage cannot move or be freed
//! while the engine holds the pointer.
#![allow(unsafe_code)]

use zstd_safe::WriteBuf;

use crate::constants::{BOUNDARY_GUARD, SLACK_RECLAIM_THRESHOLD};

/// Writable window `[len, limit)` of a vector's capacity.
pub(crate) struct SpareCapacity<'a> {
    buf: &'a mut Vec<u8>,
    base: usize,
    limit: usize,
}

impl<'a> SpareCapacity<'a> {
    /// Window over everything past `buf.len()` up to the current capacity.
    pub(crate) fn all(buf: &'a mut Vec<u8>) -> Self {
        let limit = buf.capacity();
        Self::with_limit(buf, limit)
    }

    /// Window of exactly `room` bytes past `buf.len()`, growing the backing
    /// storage first if needed.
    pub(crate) fn reserve(buf: &'a mut Vec<u8>, room: usize) -> Self {
        // `reserve` extends the existing allocation when the allocator can.
        buf.reserve(room);
        let limit = buf.len() + room;
        Self::with_limit(buf, limit)
    }

    fn with_limit(buf: &'a mut Vec<u8>, limit: usize) -> Self {
        let base = buf.len();
        debug_assert!(base <= limit && limit <= buf.capacity());
        Self { buf, base, limit }
    }

    /// Bytes available to the engine.
    pub(crate) fn room(&self) -> usize {
        self.limit - self.base
    }
}

// SAFETY: `as_mut_ptr` points at `base` inside the vector's allocation and
// `capacity` never exceeds `limit - base`, which the constructors keep within
// `Vec::capacity`. `filled_until` is only called by zstd-safe after the engine
// initialised exactly `n` bytes starting at that pointer.
unsafe impl WriteBuf for SpareCapacity<'_> {
    fn as_slice(&self) -> &[u8] {
        &self.buf[self.base..]
    }

    fn capacity(&self) -> usize {
        self.room()
    }

    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.buf.as_mut_ptr().wrapping_add(self.base)
    }

    unsafe fn filled_until(&mut self, n: usize) {
        debug_assert!(n <= self.room());
        self.buf.set_len(self.base + n);
    }
}

/// Slow-path window size for a payload bounded by `bound` bytes.
#[inline]
pub(crate) fn guarded(bound: usize) -> usize {
    bound.saturating_add(BOUNDARY_GUARD)
}

/// Whether `buf` has any capacity past its logical length.
#[inline]
pub(crate) fn has_spare(buf: &Vec<u8>) -> bool {
    buf.capacity() > buf.len()
}

/// Drop oversized backing storage left behind by a slow-path grow.
/// Returns `true` when the buffer was shrunk.
pub(crate) fn reclaim_slack(buf: &mut Vec<u8>) -> bool {
    let slack = buf.capacity() - buf.len();
    if slack > SLACK_RECLAIM_THRESHOLD {
        log::debug!("reclaiming {} bytes of slack (len {})", slack, buf.len());
        buf.shrink_to_fit();
        return true;
    }
    false
}
