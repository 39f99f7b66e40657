//! compression/dict.rs
//! Dictionary training and prepared dictionary handles.
//!
//! Design notes:
//! - Both handle types prepare their engine structure once and are immutable
//!   afterwards; they are `Send + Sync` and meant to be shared by reference
//!   (or behind an `Arc`) across any number of concurrent calls.
//! - `release(self)` consumes the handle. Releasing twice, or while another
//!   call still borrows the dictionary, does not compile. Dropping without
//!   `release` frees the native structure just the same.
//! - Only the prepared structure is kept. Every path, streaming included,
//!   references it from a pooled context instead of re-digesting raw bytes.
use std::fmt;

use zstd_safe::{CDict, DDict};

use crate::compression::engine::clamp_level;
use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::types::DictError;

/// Train a dictionary of at most `capacity` bytes from `samples`.
///
/// The result can be handed to `CompressionDictionary` and
/// `DecompressionDictionary`.
pub fn build_dict<S: AsRef<[u8]>>(samples: &[S], capacity: usize) -> Result<Vec<u8>, DictError> {
    if capacity == 0 {
        return Err(DictError::InvalidCapacity);
    }
    let dict = zstd::dict::from_samples(samples, capacity).map_err(DictError::Training)?;
    log::debug!(
        "trained {} byte dictionary from {} samples (capacity {})",
        dict.len(),
        samples.len(),
        capacity
    );
    Ok(dict)
}

/// Compression-side prepared dictionary, bound to one compression level.
pub struct CompressionDictionary {
    cdict: CDict<'static>,
    len: usize,
    level: i32,
}

impl CompressionDictionary {
    /// Prepare `dict` at the default compression level.
    pub fn new(dict: &[u8]) -> Result<Self, DictError> {
        Self::with_level(dict, DEFAULT_COMPRESSION_LEVEL)
    }

    /// Prepare `dict` for compression at `level` (clamped to the supported range).
    pub fn with_level(dict: &[u8], level: i32) -> Result<Self, DictError> {
        if dict.is_empty() {
            return Err(DictError::Empty);
        }
        let level = clamp_level(level);
        let cdict = CDict::try_create(dict, level).ok_or(DictError::Rejected {
            side: "compression",
            len: dict.len(),
        })?;
        Ok(Self {
            cdict,
            len: dict.len(),
            level,
        })
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub(crate) fn cdict(&self) -> &CDict<'static> {
        &self.cdict
    }

    /// Free the prepared engine structure.
    pub fn release(self) {
        log::trace!("releasing compression dictionary ({} bytes)", self.len);
        drop(self);
    }
}

impl fmt::Debug for CompressionDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionDictionary")
            .field("len", &self.len)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Decompression-side prepared dictionary.
pub struct DecompressionDictionary {
    ddict: DDict<'static>,
    len: usize,
}

impl DecompressionDictionary {
    pub fn new(dict: &[u8]) -> Result<Self, DictError> {
        if dict.is_empty() {
            return Err(DictError::Empty);
        }
        let ddict = DDict::try_create(dict).ok_or(DictError::Rejected {
            side: "decompression",
            len: dict.len(),
        })?;
        Ok(Self {
            ddict,
            len: dict.len(),
        })
    }

    pub(crate) fn ddict(&self) -> &DDict<'static> {
        &self.ddict
    }

    /// Free the prepared engine structure.
    pub fn release(self) {
        log::trace!("releasing decompression dictionary ({} bytes)", self.len);
        drop(self);
    }
}

impl fmt::Debug for DecompressionDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressionDictionary")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
