//! types.rs
//! Error types shared by the compression layer.
//!
//! - `EngineError` wraps a raw zstd return code and keeps the engine's own
//!   diagnostic text as its `Display`.
//! - `DecompressError` is the recoverable class: anything caused by untrusted
//!   input ends up here.
//! - `DictError` covers dictionary training and preparation.
use std::fmt;

use thiserror::Error;

use crate::constants::error_codes;

/// Classified zstd error code (`ZSTD_ErrorCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineErrorKind {
    Generic,
    PrefixUnknown,
    VersionUnsupported,
    FrameParameterUnsupported,
    WindowTooLarge,
    CorruptionDetected,
    ChecksumWrong,
    DictionaryCorrupted,
    DictionaryWrong,
    MemoryAllocation,
    DstSizeTooSmall,
    SrcSizeWrong,
    Other(usize),
}

impl EngineErrorKind {
    fn from_code(code: usize) -> Self {
        use EngineErrorKind::*;
        match code {
            error_codes::GENERIC => Generic,
            error_codes::PREFIX_UNKNOWN => PrefixUnknown,
            error_codes::VERSION_UNSUPPORTED => VersionUnsupported,
            error_codes::FRAME_PARAMETER_UNSUPPORTED => FrameParameterUnsupported,
            error_codes::WINDOW_TOO_LARGE => WindowTooLarge,
            error_codes::CORRUPTION_DETECTED => CorruptionDetected,
            error_codes::CHECKSUM_WRONG => ChecksumWrong,
            error_codes::DICTIONARY_CORRUPTED => DictionaryCorrupted,
            error_codes::DICTIONARY_WRONG => DictionaryWrong,
            error_codes::MEMORY_ALLOCATION => MemoryAllocation,
            error_codes::DST_SIZE_TOO_SMALL => DstSizeTooSmall,
            error_codes::SRC_SIZE_WRONG => SrcSizeWrong,
            other => Other(other),
        }
    }
}

/// A failed engine call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineError {
    // Raw `size_t` return value, i.e. `(size_t)-ZSTD_ErrorCode`.
    raw: usize,
}

impl EngineError {
    /// Wrap a raw zstd return value that the engine flagged as an error.
    pub fn from_raw(raw: usize) -> Self {
        Self { raw }
    }

    /// The engine's "corruption detected" error.
    pub(crate) fn corruption() -> Self {
        Self::from_raw(0usize.wrapping_sub(error_codes::CORRUPTION_DETECTED))
    }

    /// Numeric `ZSTD_ErrorCode`.
    pub fn code(&self) -> usize {
        0usize.wrapping_sub(self.raw)
    }

    pub fn kind(&self) -> EngineErrorKind {
        EngineErrorKind::from_code(self.code())
    }

    /// Engine diagnostic text (`ZSTD_getErrorName`).
    pub fn description(&self) -> &'static str {
        zstd_safe::get_error_name(self.raw)
    }

    pub fn is_dst_too_small(&self) -> bool {
        self.kind() == EngineErrorKind::DstSizeTooSmall
    }
}

impl fmt::Debug for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineError")
            .field("code", &self.code())
            .field("kind", &self.kind())
            .field("text", &self.description())
            .finish()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for EngineError {}

/// Recoverable decompression failure.
///
/// The destination buffer's logical length is left untouched whenever one of
/// these is returned.
#[derive(Debug, Error)]
pub enum DecompressError {
    /// The engine rejected the frame (malformed, wrong dictionary, corrupt).
    #[error("decompression error: {0}")]
    Engine(#[from] EngineError),

    /// The frame header could not be parsed at all.
    #[error("cannot decompress invalid src")]
    InvalidInput,

    /// Input ended in the middle of a frame.
    #[error("decompression error: truncated input, frame incomplete after {consumed} bytes")]
    Truncated { consumed: usize },
}

impl DecompressError {
    /// Engine classification, when the failure came from the engine.
    pub fn engine_kind(&self) -> Option<EngineErrorKind> {
        match self {
            DecompressError::Engine(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn is_dictionary_mismatch(&self) -> bool {
        self.engine_kind() == Some(EngineErrorKind::DictionaryWrong)
    }
}

/// Dictionary training / preparation failure.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("dictionary capacity must be positive")]
    InvalidCapacity,

    #[error("dictionary cannot be empty")]
    Empty,

    #[error("dictionary training failed: {0}")]
    Training(#[source] std::io::Error),

    #[error("engine rejected {side} dictionary of {len} bytes")]
    Rejected { side: &'static str, len: usize },
}
