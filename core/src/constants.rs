//! constants.rs
//! Compression defaults and buffer-growth policy bounds.

/// Default compression level (mirrors `ZSTD_CLEVEL_DEFAULT`).
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Largest declared frame content size we pre-allocate for (256 MiB).
/// Frames above it go through the streaming decoder instead.
pub const MAX_FRAME_CONTENT_SIZE: usize = 256 << 20;

/// Spare capacity (bytes) above which a slow-path result is shrunk to fit.
pub const SLACK_RECLAIM_THRESHOLD: usize = 4096;

/// Extra byte added to every slow-path destination window.
/// The engine's size checks are inclusive at the boundary.
pub const BOUNDARY_GUARD: usize = 1;

/// Numeric zstd error codes (`zstd_errors.h`), as carried by `ZSTD_getErrorCode`.
pub mod error_codes {
    pub const GENERIC: usize                  = 1;
    pub const PREFIX_UNKNOWN: usize           = 10;
    pub const VERSION_UNSUPPORTED: usize      = 12;
    pub const FRAME_PARAMETER_UNSUPPORTED: usize = 14;
    pub const WINDOW_TOO_LARGE: usize         = 16;
    pub const CORRUPTION_DETECTED: usize      = 20;
    pub const CHECKSUM_WRONG: usize           = 22;
    pub const DICTIONARY_CORRUPTED: usize     = 30;
    pub const DICTIONARY_WRONG: usize         = 32;
    pub const MEMORY_ALLOCATION: usize        = 64;
    pub const DST_SIZE_TOO_SMALL: usize       = 70;
    pub const SRC_SIZE_WRONG: usize           = 72;
}
