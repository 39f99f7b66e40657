//! zbuf-core
//!
//! Append-to-buffer zstd compression with pooled engine contexts,
//! prepared dictionaries and a streaming fallback for frames whose size
//! cannot be trusted up front.

#![deny(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;
pub mod types;

pub mod compression;
pub mod telemetry;

pub use compression::{
    build_dict, compress, compress_bound, compress_dict, compress_level, decompress,
    decompress_dict, release_idle_contexts, stream_compress, stream_compress_dict,
    stream_compress_level, stream_decompress, stream_decompress_dict, CompressionDictionary,
    DecompressionDictionary,
};
pub use constants::DEFAULT_COMPRESSION_LEVEL;
pub use types::{DecompressError, DictError, EngineError, EngineErrorKind};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{
        compress, compress_dict, compress_level, decompress, decompress_dict,
        CompressionDictionary, DecompressionDictionary,
    };
    pub use crate::types::{DecompressError, DictError};
}
