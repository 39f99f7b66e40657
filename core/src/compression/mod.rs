//! compression/mod.rs
//! Append-to-buffer compression over the zstd engine.
//!
//! Notes:
//! - Callers own the destination `Vec<u8>`; bytes already in it are never
//!   touched, output is appended after them.
//! - Engine contexts come from process-wide pools, one per call, and go back
//!   when the call returns.
//! - Dictionaries are prepared once and shared by reference.

pub mod engine;
pub mod compress;
pub mod decompress;
pub mod dict;
pub mod stream;

pub(crate) mod buffer;
pub(crate) mod fallback;
pub(crate) mod pool;

pub use compress::*;
pub use decompress::*;
pub use dict::*;
pub use stream::*;
pub use engine::{compress_bound, FrameContentSize};
pub use pool::release_idle_contexts;
