//! telemetry/mod.rs
//! Process-wide counters for the buffer protocol and the context pools.
//!
//! Notes:
//! - Counters are relaxed atomics bumped on the hot path; they never order
//!   other memory operations.
//! - `snapshot()` copies them into an immutable, serializable value.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
