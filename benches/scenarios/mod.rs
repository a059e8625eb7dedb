//! Real-world scenario benchmarks.
//!
//! The voice as the device callback sees it: parameter poll, note drain,
//! interleaved render.

mod voices;

pub use voices::{bench_param_updates, bench_voice};
