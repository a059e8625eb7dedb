//! Benchmarks for the per-frame DSP primitives.

mod envelope;
mod oscillator;

pub use envelope::bench_envelope;
pub use oscillator::bench_oscillator;
