pub mod dsp; // Clock, oscillator and envelope primitives
pub mod io; // Device output, output stage seam, pitch tables
pub mod synth; // Voice engine and the control/render boundary

pub use dsp::{EnvelopeStage, Waveform};
pub use synth::{voice, Params, Renderer, SynthConfig, SynthHandle, VoiceEngine};

/// Smallest envelope stage duration in seconds. Guards every division by a
/// stage time.
pub const MIN_TIME: f32 = 1.0 / 48_000.0;
/// Lowest pitch the voice will be tuned to.
pub const MIN_FREQUENCY_HZ: f32 = 0.01;
