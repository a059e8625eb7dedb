//! Low-level DSP primitives driven once per frame by the voice engine.
//!
//! Everything here is allocation-free and realtime-safe. The primitives own
//! their numerical state (phase, timestamps) and know nothing about threads;
//! the `synth` layer decides who is allowed to touch them.

/// Monotonic sample clock in audio-frame units.
pub mod clock;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Phase-accumulating oscillator and its waveform shapes.
pub mod oscillator;

pub use clock::SampleClock;
pub use envelope::{EnvelopeGenerator, EnvelopeParams, EnvelopeStage, ReleaseCurve};
pub use oscillator::{Oscillator, Waveform};
