#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::ReleaseCurve;
use crate::synth::params::Params;

/// Configuration for a voice and its control channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    /// Parameter snapshot the voice starts with.
    pub params: Params,
    /// Scale applied to every rendered voice sample before it reaches the
    /// output buffers. Leaves headroom for the downstream graph.
    pub voice_level: f32,
    pub release_curve: ReleaseCurve,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            voice_level: 0.3,
            release_curve: ReleaseCurve::Nominal,
        }
    }
}
