use core::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulating Oscillator
=============================

The oscillator keeps a running angle, `phase`, in [0, 2π). Every frame it
reads the waveform at the current phase and then advances by

    increment = 2π · frequency / sample_rate

wrapping back into range by subtracting 2π. Because the phase is never reset,
retuning the voice (a new note-on) continues from wherever the cycle was:
the pitch jumps, the waveform does not.

Shapes
------

  Sine      sin(phase)                      pure tone, no harmonics
  Square    +1 below π, −1 from π onwards   hollow, odd harmonics only
  Sawtooth  phase/π − 1                     bright ramp from −1 to +1

      +1 ┤ ▁▂▄▆▇▆▄▂▁          ┌────┐          ╱|   ╱|
       0 ┤          ▁         │    │         ╱ |  ╱ |
      −1 ┤           ▔▀▀▀▔    │    └────┘   ╱  | ╱  |
           0    π    2π        0   π   2π    0  2π

None of these are band-limited: square and sawtooth alias at high pitches.
*/

/// Waveform shapes the voice can produce.
///
/// A closed enum evaluated with an exhaustive `match`, so the render loop
/// never goes through an indirect call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Square, Waveform::Sawtooth];

    /// Waveform value at `phase` (radians, expected in [0, 2π)).
    #[inline]
    pub fn evaluate(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => (phase / PI) - 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        }
    }

    /// The next shape in [`Waveform::ALL`], wrapping around.
    pub fn next(self) -> Self {
        match self {
            Waveform::Sine => Waveform::Square,
            Waveform::Square => Waveform::Sawtooth,
            Waveform::Sawtooth => Waveform::Sine,
        }
    }

    /// Stable integer encoding, used to publish the shape through an atomic.
    pub(crate) fn to_bits(self) -> u32 {
        match self {
            Waveform::Sine => 0,
            Waveform::Square => 1,
            Waveform::Sawtooth => 2,
        }
    }

    pub(crate) fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Waveform::Square,
            2 => Waveform::Sawtooth,
            _ => Waveform::Sine,
        }
    }
}

pub struct Oscillator {
    waveform: Waveform,
    phase: f32, // radians, [0, 2π)
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f64, waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            sample_rate: sample_rate as f32,
        }
    }

    /// Produce one sample at the current phase, then advance the phase.
    ///
    /// `frequency_hz` must be positive; the voice engine clamps it before
    /// calling.
    #[inline]
    pub fn next_sample(&mut self, frequency_hz: f32) -> f32 {
        let sample = self.waveform.evaluate(self.phase);

        self.phase += TAU * frequency_hz / self.sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
            // Only reachable when the frequency is above the sample rate.
            if self.phase >= TAU {
                self.phase = self.phase.rem_euclid(TAU);
            }
        }

        sample
    }

    /// Fill `buffer` with consecutive samples at a fixed frequency.
    pub fn render(&mut self, buffer: &mut [f32], frequency_hz: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(frequency_hz);
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44_100.0;

    #[test]
    fn every_waveform_stays_in_range() {
        let steps = 10_000;
        for waveform in Waveform::ALL {
            for i in 0..steps {
                let phase = TAU * i as f32 / steps as f32;
                let value = waveform.evaluate(phase);
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "{} out of range at phase {}: {}",
                    waveform.name(),
                    phase,
                    value
                );
            }
        }
    }

    #[test]
    fn square_tie_breaks_at_pi() {
        assert_eq!(Waveform::Square.evaluate(0.0), 1.0);
        assert_eq!(Waveform::Square.evaluate(PI), -1.0);
    }

    #[test]
    fn sawtooth_ramps_from_minus_one() {
        assert_eq!(Waveform::Sawtooth.evaluate(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.evaluate(PI), 0.0);
        assert!(Waveform::Sawtooth.evaluate(TAU - 1e-4) > 0.99);
    }

    #[test]
    fn phase_wraps_into_one_period() {
        let mut osc = Oscillator::new(SAMPLE_RATE, Waveform::Sine);
        for _ in 0..100_000 {
            osc.next_sample(1_234.5);
            assert!((0.0..TAU).contains(&osc.phase()));
        }
    }

    #[test]
    fn frequency_above_sample_rate_still_wraps() {
        let mut osc = Oscillator::new(1_000.0, Waveform::Sawtooth);
        for _ in 0..100 {
            let sample = osc.next_sample(3_700.0);
            assert!((-1.0..=1.0).contains(&sample));
            assert!((0.0..TAU).contains(&osc.phase()));
        }
    }

    #[test]
    fn frequency_change_keeps_phase() {
        let mut osc = Oscillator::new(SAMPLE_RATE, Waveform::Sine);
        for _ in 0..37 {
            osc.next_sample(440.0);
        }
        let phase_before = osc.phase();

        // First sample at the new pitch is read at the old phase.
        let sample = osc.next_sample(880.0);
        assert_eq!(sample, phase_before.sin());

        let expected = phase_before + TAU * 880.0 / SAMPLE_RATE as f32;
        assert!((osc.phase() - expected.rem_euclid(TAU)).abs() < 1e-5);
    }

    #[test]
    fn waveform_switch_keeps_phase() {
        let mut osc = Oscillator::new(SAMPLE_RATE, Waveform::Sine);
        for _ in 0..10 {
            osc.next_sample(440.0);
        }
        let phase = osc.phase();
        osc.set_waveform(Waveform::Sawtooth);
        assert_eq!(osc.phase(), phase);
        assert_eq!(osc.next_sample(440.0), Waveform::Sawtooth.evaluate(phase));
    }

    #[test]
    fn bits_round_trip_and_unknown_falls_back() {
        for waveform in Waveform::ALL {
            assert_eq!(Waveform::from_bits(waveform.to_bits()), waveform);
        }
        assert_eq!(Waveform::from_bits(99), Waveform::Sine);
    }
}
