use crate::MIN_TIME;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Envelope Implementation
============================

A linear attack/decay/sustain/release envelope evaluated from timestamps.

Vocabulary
----------

  gain        The envelope's output (0.0 to 1.0). Multiplies the oscillator
              sample.

  stage       Idle, Attack, Decay, Sustain or Release. Attack/Decay/Sustain
              are the three sub-stages of a held note; which one applies is
              decided by how long ago the note-on happened.

  timestamp   Sample-clock time (seconds since the engine started rendering)
              of the last note-on and the last note-off. Never wall-clock.


Why timestamps instead of per-sample increments
-----------------------------------------------

An incremental envelope (`level += step` every sample) carries hidden state:
its output depends on every sample rendered before. This one does not. The
gain is a pure function of

    (stage, note_on_at, note_off_at, attack, decay, sustain, release, now)

so evaluating twice at the same clock time gives the same bits, and editing
a stage time mid-note simply reshapes the ramp from the next frame on.


The Shape
---------

  Gain
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

  held,     d = now − note_on_at:
      d < A          gain = d / A
      d < A + D      gain = 1 − ((d − A) / D) · (1 − S)
      otherwise      gain = S

  released, r = now − note_off_at:
      r < R          gain = L · (1 − r / R)
      otherwise      gain = 0

L is the level the release ramps down from. With `ReleaseCurve::Nominal` it
is the sustain level no matter where the note was released (releasing
mid-attack jumps up to S first).
`ReleaseCurve::FromLevel` captures the gain reached at note-off instead.


State Machine
-------------

    ┌──────┐  note_on  ┌──────────────────────────┐  note_off  ┌─────────┐
    │ Idle │ ────────→ │ Attack → Decay → Sustain │ ─────────→ │ Release │
    └──────┘           └──────────────────────────┘            └─────────┘
                                   ↑           note_on (any time)   │
                                   └────────────────────────────────┘

Idle means "never sounded" and always yields exactly 0. Once a note has
sounded the envelope never returns to Idle; a finished release sits in
Release at gain 0 until the next note-on.
*/

/// The current stage of the envelope state machine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // No note has ever sounded, gain = 0
    Attack,  // Held, ramping 0 → 1
    Decay,   // Held, ramping 1 → sustain
    Sustain, // Held, holding at sustain
    Release, // Released, ramping to 0
}

/// Which level the release ramp starts from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseCurve {
    /// Always ramp down from the sustain level.
    #[default]
    Nominal,
    /// Ramp down from the gain reached at the moment of note-off.
    FromLevel,
}

/// Envelope shape. Times are in seconds, sustain is a level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EnvelopeParams {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
        .sanitized()
    }

    /// Times floored at [`MIN_TIME`], sustain clamped to [0, 1].
    ///
    /// NaN times become the floor and a NaN sustain becomes 0.
    pub fn sanitized(self) -> Self {
        Self {
            attack: clamp_time(self.attack),
            decay: clamp_time(self.decay),
            sustain: clamp_level(self.sustain),
            release: clamp_time(self.release),
        }
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.3,
            sustain: 0.6,
            release: 0.8,
        }
    }
}

#[inline]
pub(crate) fn clamp_time(seconds: f32) -> f32 {
    // f32::max returns the other operand when one side is NaN
    seconds.max(MIN_TIME)
}

#[inline]
pub(crate) fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

pub struct EnvelopeGenerator {
    // Shape (control-side values, already sanitized)
    params: EnvelopeParams,
    release_curve: ReleaseCurve,

    // Timing (sample-clock seconds)
    stage: EnvelopeStage,
    note_on_at: f64,
    note_off_at: f64,
    has_sounded: bool,

    // Level the release ramp starts from, only used by ReleaseCurve::FromLevel
    release_level: f32,

    // Last evaluated output
    gain: f32,
}

impl EnvelopeGenerator {
    pub fn new(params: EnvelopeParams) -> Self {
        Self {
            params: params.sanitized(),
            release_curve: ReleaseCurve::Nominal,
            stage: EnvelopeStage::Idle,
            note_on_at: 0.0,
            note_off_at: 0.0,
            has_sounded: false,
            release_level: 0.0,
            gain: 0.0,
        }
    }

    pub fn with_release_curve(mut self, curve: ReleaseCurve) -> Self {
        self.release_curve = curve;
        self
    }

    /// Gate high at clock time `now`: restart the attack from zero.
    pub fn on_note_on(&mut self, now: f64) {
        self.note_on_at = now;
        self.stage = EnvelopeStage::Attack;
        self.has_sounded = true;
    }

    /// Gate low at clock time `now`: start (or restart) the release ramp.
    ///
    /// Calling this again while already releasing moves the release start to
    /// `now`. With the nominal curve the ramp restarts from the sustain
    /// level, not from wherever the previous ramp had reached.
    pub fn on_note_off(&mut self, now: f64) {
        if self.release_curve == ReleaseCurve::FromLevel {
            self.release_level = self.gain_at(now).1;
        }
        self.note_off_at = now;
        self.stage = EnvelopeStage::Release;
    }

    /// Evaluate the envelope at clock time `now` and return the gain.
    ///
    /// Deterministic: the result depends only on `now`, the two timestamps
    /// and the current shape parameters.
    #[inline]
    pub fn evaluate(&mut self, now: f64) -> f32 {
        let (stage, gain) = self.gain_at(now);
        self.stage = stage;
        self.gain = gain;
        gain
    }

    fn gain_at(&self, now: f64) -> (EnvelopeStage, f32) {
        if !self.has_sounded {
            return (EnvelopeStage::Idle, 0.0);
        }

        let EnvelopeParams {
            attack,
            decay,
            sustain,
            release,
        } = self.params;

        let (stage, gain) = if self.stage == EnvelopeStage::Release {
            let elapsed = (now - self.note_off_at) as f32;
            let from = match self.release_curve {
                ReleaseCurve::Nominal => sustain,
                ReleaseCurve::FromLevel => self.release_level,
            };
            if elapsed < release {
                (EnvelopeStage::Release, from * (1.0 - elapsed / release))
            } else {
                (EnvelopeStage::Release, 0.0)
            }
        } else {
            let elapsed = (now - self.note_on_at) as f32;
            if elapsed < attack {
                (EnvelopeStage::Attack, elapsed / attack)
            } else if elapsed < attack + decay {
                let progress = (elapsed - attack) / decay;
                (EnvelopeStage::Decay, 1.0 - progress * (1.0 - sustain))
            } else {
                (EnvelopeStage::Sustain, sustain)
            }
        };

        (stage, clamp_level(gain))
    }

    /// Replace the envelope shape. Takes effect from the next evaluation.
    pub fn set_params(&mut self, params: EnvelopeParams) {
        self.params = params.sanitized();
    }

    pub fn params(&self) -> EnvelopeParams {
        self.params
    }

    pub fn set_release_curve(&mut self, curve: ReleaseCurve) {
        self.release_curve = curve;
    }

    /// Get the last evaluated gain (0.0 to 1.0)
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Get the stage as of the last evaluation or note event
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn has_sounded(&self) -> bool {
        self.has_sounded
    }

    /// True while held, or while the release ramp is still audible.
    pub fn is_active(&self) -> bool {
        match self.stage {
            EnvelopeStage::Idle => false,
            EnvelopeStage::Release => self.gain > 0.0,
            _ => true,
        }
    }

    pub fn note_on_at(&self) -> f64 {
        self.note_on_at
    }

    pub fn note_off_at(&self) -> f64 {
        self.note_off_at
    }
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new(EnvelopeParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    fn reference_envelope() -> EnvelopeGenerator {
        EnvelopeGenerator::new(EnvelopeParams::new(0.1, 0.3, 0.6, 0.8))
    }

    #[test]
    fn silent_before_first_note() {
        let mut env = reference_envelope();
        for t in [0.0, 0.05, 1.0, 10_000.0] {
            assert_eq!(env.evaluate(t), 0.0);
        }
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn note_off_before_first_note_stays_silent() {
        let mut env = reference_envelope();
        env.on_note_off(0.5);
        assert_eq!(env.evaluate(0.6), 0.0);
        assert!(!env.has_sounded());
    }

    #[test]
    fn attack_decay_sustain_reference_points() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);

        assert!((env.evaluate(0.05) - 0.5).abs() < TOLERANCE);
        assert_eq!(env.stage(), EnvelopeStage::Attack);

        assert!((env.evaluate(0.25) - 0.8).abs() < TOLERANCE);
        assert_eq!(env.stage(), EnvelopeStage::Decay);

        assert_eq!(env.evaluate(1.0), 0.6);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
    }

    #[test]
    fn release_reference_points() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        env.evaluate(1.0);
        env.on_note_off(1.0);

        assert!((env.evaluate(1.4) - 0.3).abs() < TOLERANCE);
        assert_eq!(env.evaluate(1.8), 0.0);
        assert_eq!(env.evaluate(5.0), 0.0);
        assert_eq!(env.stage(), EnvelopeStage::Release);
        assert!(!env.is_active());
    }

    #[test]
    fn evaluate_is_idempotent() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        for t in [0.0, 0.03, 0.1, 0.2, 0.4, 2.0] {
            let first = env.evaluate(t);
            let second = env.evaluate(t);
            assert_eq!(first.to_bits(), second.to_bits());
        }
        env.on_note_off(2.0);
        for t in [2.0, 2.3, 2.79, 3.0] {
            assert_eq!(env.evaluate(t).to_bits(), env.evaluate(t).to_bits());
        }
    }

    #[test]
    fn stages_are_monotonic() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        let at = |frame: u32| frame as f64 / 44_100.0;

        // Attack: frames 0..4400 (< 0.0998 s)
        let mut previous = env.evaluate(0.0);
        for frame in 1..4_400 {
            let gain = env.evaluate(at(frame));
            assert!(gain >= previous, "attack must not fall");
            previous = gain;
        }

        // Decay: 0.1005 s .. 0.3995 s
        previous = 1.0;
        for frame in 4_433..17_618 {
            let gain = env.evaluate(at(frame));
            assert_eq!(env.stage(), EnvelopeStage::Decay);
            assert!(gain <= previous, "decay must move toward sustain");
            assert!(gain >= 0.6 - TOLERANCE);
            previous = gain;
        }

        // Sustain
        for frame in 17_700..44_100 {
            assert_eq!(env.evaluate(at(frame)), 0.6);
        }

        env.on_note_off(1.0);
        previous = env.evaluate(1.0);
        for frame in 44_101..88_200 {
            let gain = env.evaluate(at(frame));
            assert!(gain <= previous, "release must not rise");
            previous = gain;
        }
    }

    #[test]
    fn nominal_release_starts_from_sustain_even_mid_attack() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        assert!((env.evaluate(0.02) - 0.2).abs() < TOLERANCE);

        env.on_note_off(0.02);
        assert!((env.evaluate(0.02) - 0.6).abs() < TOLERANCE);
    }

    #[test]
    fn nominal_release_retrigger_restarts_from_sustain() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        env.on_note_off(1.0);
        assert!((env.evaluate(1.4) - 0.3).abs() < TOLERANCE);

        env.on_note_off(1.4);
        assert!((env.evaluate(1.4) - 0.6).abs() < TOLERANCE);
    }

    #[test]
    fn level_release_starts_where_the_note_was() {
        let mut env = reference_envelope().with_release_curve(ReleaseCurve::FromLevel);
        env.on_note_on(0.0);
        env.on_note_off(0.02);
        assert!((env.evaluate(0.02) - 0.2).abs() < TOLERANCE);
        assert!((env.evaluate(0.42) - 0.1).abs() < TOLERANCE);

        // Retriggered release continues from the current ramp position
        env.on_note_off(0.42);
        assert!((env.evaluate(0.42) - 0.1).abs() < TOLERANCE);
    }

    #[test]
    fn note_on_mid_release_restarts_attack() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        env.on_note_off(1.0);
        assert!(env.evaluate(1.2) > 0.0);

        env.on_note_on(1.2);
        assert_eq!(env.evaluate(1.2), 0.0);
        assert_eq!(env.stage(), EnvelopeStage::Attack);
        assert!((env.evaluate(1.25) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn params_are_sanitized() {
        let params = EnvelopeParams::new(0.0, -1.0, 1.5, f32::NAN);
        assert_eq!(params.attack, MIN_TIME);
        assert_eq!(params.decay, MIN_TIME);
        assert_eq!(params.sustain, 1.0);
        assert_eq!(params.release, MIN_TIME);
        assert_eq!(EnvelopeParams::new(0.1, 0.1, f32::NAN, 0.1).sustain, 0.0);
    }

    #[test]
    fn mid_ramp_edit_stays_in_range() {
        let mut env = reference_envelope();
        env.on_note_on(0.0);
        env.evaluate(0.05);

        // Shrinking attack mid-ramp would overshoot without the clamp
        env.set_params(EnvelopeParams::new(0.01, 0.3, 0.6, 0.8));
        let gain = env.evaluate(0.05);
        assert!((0.0..=1.0).contains(&gain));
    }
}
