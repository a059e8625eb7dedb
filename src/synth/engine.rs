use crate::{
    dsp::{EnvelopeGenerator, Oscillator, ReleaseCurve, SampleClock},
    synth::params::{OutputSettings, Params},
    MIN_FREQUENCY_HZ,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,     // Never sounded
    Held,     // Between note-on and note-off: attack, decay or sustain
    Released, // Note released, envelope ramping to silence
}

/// The single synth voice: one clock, one oscillator, one envelope.
///
/// Lives entirely on the render thread. Nothing here allocates, locks or
/// fails; out-of-range input is clamped.
pub struct VoiceEngine {
    clock: SampleClock,
    oscillator: Oscillator,
    envelope: EnvelopeGenerator,
    frequency_hz: f32,
    state: VoiceState,
    output: OutputSettings,
}

impl VoiceEngine {
    pub fn new(sample_rate: f64, params: &Params) -> Self {
        let clock = SampleClock::new(sample_rate);
        let oscillator = Oscillator::new(clock.sample_rate_hz(), params.waveform);

        Self {
            clock,
            oscillator,
            envelope: EnvelopeGenerator::new(params.envelope),
            frequency_hz: 440.0,
            state: VoiceState::Idle,
            output: params.output,
        }
    }

    pub fn with_release_curve(mut self, curve: ReleaseCurve) -> Self {
        self.envelope.set_release_curve(curve);
        self
    }

    /// Retune the voice and restart the envelope from the attack.
    ///
    /// Valid in any state, including mid-release. The oscillator phase is
    /// left untouched so the pitch change does not click.
    pub fn note_on(&mut self, frequency_hz: f32) {
        self.frequency_hz = frequency_hz.max(MIN_FREQUENCY_HZ);
        self.envelope.on_note_on(self.clock.elapsed_seconds());
        self.state = VoiceState::Held;
    }

    /// Start the release ramp. Does nothing before the first note-on.
    pub fn note_off(&mut self) {
        if self.state == VoiceState::Idle {
            return;
        }
        self.envelope.on_note_off(self.clock.elapsed_seconds());
        self.state = VoiceState::Released;
    }

    /// Render one mono frame.
    ///
    /// Always does the same work whatever the note state: silence is a gain
    /// of zero, not a skipped frame.
    #[inline]
    pub fn render_frame(&mut self) -> f32 {
        let now = self.clock.advance();
        let gain = self.envelope.evaluate(now);
        let sample = self.oscillator.next_sample(self.frequency_hz);
        sample * gain
    }

    /// Apply a complete parameter snapshot.
    pub fn apply_params(&mut self, params: &Params) {
        self.oscillator.set_waveform(params.waveform);
        self.envelope.set_params(params.envelope);
        self.output = params.output;
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn has_sounded(&self) -> bool {
        self.envelope.has_sounded()
    }

    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }

    /// Gain from the most recent frame (0.0 to 1.0)
    pub fn envelope_gain(&self) -> f32 {
        self.envelope.gain()
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    pub fn oscillator_phase(&self) -> f32 {
        self.oscillator.phase()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.clock.elapsed_seconds()
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.clock.sample_rate_hz()
    }

    /// Downstream settings from the last applied snapshot, uninterpreted.
    pub fn output_settings(&self) -> OutputSettings {
        self.output
    }
}
