use crate::synth::OutputSettings;

/// A processing step between the rendered voice and the device buffer.
///
/// Filter and reverb live outside this crate; they implement this trait and
/// read their own fields from [`OutputSettings`]. `process` runs in the audio
/// callback and must not allocate or block.
pub trait OutputStage: Send {
    /// Pick up settings from the latest parameter snapshot.
    fn configure(&mut self, settings: &OutputSettings);

    /// Process an interleaved block in place.
    fn process(&mut self, block: &mut [f32]);
}

/// Applies `master_volume`, clamped to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct MasterGain {
    gain: f32,
}

impl MasterGain {
    pub fn new(volume: f32) -> Self {
        let mut stage = Self { gain: 0.0 };
        stage.set_volume(volume);
        stage
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.gain = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for MasterGain {
    fn default() -> Self {
        Self::new(OutputSettings::default().master_volume)
    }
}

impl OutputStage for MasterGain {
    fn configure(&mut self, settings: &OutputSettings) {
        self.set_volume(settings.master_volume);
    }

    #[inline]
    fn process(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample *= self.gain;
        }
    }
}
