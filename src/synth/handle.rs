use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::Waveform,
    synth::{
        config::SynthConfig,
        engine::VoiceEngine,
        message::NoteEvent,
        params::{OutputSettings, ParamReader, ParamWriter, ParameterChannel, Params},
    },
};

/// Capacity of the note-event ring between control and render threads.
pub const NOTE_QUEUE_SIZE: usize = 256;

/// Control-context end of a voice.
///
/// Every call returns immediately. Notes are queued for the render thread and
/// parameter edits are published as whole snapshots.
pub struct SynthHandle {
    params: ParamWriter,
    notes: Option<Producer<NoteEvent>>,
    config: SynthConfig,
}

impl SynthHandle {
    /// A handle with no renderer attached yet. Notes sent before `attach`
    /// are dropped; parameter edits are kept and seed the renderer.
    pub fn new(config: SynthConfig) -> Self {
        let (params, _) = ParameterChannel::new(config.params);
        Self {
            params,
            notes: None,
            config,
        }
    }

    /// Build a render-side voice for a freshly negotiated sample rate.
    ///
    /// The new renderer starts silent with the latest parameter snapshot. Any
    /// previous renderer stops receiving notes.
    pub fn attach(&mut self, sample_rate: f64) -> Renderer {
        let (producer, consumer) = RingBuffer::new(NOTE_QUEUE_SIZE);
        self.notes = Some(producer);

        let reader = self.params.subscribe();
        let engine = VoiceEngine::new(sample_rate, reader.current())
            .with_release_curve(self.config.release_curve);

        tracing::debug!(sample_rate, "renderer attached");

        Renderer {
            engine,
            params: reader,
            notes: consumer,
            voice_level: self.config.voice_level,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.notes.as_ref().is_some_and(|p| !p.is_abandoned())
    }

    pub fn note_on(&mut self, frequency_hz: f32) {
        self.send(NoteEvent::NoteOn { frequency_hz });
    }

    pub fn note_off(&mut self) {
        self.send(NoteEvent::NoteOff);
    }

    fn send(&mut self, event: NoteEvent) {
        let Some(notes) = self.notes.as_mut() else {
            tracing::debug!(?event, "no renderer attached, note dropped");
            return;
        };
        if notes.push(event).is_err() {
            tracing::warn!(?event, "note queue full, note dropped");
        }
    }

    /// The snapshot most recently published.
    pub fn params(&self) -> &Params {
        self.params.current()
    }

    pub fn publish(&mut self, params: Params) {
        self.params.publish(params);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.params.set_waveform(waveform);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.params.set_attack(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.params.set_decay(seconds);
    }

    pub fn set_sustain(&mut self, level: f32) {
        self.params.set_sustain(level);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.params.set_release(seconds);
    }

    pub fn set_filter_cutoff(&mut self, hz: f32) {
        self.params.set_filter_cutoff(hz);
    }

    pub fn set_filter_resonance(&mut self, resonance: f32) {
        self.params.set_filter_resonance(resonance);
    }

    pub fn set_reverb_wet(&mut self, wet: f32) {
        self.params.set_reverb_wet(wet);
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.params.set_master_volume(volume);
    }
}

/// Render-context end of a voice. Move it into the audio callback.
///
/// Each render call is one batch: pick up the latest parameters, apply queued
/// note events, then render every requested frame. No allocation, locking or
/// logging happens here.
pub struct Renderer {
    engine: VoiceEngine,
    params: ParamReader,
    notes: Consumer<NoteEvent>,
    voice_level: f32,
}

impl Renderer {
    fn begin_batch(&mut self) {
        if self.params.poll() {
            self.engine.apply_params(self.params.current());
        }

        while let Ok(event) = self.notes.pop() {
            match event {
                NoteEvent::NoteOn { frequency_hz } => self.engine.note_on(frequency_hz),
                NoteEvent::NoteOff => self.engine.note_off(),
            }
        }
    }

    /// Fill an interleaved buffer, writing the same sample to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.begin_batch();

        for frame in data.chunks_mut(channels.max(1)) {
            let sample = self.engine.render_frame() * self.voice_level;
            frame.fill(sample);
        }
    }

    /// Fill one buffer per channel. Renders as many frames as the shortest
    /// buffer holds.
    pub fn render(&mut self, outputs: &mut [&mut [f32]]) {
        self.begin_batch();

        let frames = outputs.iter().map(|out| out.len()).min().unwrap_or(0);
        for i in 0..frames {
            let sample = self.engine.render_frame() * self.voice_level;
            for out in outputs.iter_mut() {
                out[i] = sample;
            }
        }
    }

    /// Downstream settings from the snapshot in effect for the last batch.
    pub fn output_settings(&self) -> OutputSettings {
        self.engine.output_settings()
    }

    pub fn engine(&self) -> &VoiceEngine {
        &self.engine
    }
}

/// Create a handle and an attached renderer in one go.
pub fn voice(sample_rate: f64, config: SynthConfig) -> (SynthHandle, Renderer) {
    let mut handle = SynthHandle::new(config);
    let renderer = handle.attach(sample_rate);
    (handle, renderer)
}
