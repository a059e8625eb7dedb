//! Player - owns the control end of the voice and the output device

use rtrb::{Consumer, RingBuffer};

use minisynth::{
    io::{AudioOutput, MasterGain, OutputConfig, OutputStage, StreamInfo},
    SynthConfig, SynthHandle,
};

/// Scope ring size in samples (first channel only)
const SCOPE_RING_SIZE: usize = 8192;

pub struct Player {
    handle: SynthHandle,
    output: AudioOutput,
    scope_rx: Option<Consumer<f32>>,
    status: Status,
}

pub enum Status {
    Stopped,
    Running(StreamInfo),
    Failed(String),
}

impl Player {
    pub fn new(config: SynthConfig, output: OutputConfig) -> Self {
        Self {
            handle: SynthHandle::new(config),
            output: AudioOutput::new(output),
            scope_rx: None,
            status: Status::Stopped,
        }
    }

    /// Open the output device and attach a fresh renderer to it.
    ///
    /// Errors end up in `status`; the voice stays silent until a later
    /// `start` succeeds.
    pub fn start(&mut self) {
        if self.output.is_running() {
            return;
        }

        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
        let handle = &mut self.handle;

        let result = self.output.start(|info| {
            let mut renderer = handle.attach(info.sample_rate);
            let mut master = MasterGain::default();
            let channels = info.channels.max(1);

            move |data: &mut [f32]| {
                renderer.render_interleaved(data, channels);
                master.configure(&renderer.output_settings());
                master.process(data);

                for frame in data.chunks(channels) {
                    // Drop scope samples when the UI falls behind
                    let _ = scope_tx.push(frame[0]);
                }
            }
        });

        match result {
            Ok(info) => {
                self.scope_rx = Some(scope_rx);
                self.status = Status::Running(info);
            }
            Err(err) => {
                tracing::error!(%err, "audio output failed to start");
                self.status = Status::Failed(err.to_string());
            }
        }
    }

    pub fn handle(&mut self) -> &mut SynthHandle {
        &mut self.handle
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Move every pending scope sample into `out`.
    pub fn drain_scope(&mut self, out: &mut Vec<f32>) {
        if let Some(rx) = self.scope_rx.as_mut() {
            while let Ok(sample) = rx.pop() {
                out.push(sample);
            }
        }
    }
}
