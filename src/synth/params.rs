//! Lock-free parameter snapshots from the control thread to the render thread.
//!
//! The control side owns a [`ParamWriter`]; the render side holds a
//! [`ParamReader`]. Every edit republishes the *whole* [`Params`] snapshot, so
//! the render thread either sees all of an edit or none of it.
//!
//! Publication uses a sequence counter over one atomic per scalar field:
//!
//! ```text
//!   writer                        reader (once per render batch)
//!   ------                        ------------------------------
//!   seq = odd    (Relaxed)        s1 = seq (Acquire)
//!   fence(Release)                if s1 is odd or unchanged -> keep snapshot
//!   store fields (Relaxed)        load fields (Relaxed)
//!   seq = even   (Release)        fence(Acquire); s2 = seq (Relaxed)
//!                                 if s1 != s2 -> keep snapshot, retry next batch
//! ```
//!
//! The reader never spins and never blocks; a snapshot that raced with a write
//! is discarded and picked up on the following batch.

use std::sync::atomic::{fence, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{EnvelopeParams, Waveform};

/// Settings for the downstream post-processing graph.
///
/// The voice never interprets these. They travel through the same snapshot as
/// the voice parameters so the host graph sees them change in step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSettings {
    /// Low-pass cutoff in Hz
    pub filter_cutoff_hz: f32,
    /// Filter resonance (bandwidth)
    pub filter_resonance: f32,
    /// Reverb wet amount, 0.0 - 1.0
    pub reverb_wet: f32,
    /// Master output volume, 0.0 - 1.0
    pub master_volume: f32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            filter_cutoff_hz: 1_000.0,
            filter_resonance: 0.5,
            reverb_wet: 0.2,
            master_volume: 0.7,
        }
    }
}

/// Every control-writable value, published as one unit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Params {
    pub waveform: Waveform,
    pub envelope: EnvelopeParams,
    pub output: OutputSettings,
}

struct SharedParams {
    seq: AtomicU64,
    waveform: AtomicU32,
    attack: AtomicU32,
    decay: AtomicU32,
    sustain: AtomicU32,
    release: AtomicU32,
    filter_cutoff_hz: AtomicU32,
    filter_resonance: AtomicU32,
    reverb_wet: AtomicU32,
    master_volume: AtomicU32,
}

impl SharedParams {
    fn new(params: &Params) -> Self {
        let shared = Self {
            seq: AtomicU64::new(0),
            waveform: AtomicU32::new(0),
            attack: AtomicU32::new(0),
            decay: AtomicU32::new(0),
            sustain: AtomicU32::new(0),
            release: AtomicU32::new(0),
            filter_cutoff_hz: AtomicU32::new(0),
            filter_resonance: AtomicU32::new(0),
            reverb_wet: AtomicU32::new(0),
            master_volume: AtomicU32::new(0),
        };
        shared.store_fields(params);
        shared
    }

    fn store_fields(&self, params: &Params) {
        let store = |slot: &AtomicU32, value: f32| slot.store(value.to_bits(), Ordering::Relaxed);

        self.waveform
            .store(params.waveform.to_bits(), Ordering::Relaxed);
        store(&self.attack, params.envelope.attack);
        store(&self.decay, params.envelope.decay);
        store(&self.sustain, params.envelope.sustain);
        store(&self.release, params.envelope.release);
        store(&self.filter_cutoff_hz, params.output.filter_cutoff_hz);
        store(&self.filter_resonance, params.output.filter_resonance);
        store(&self.reverb_wet, params.output.reverb_wet);
        store(&self.master_volume, params.output.master_volume);
    }

    fn load_fields(&self) -> Params {
        let load = |slot: &AtomicU32| f32::from_bits(slot.load(Ordering::Relaxed));

        Params {
            waveform: Waveform::from_bits(self.waveform.load(Ordering::Relaxed)),
            envelope: EnvelopeParams {
                attack: load(&self.attack),
                decay: load(&self.decay),
                sustain: load(&self.sustain),
                release: load(&self.release),
            },
            output: OutputSettings {
                filter_cutoff_hz: load(&self.filter_cutoff_hz),
                filter_resonance: load(&self.filter_resonance),
                reverb_wet: load(&self.reverb_wet),
                master_volume: load(&self.master_volume),
            },
        }
    }
}

/// Constructor namespace for the writer/reader pair.
pub struct ParameterChannel;

impl ParameterChannel {
    /// Create a channel seeded with `initial` (envelope values are clamped).
    pub fn new(initial: Params) -> (ParamWriter, ParamReader) {
        let writer = ParamWriter::new(initial);
        let reader = writer.subscribe();
        (writer, reader)
    }
}

/// Control-side end of the channel.
///
/// There is exactly one writer per channel: it is not `Clone`, and every
/// mutation takes `&mut self`.
pub struct ParamWriter {
    shared: Arc<SharedParams>,
    current: Params,
}

impl ParamWriter {
    fn new(initial: Params) -> Self {
        let current = Params {
            envelope: initial.envelope.sanitized(),
            ..initial
        };
        Self {
            shared: Arc::new(SharedParams::new(&current)),
            current,
        }
    }

    /// A new render-side reader starting from the latest published snapshot.
    pub fn subscribe(&self) -> ParamReader {
        ParamReader {
            shared: Arc::clone(&self.shared),
            current: self.current,
            last_seq: self.shared.seq.load(Ordering::Acquire),
        }
    }

    /// The snapshot most recently published.
    pub fn current(&self) -> &Params {
        &self.current
    }

    /// Publish a complete snapshot. Envelope values are clamped first.
    pub fn publish(&mut self, params: Params) {
        let sanitized = Params {
            envelope: params.envelope.sanitized(),
            ..params
        };
        if sanitized.envelope != params.envelope {
            tracing::debug!(
                requested = ?params.envelope,
                applied = ?sanitized.envelope,
                "envelope parameters clamped"
            );
        }
        self.current = sanitized;

        let seq = self.shared.seq.load(Ordering::Relaxed);
        self.shared.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        self.shared.store_fields(&self.current);
        self.shared.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    fn update(&mut self, edit: impl FnOnce(&mut Params)) {
        let mut next = self.current;
        edit(&mut next);
        self.publish(next);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.update(|p| p.waveform = waveform);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.update(|p| p.envelope.attack = seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.update(|p| p.envelope.decay = seconds);
    }

    pub fn set_sustain(&mut self, level: f32) {
        self.update(|p| p.envelope.sustain = level);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.update(|p| p.envelope.release = seconds);
    }

    pub fn set_filter_cutoff(&mut self, hz: f32) {
        self.update(|p| p.output.filter_cutoff_hz = hz);
    }

    pub fn set_filter_resonance(&mut self, resonance: f32) {
        self.update(|p| p.output.filter_resonance = resonance);
    }

    pub fn set_reverb_wet(&mut self, wet: f32) {
        self.update(|p| p.output.reverb_wet = wet);
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.update(|p| p.output.master_volume = volume);
    }
}

/// Render-side end of the channel.
///
/// `poll` is wait-free: a fixed number of atomic loads, no retries.
pub struct ParamReader {
    shared: Arc<SharedParams>,
    current: Params,
    last_seq: u64,
}

impl ParamReader {
    /// Pick up the latest complete snapshot, if there is a new one.
    ///
    /// Returns `true` when `current()` changed. A snapshot that overlapped a
    /// write is ignored; the previous one stays in effect until the next poll.
    #[inline]
    pub fn poll(&mut self) -> bool {
        let before = self.shared.seq.load(Ordering::Acquire);
        if before == self.last_seq || before & 1 == 1 {
            return false;
        }

        let snapshot = self.shared.load_fields();

        fence(Ordering::Acquire);
        let after = self.shared.seq.load(Ordering::Relaxed);
        if before != after {
            return false;
        }

        self.current = snapshot;
        self.last_seq = before;
        true
    }

    pub fn current(&self) -> &Params {
        &self.current
    }
}
