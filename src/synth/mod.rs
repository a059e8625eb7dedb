// Purpose: the single voice and the boundary between control and render threads
// The control side holds a SynthHandle, the audio callback owns the Renderer

pub mod config;
pub mod engine;
pub mod handle;
pub mod message;
pub mod params;

pub use config::SynthConfig;
pub use engine::{VoiceEngine, VoiceState};
pub use handle::{voice, Renderer, SynthHandle, NOTE_QUEUE_SIZE};
pub use message::NoteEvent;
pub use params::{OutputSettings, ParamReader, ParamWriter, ParameterChannel, Params};
