// Purpose - external interfaces: the audio device, the post-processing seam
// and pitch conversion for hosts that think in notes

pub mod output;
pub mod pitch;
pub mod stage;

pub use output::{AudioOutput, OutputConfig, OutputError, StreamInfo};
pub use pitch::{midi_note_to_freq, note_frequency, NoteName};
pub use stage::{MasterGain, OutputStage};
