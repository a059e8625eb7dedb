/// Note events queued by the control thread and applied by the render thread
/// at the start of the next batch, stamped with the sample clock at that time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NoteEvent {
    NoteOn { frequency_hz: f32 },
    NoteOff,
}
