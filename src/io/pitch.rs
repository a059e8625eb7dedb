/// The twelve pitch classes of one octave, starting at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteName {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Octave-zero frequencies (C0 - B0) of the on-screen keyboard table.
const OCTAVE_ZERO_HZ: [f32; 12] = [
    16.35, 17.32, 18.35, 19.45, 20.60, 21.83, 23.12, 24.50, 25.96, 27.50, 29.14, 30.87,
];

/// Highest octave on the keyboard (C0 - B7).
pub const MAX_OCTAVE: u8 = 7;

impl NoteName {
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::CSharp,
        NoteName::D,
        NoteName::DSharp,
        NoteName::E,
        NoteName::F,
        NoteName::FSharp,
        NoteName::G,
        NoteName::GSharp,
        NoteName::A,
        NoteName::ASharp,
        NoteName::B,
    ];

    /// Semitones above C.
    pub fn semitone(self) -> u8 {
        self as u8
    }

    pub fn is_black(self) -> bool {
        matches!(
            self,
            NoteName::CSharp | NoteName::DSharp | NoteName::FSharp | NoteName::GSharp | NoteName::ASharp
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::CSharp => "C#",
            NoteName::D => "D",
            NoteName::DSharp => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::FSharp => "F#",
            NoteName::G => "G",
            NoteName::GSharp => "G#",
            NoteName::A => "A",
            NoteName::ASharp => "A#",
            NoteName::B => "B",
        }
    }
}

/// Keyboard frequency of `note` in `octave`. Octaves above 7 are clamped.
pub fn note_frequency(note: NoteName, octave: u8) -> f32 {
    let octave = octave.min(MAX_OCTAVE);
    OCTAVE_ZERO_HZ[note.semitone() as usize] * (1u32 << octave) as f32
}

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
