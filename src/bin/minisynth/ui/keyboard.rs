//! Computer-keyboard piano: one octave plus the next C

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use minisynth::io::{pitch::MAX_OCTAVE, NoteName};

/// (key, note, octave offset)
const KEYS: [(char, NoteName, u8); 13] = [
    ('a', NoteName::C, 0),
    ('w', NoteName::CSharp, 0),
    ('s', NoteName::D, 0),
    ('e', NoteName::DSharp, 0),
    ('d', NoteName::E, 0),
    ('f', NoteName::F, 0),
    ('t', NoteName::FSharp, 0),
    ('g', NoteName::G, 0),
    ('y', NoteName::GSharp, 0),
    ('h', NoteName::A, 0),
    ('u', NoteName::ASharp, 0),
    ('j', NoteName::B, 0),
    ('k', NoteName::C, 1),
];

/// Note played by `key` with the keyboard at `octave`.
pub fn note_for_key(key: char, octave: u8) -> Option<(NoteName, u8)> {
    KEYS.iter()
        .find(|(k, _, _)| *k == key.to_ascii_lowercase())
        .map(|&(_, note, offset)| (note, (octave + offset).min(MAX_OCTAVE)))
}

pub fn render_keyboard(frame: &mut Frame, area: Rect, octave: u8, held: Option<char>) {
    let block = Block::default()
        .title(format!(" Octave {}  [Z/X] ", octave))
        .borders(Borders::ALL);

    let keys: Vec<Span> = KEYS
        .iter()
        .map(|&(key, note, offset)| {
            let label = format!(" {}{} ", note.label(), octave + offset);
            let mut style = if note.is_black() {
                Style::default().fg(Color::White).bg(Color::Black)
            } else {
                Style::default().fg(Color::Black).bg(Color::Gray)
            };
            if held == Some(key) {
                style = style.bg(Color::Green).add_modifier(Modifier::BOLD);
            }
            Span::styled(label, style)
        })
        .collect();

    let hints: Vec<Span> = KEYS
        .iter()
        .map(|&(key, note, _)| {
            let width = note.label().len() + 3;
            Span::styled(
                format!("{:^width$}", key.to_ascii_uppercase(), width = width),
                Style::default().fg(Color::DarkGray),
            )
        })
        .collect();

    let paragraph = Paragraph::new(vec![Line::from(keys), Line::from(hints)]).block(block);
    frame.render_widget(paragraph, area);
}
