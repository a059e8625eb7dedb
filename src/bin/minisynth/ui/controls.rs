//! Parameter panel: one row per slider, with its range and step

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use minisynth::{Params, SynthHandle};

/// One adjustable parameter with its range and step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Attack,
    Decay,
    Sustain,
    Release,
    Cutoff,
    Resonance,
    Reverb,
    Volume,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Attack,
        Control::Decay,
        Control::Sustain,
        Control::Release,
        Control::Cutoff,
        Control::Resonance,
        Control::Reverb,
        Control::Volume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Attack => "Attack",
            Control::Decay => "Decay",
            Control::Sustain => "Sustain",
            Control::Release => "Release",
            Control::Cutoff => "Cutoff",
            Control::Resonance => "Resonance",
            Control::Reverb => "Reverb",
            Control::Volume => "Volume",
        }
    }

    /// (min, max, step)
    fn range(self) -> (f32, f32, f32) {
        match self {
            Control::Attack | Control::Decay => (0.01, 2.0, 0.01),
            Control::Sustain => (0.0, 1.0, 0.05),
            Control::Release => (0.01, 3.0, 0.05),
            Control::Cutoff => (100.0, 5_000.0, 100.0),
            Control::Resonance => (0.1, 2.0, 0.1),
            Control::Reverb | Control::Volume => (0.0, 1.0, 0.05),
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Control::Attack | Control::Decay | Control::Release => "s",
            Control::Cutoff => "Hz",
            _ => "",
        }
    }

    pub fn value(self, params: &Params) -> f32 {
        match self {
            Control::Attack => params.envelope.attack,
            Control::Decay => params.envelope.decay,
            Control::Sustain => params.envelope.sustain,
            Control::Release => params.envelope.release,
            Control::Cutoff => params.output.filter_cutoff_hz,
            Control::Resonance => params.output.filter_resonance,
            Control::Reverb => params.output.reverb_wet,
            Control::Volume => params.output.master_volume,
        }
    }

    /// Move the value `steps` steps, staying inside the control's range.
    pub fn nudge(self, handle: &mut SynthHandle, steps: i32) {
        let (min, max, step) = self.range();
        let value = (self.value(handle.params()) + steps as f32 * step).clamp(min, max);

        match self {
            Control::Attack => handle.set_attack(value),
            Control::Decay => handle.set_decay(value),
            Control::Sustain => handle.set_sustain(value),
            Control::Release => handle.set_release(value),
            Control::Cutoff => handle.set_filter_cutoff(value),
            Control::Resonance => handle.set_filter_resonance(value),
            Control::Reverb => handle.set_reverb_wet(value),
            Control::Volume => handle.set_master_volume(value),
        }
    }

    /// Position inside the range, 0.0 - 1.0
    fn fraction(self, params: &Params) -> f32 {
        let (min, max, _) = self.range();
        ((self.value(params) - min) / (max - min)).clamp(0.0, 1.0)
    }
}

const BAR_WIDTH: usize = 20;

/// Render the parameter table, highlighting the selected row
pub fn render_controls(frame: &mut Frame, area: Rect, params: &Params, selected: usize) {
    let rows = Control::ALL.iter().enumerate().map(|(i, control)| {
        let filled = (control.fraction(params) * BAR_WIDTH as f32).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        let value = format!("{:.2} {}", control.value(params), control.unit());

        let style = if i == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(control.label()),
            Cell::from(bar).style(Style::default().fg(Color::Cyan)),
            Cell::from(value),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(BAR_WIDTH as u16 + 1),
            Constraint::Min(10),
        ],
    )
    .block(
        Block::default()
            .title(format!(" {} ", params.waveform.name()))
            .borders(Borders::ALL),
    );

    frame.render_widget(table, area);
}
