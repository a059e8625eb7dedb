//! TUI module for minisynth
//!
//! Keyboard in, scope out. Everything here runs on the control thread.

mod controls;
mod keyboard;
mod scope;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use std::time::Duration;

use minisynth::{io::pitch::MAX_OCTAVE, io::note_frequency, Waveform};

use super::app::{Player, Status};
use controls::{render_controls, Control};
use keyboard::{note_for_key, render_keyboard};
use scope::render_scope;

/// Samples shown by the scope
const SCOPE_WINDOW: usize = 1024;

pub struct UiApp {
    player: Player,
    /// Whether the terminal reports key releases
    key_release: bool,
    scope: Vec<f32>,
    octave: u8,
    selected: usize,
    /// Piano key currently sounding
    held: Option<char>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(player: Player, key_release: bool) -> Self {
        Self {
            player,
            key_release,
            scope: vec![0.0; SCOPE_WINDOW],
            octave: 4,
            selected: 0,
            held: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        self.player.handle().note_off();
        Ok(())
    }

    /// Keep the last SCOPE_WINDOW samples
    fn poll_scope(&mut self) {
        self.player.drain_scope(&mut self.scope);
        if self.scope.len() > SCOPE_WINDOW {
            let excess = self.scope.len() - SCOPE_WINDOW;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => self.on_press(key.code),
            KeyEventKind::Release => self.on_release(key.code),
            KeyEventKind::Repeat => {}
        }
    }

    fn on_press(&mut self, code: KeyCode) {
        let handle = self.player.handle();

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                handle.note_off();
                self.held = None;
            }
            KeyCode::Char('z') => self.octave = self.octave.saturating_sub(1),
            KeyCode::Char('x') => self.octave = (self.octave + 1).min(MAX_OCTAVE),
            KeyCode::Char('1') => handle.set_waveform(Waveform::Sine),
            KeyCode::Char('2') => handle.set_waveform(Waveform::Square),
            KeyCode::Char('3') => handle.set_waveform(Waveform::Sawtooth),
            KeyCode::Tab => {
                let next = handle.params().waveform.next();
                handle.set_waveform(next);
            }
            KeyCode::Up => {
                self.selected = (self.selected + Control::ALL.len() - 1) % Control::ALL.len();
            }
            KeyCode::Down => self.selected = (self.selected + 1) % Control::ALL.len(),
            KeyCode::Left => Control::ALL[self.selected].nudge(handle, -1),
            KeyCode::Right => Control::ALL[self.selected].nudge(handle, 1),
            KeyCode::Char('p') | KeyCode::Char('P') => self.player.start(),
            KeyCode::Char(c) => {
                let key = c.to_ascii_lowercase();
                // Without release events, auto-repeat arrives as fresh presses
                if !self.key_release && self.held == Some(key) {
                    return;
                }
                if let Some((note, octave)) = note_for_key(key, self.octave) {
                    handle.note_on(note_frequency(note, octave));
                    self.held = Some(key);
                }
            }
            _ => {}
        }
    }

    fn on_release(&mut self, code: KeyCode) {
        if let KeyCode::Char(c) = code {
            // Only the key that started the current note stops it
            if self.held == Some(c.to_ascii_lowercase()) {
                self.player.handle().note_off();
                self.held = None;
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Status
                Constraint::Length(10), // Controls
                Constraint::Length(4),  // Keyboard
                Constraint::Min(6),     // Scope
                Constraint::Length(1),  // Help bar
            ])
            .split(frame.area());

        self.render_status(frame, chunks[0]);

        let params = *self.player.handle().params();
        render_controls(frame, chunks[1], &params, self.selected);
        render_keyboard(frame, chunks[2], self.octave, self.held);
        render_scope(frame, chunks[3], &self.scope);

        let release_hint = if self.key_release {
            "release key"
        } else {
            "[Space]"
        };
        let help = Paragraph::new(format!(
            " [Q] Quit  [1/2/3/Tab] Wave  [↑↓] Select  [←→] Adjust  Note off: {}  [P] Audio",
            release_hint
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let span = match self.player.status() {
            Status::Running(info) => Span::styled(
                format!(
                    " ▶ {:.1}kHz  {} ch",
                    info.sample_rate / 1000.0,
                    info.channels
                ),
                Style::default().fg(Color::Green),
            ),
            Status::Stopped => Span::styled(" ⏸ No audio  [P] start", Style::default().fg(Color::Yellow)),
            Status::Failed(err) => Span::styled(
                format!(" ✖ {}  [P] retry", err),
                Style::default().fg(Color::Red),
            ),
        };

        frame.render_widget(Paragraph::new(Line::from(vec![span])), area);
    }
}
