//! minisynth - play the voice from the terminal
//!
//! Run with: cargo run
//! Logs go to `minisynth.log` in the temp dir (filter with RUST_LOG).

mod app;
mod ui;

use std::{fs::File, io::stdout, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};
use tracing_subscriber::EnvFilter;

use app::Player;
use minisynth::{io::OutputConfig, SynthConfig};
use ui::UiApp;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut player = Player::new(SynthConfig::default(), OutputConfig::default());
    // A failed start is shown in the status bar and can be retried with [P]
    player.start();

    let mut terminal = ratatui::init();

    // Key release events need the kitty keyboard protocol
    let key_release = supports_keyboard_enhancement().unwrap_or(false);
    if key_release {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::info!(key_release, "terminal ready");

    let result = UiApp::new(player, key_release).run(&mut terminal);

    if key_release {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    ratatui::restore();
    result
}

fn init_logging() -> EyreResult<()> {
    let path = std::env::temp_dir().join("minisynth.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(log = %path.display(), "starting minisynth");
    Ok(())
}
