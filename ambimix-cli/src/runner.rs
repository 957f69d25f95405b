use std::io;

use ambimix_lib::mix::MixStore;
use ambimix_lib::playback::{AudioOutput, EngineConfig, PlaybackEngine};
use ambimix_lib::settings::{PersistedAudioState, StateFile};
use ambimix_lib::MixerError;
use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::cli::commands;
use crate::config::Config;
use crate::controls::{self, TuiState};
use crate::logging::{self, LogBuffer};
use crate::ui;

pub fn run(args: &ArgMatches, log_buffer: LogBuffer) -> Result<i32, MixerError> {
    let config = Config::from_args(args);
    match args.subcommand() {
        Some(("catalog", sub)) => commands::run_catalog(sub),
        Some(("presets", sub)) => commands::run_presets(sub, &config),
        Some(("alarms", _)) => commands::run_alarms(),
        Some(("check", _)) => commands::run_check(&config),
        Some(("state", sub)) => commands::run_state(sub, &config),
        _ => run_mixer(args, &config, log_buffer),
    }
}

fn run_mixer(args: &ArgMatches, config: &Config, log_buffer: LogBuffer) -> Result<i32, MixerError> {
    info!("starting ambimix, sounds in {}", config.sounds_dir.display());
    let state_file = StateFile::in_dir(&config.state_dir);
    let persisted = match state_file.load() {
        Ok(loaded) => loaded.state,
        Err(err) => {
            warn!("ignoring unreadable state file: {}", err);
            PersistedAudioState::default()
        }
    };

    let output = if args.get_flag("silent") {
        AudioOutput::silent()
    } else {
        AudioOutput::open_default_or_silent()
    };
    let engine = PlaybackEngine::new(output.backend(), EngineConfig::default());
    let mut store = MixStore::restore(engine, &config.sounds_dir, persisted);
    if let Some(id) = args.get_one::<String>("preset") {
        store.load_preset_by_id(id)?;
    }

    let _raw_mode = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    let _ = execute!(stdout, EnterAlternateScreen, cursor::Hide);
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let stderr_guard = logging::capture_stderr(log_buffer.clone());

    // UI / input loop.
    let mut state = TuiState::default();
    loop {
        let rows = controls::sound_rows(&store);
        let status = controls::status_text(&store, &state);
        let log_lines = logging::snapshot(&log_buffer);
        ui::draw(&mut terminal, &rows, state.selected, &status, &log_lines);

        if !controls::handle_key_event(&mut store, &mut state) {
            break;
        }
    }

    drop(stderr_guard);
    let _ = terminal.show_cursor();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show);

    store.engine().release_all();
    state_file.save(&store.snapshot())?;
    info!("state saved to {}", state_file.path().display());
    Ok(0)
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
