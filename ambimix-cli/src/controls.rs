use std::time::Duration;

use ambimix_lib::catalog::{all_sounds, SoundItem};
use ambimix_lib::mix::MixStore;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{info, warn};

const VOLUME_STEP: u8 = 5;

pub struct StatusSnapshot {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Toggle,
    SoundDown,
    SoundUp,
    MasterDown,
    MasterUp,
    Mute,
    Fade,
    NextPreset,
    SavePreset,
    StopAll,
    Favorite,
    Alarm,
    CycleSource,
    Quit,
}

pub fn action_for(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Char(' ') | KeyCode::Enter => Action::Toggle,
        KeyCode::Left => Action::SoundDown,
        KeyCode::Right => Action::SoundUp,
        KeyCode::Char('-') => Action::MasterDown,
        KeyCode::Char('=') | KeyCode::Char('+') => Action::MasterUp,
        KeyCode::Char('m') | KeyCode::Char('M') => Action::Mute,
        KeyCode::Char('f') | KeyCode::Char('F') => Action::Fade,
        KeyCode::Char('p') | KeyCode::Char('P') => Action::NextPreset,
        KeyCode::Char('s') | KeyCode::Char('S') => Action::SavePreset,
        KeyCode::Char('x') | KeyCode::Char('X') => Action::StopAll,
        KeyCode::Char('*') => Action::Favorite,
        KeyCode::Char('a') | KeyCode::Char('A') => Action::Alarm,
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::CycleSource,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Cursor state owned by the TUI loop.
#[derive(Debug, Default)]
pub struct TuiState {
    pub selected: usize,
    pub next_preset: usize,
    pub message: Option<String>,
}

impl TuiState {
    pub fn selected_sound(&self) -> &'static SoundItem {
        let sounds = all_sounds();
        &sounds[self.selected.min(sounds.len() - 1)]
    }
}

/// Apply one action. Returns false when the loop should end.
pub fn apply(action: Action, store: &mut MixStore, state: &mut TuiState) -> bool {
    let sound = state.selected_sound();
    match action {
        Action::Quit => return false,
        Action::Up => state.selected = state.selected.saturating_sub(1),
        Action::Down => state.selected = (state.selected + 1).min(all_sounds().len() - 1),
        Action::Toggle => match store.toggle_ambient(sound.id) {
            Ok(true) => state.message = Some(format!("{} on", sound.label)),
            Ok(false) => state.message = Some(format!("{} off", sound.label)),
            Err(err) => state.message = Some(err.to_string()),
        },
        Action::SoundDown | Action::SoundUp => {
            if let Some(volume) = store.sound_volume(sound.id) {
                let next = if action == Action::SoundUp {
                    volume.saturating_add(VOLUME_STEP).min(100)
                } else {
                    volume.saturating_sub(VOLUME_STEP)
                };
                store.set_sound_volume(sound.id, next);
            }
        }
        Action::MasterDown => {
            let master = store.settings().master_volume.saturating_sub(VOLUME_STEP);
            store.set_master_volume(master);
        }
        Action::MasterUp => {
            let master = store.settings().master_volume.saturating_add(VOLUME_STEP);
            store.set_master_volume(master.min(100));
        }
        Action::Mute => {
            store.toggle_mute();
        }
        Action::Fade => {
            let fade = !store.settings().fade_in_out;
            store.set_fade_in_out(fade);
        }
        Action::NextPreset => {
            let presets = store.all_presets();
            if let Some(preset) = presets.get(state.next_preset % presets.len().max(1)) {
                let report = store.load_preset(preset);
                state.message = Some(format!(
                    "{}: {} playing, {} skipped",
                    preset.name,
                    report.started.len(),
                    report.skipped.len()
                ));
            }
            state.next_preset = state.next_preset.wrapping_add(1);
        }
        Action::SavePreset => {
            let name = format!("Mix {}", store.user_presets().len() + 1);
            state.message = Some(match store.save_preset(&name, None) {
                Ok(preset) => format!("saved {}", preset.name),
                Err(err) => err.to_string(),
            });
        }
        Action::StopAll => store.stop_all_ambient(),
        Action::Favorite => {
            store.toggle_favorite(sound.id);
        }
        Action::Alarm => {
            if let Err(err) = store.play_alarm() {
                warn!("alarm: {}", err);
                state.message = Some(err.to_string());
            }
        }
        Action::CycleSource => {
            let next = store.settings().active_source.next();
            store.set_active_source(next);
            info!("source: {}", next.as_str());
        }
    }
    true
}

pub fn handle_key_event(store: &mut MixStore, state: &mut TuiState) -> bool {
    if event::poll(Duration::from_millis(100)).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                return true;
            }
            if let Some(action) = action_for(key.code) {
                return apply(action, store, state);
            }
        }
    }

    true
}

/// One line per catalog sound: marker, favorite, label, category, level.
pub fn sound_rows(store: &MixStore) -> Vec<String> {
    all_sounds()
        .iter()
        .map(|sound| {
            let marker = if store.is_active(sound.id) { "●" } else { "○" };
            let favorite = if store.is_favorite(sound.id) { "*" } else { " " };
            let level = store
                .sound_volume(sound.id)
                .map(|volume| format!("{} {:>3}%", level_bar(volume), volume))
                .unwrap_or_default();
            format!(
                "{} {} {} {:<18} {:<9} {}",
                marker,
                favorite,
                sound.icon,
                sound.label,
                sound.category.label(),
                level
            )
        })
        .collect()
}

fn level_bar(volume: u8) -> String {
    let filled = (volume as usize + 5) / 10;
    format!("{}{}", "▮".repeat(filled), "▯".repeat(10 - filled.min(10)))
}

pub fn status_text(store: &MixStore, state: &TuiState) -> StatusSnapshot {
    let settings = store.settings();
    let playing = if store.is_playing() { "▶ Playing" } else { "⏸ Paused" };
    let now = store
        .now_playing()
        .map(|now| now.name.clone())
        .unwrap_or_else(|| "nothing".to_string());
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let active = if store.active_sounds().is_empty() {
        "-".to_string()
    } else {
        store
            .active_sounds()
            .iter()
            .map(|sound| format!("{} {}", sound.id, sound.volume))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let presets = store.all_presets();
    let next_preset = presets
        .get(state.next_preset % presets.len().max(1))
        .map(|preset| preset.name.as_str())
        .unwrap_or("-");

    let mut text = format!(
        "{}   now: {}\nmaster: {:>3}%  mute: {}  fade: {}  source: {}  output: {}\nactive: {}\nnext preset: {}  saved: {}",
        playing,
        now,
        settings.master_volume,
        on_off(settings.is_muted),
        on_off(settings.fade_in_out),
        settings.active_source.as_str(),
        store.engine().backend_name(),
        active,
        next_preset,
        store.user_presets().len()
    );
    if let Some(message) = &state.message {
        text.push('\n');
        text.push_str(message);
    }

    StatusSnapshot { text }
}
