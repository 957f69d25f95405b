//! Upgrades stored state to the current schema.
//!
//! Works on raw JSON: older shapes are rewritten step by step, then every
//! field is read leniently. Missing fields fall back to defaults and junk
//! entries are dropped, so a damaged file never fails a load.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::{ActiveSource, AudioSettings, PersistedAudioState, STATE_VERSION};
use crate::mix::{
    AmbientSoundState, HistoryEntry, SoundPreset, DEFAULT_SOUND_VOLUME as LEGACY_SOUND_VOLUME,
    MAX_HISTORY, MAX_RECENT, MAX_USER_PRESETS,
};

const DEPRECATED_SETTINGS: &[&str] = &[
    "selectedAmbientSound",
    "selectedTab",
    "selectedNotificationSound",
    "notificationVolume",
];

/// Bring `state`, stored at `from_version`, up to [`STATE_VERSION`].
pub fn migrate(state: Value, from_version: u32) -> PersistedAudioState {
    let mut root = match state {
        Value::Object(map) => map,
        other => {
            warn!("stored state is not an object ({}), using defaults", other);
            Map::new()
        }
    };

    if from_version > STATE_VERSION {
        warn!(
            "state version {} is newer than {}, loading what is understood",
            from_version, STATE_VERSION
        );
    }
    if from_version < 3 {
        info!("migrating stored state v{} -> v3", from_version);
        to_v3(&mut root);
    }
    if from_version < 4 {
        info!("migrating stored state v{} -> v4", from_version.max(3));
        to_v4(&mut root);
    }

    read_state(&root)
}

fn to_v3(root: &mut Map<String, Value>) {
    if let Some(Value::Array(items)) = root.get_mut("activeAmbientSounds") {
        for item in items.iter_mut() {
            if let Value::String(id) = item {
                *item = serde_json::json!({ "id": id.clone(), "volume": LEGACY_SOUND_VOLUME });
            }
        }
    }

    let settings = root
        .entry("audioSettings")
        .or_insert_with(|| Value::Object(Map::new()));
    if !settings.is_object() {
        *settings = Value::Object(Map::new());
    }
    if let Value::Object(settings) = settings {
        if let Some(volume) = settings.remove("volume") {
            settings.insert("masterVolume".to_string(), volume);
        }
        let defaults = AudioSettings::default();
        let missing = |settings: &Map<String, Value>, key: &str| {
            settings
                .get(key)
                .map_or(true, |value| value.is_null() || value == "")
        };
        if missing(settings, "activeSource") {
            settings.insert(
                "activeSource".to_string(),
                Value::from(ActiveSource::None.as_str()),
            );
        }
        if missing(settings, "alarmType") {
            settings.insert("alarmType".to_string(), Value::from(defaults.alarm_type));
        }
        if settings.get("alarmVolume").map_or(true, Value::is_null) {
            settings.insert("alarmVolume".to_string(), Value::from(defaults.alarm_volume));
        }
        for key in DEPRECATED_SETTINGS {
            settings.remove(*key);
        }
    }

    root.entry("presets")
        .or_insert_with(|| Value::Array(Vec::new()));
    root.entry("savedAmbientState")
        .or_insert_with(|| Value::Array(Vec::new()));
}

/// The active set stops being persisted. A non-empty list is kept as the
/// saved state so the user can restore it; it is never auto-played.
fn to_v4(root: &mut Map<String, Value>) {
    let Some(active) = root.remove("activeAmbientSounds") else {
        return;
    };
    let saved_is_empty = match root.get("savedAmbientState") {
        Some(Value::Array(items)) => items.is_empty(),
        _ => true,
    };
    let has_active = matches!(&active, Value::Array(items) if !items.is_empty());
    if saved_is_empty && has_active {
        debug!("moving persisted active sounds into the saved ambient state");
        root.insert("savedAmbientState".to_string(), active);
    }
}

fn read_state(root: &Map<String, Value>) -> PersistedAudioState {
    PersistedAudioState {
        audio_settings: root
            .get("audioSettings")
            .map(read_settings)
            .unwrap_or_default(),
        favorites: read_ids(root.get("favorites"), usize::MAX),
        recently_played: read_ids(root.get("recentlyPlayed"), MAX_RECENT),
        audio_history: read_history(root.get("audioHistory")),
        presets: read_presets(root.get("presets")),
        saved_ambient_state: root
            .get("savedAmbientState")
            .map(read_sounds)
            .unwrap_or_default(),
    }
}

fn read_settings(value: &Value) -> AudioSettings {
    let mut settings = AudioSettings::default();
    let Value::Object(map) = value else {
        warn!("audioSettings is not an object, using defaults");
        return settings;
    };

    if let Some(volume) = map.get("masterVolume").and_then(read_volume) {
        settings.master_volume = volume;
    }
    if let Some(muted) = map.get("isMuted").and_then(Value::as_bool) {
        settings.is_muted = muted;
    }
    if let Some(fade) = map.get("fadeInOut").and_then(Value::as_bool) {
        settings.fade_in_out = fade;
    }
    if let Some(source) = map.get("activeSource") {
        match serde_json::from_value::<ActiveSource>(source.clone()) {
            Ok(source) => settings.active_source = source,
            Err(_) => warn!("unknown activeSource {}, using none", source),
        }
    }
    if let Some(alarm) = map.get("alarmType").and_then(Value::as_str) {
        if !alarm.is_empty() {
            settings.alarm_type = alarm.to_string();
        }
    }
    if let Some(volume) = map.get("alarmVolume").and_then(read_volume) {
        settings.alarm_volume = volume;
    }
    if let Some(url) = map.get("youtubeUrl").and_then(Value::as_str) {
        settings.youtube_url = url.to_string();
    }
    settings
}

/// Integer percentage from a number or numeric string, clamped to 0..=100.
fn read_volume(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

fn read_ids(value: Option<&Value>, limit: usize) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(Value::as_str)
        .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Sound list in either the legacy string form or `{ id, volume }` form.
/// Silent and duplicate entries are dropped.
fn read_sounds(value: &Value) -> Vec<AmbientSoundState> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    let mut sounds: Vec<AmbientSoundState> = Vec::new();
    for item in items {
        let entry = match item {
            Value::String(id) => Some(AmbientSoundState::new(id, LEGACY_SOUND_VOLUME)),
            Value::Object(map) => map.get("id").and_then(Value::as_str).map(|id| {
                let volume = map
                    .get("volume")
                    .and_then(read_volume)
                    .unwrap_or(LEGACY_SOUND_VOLUME);
                AmbientSoundState::new(id, volume)
            }),
            _ => None,
        };
        match entry {
            Some(sound) if !sound.id.is_empty() && sound.volume > 0 => {
                if !sounds.iter().any(|existing| existing.id == sound.id) {
                    sounds.push(sound);
                }
            }
            _ => debug!("dropping malformed sound entry {}", item),
        }
    }
    sounds
}

fn read_history(value: Option<&Value>) -> Vec<HistoryEntry> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let mut history: Vec<HistoryEntry> = Vec::new();
    for item in items {
        match serde_json::from_value::<HistoryEntry>(item.clone()) {
            Ok(mut entry) => {
                if history.iter().any(|existing| existing.id == entry.id) {
                    continue;
                }
                if !entry.listened_secs.is_finite() || entry.listened_secs < 0.0 {
                    entry.listened_secs = 0.0;
                }
                history.push(entry);
            }
            Err(err) => debug!("dropping history entry: {}", err),
        }
        if history.len() == MAX_HISTORY {
            break;
        }
    }
    history
}

fn read_presets(value: Option<&Value>) -> Vec<SoundPreset> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let mut presets: Vec<SoundPreset> = Vec::new();
    for item in items {
        let Value::Object(map) = item else {
            continue;
        };
        let (Some(id), Some(name)) = (
            map.get("id").and_then(Value::as_str),
            map.get("name").and_then(Value::as_str),
        ) else {
            debug!("dropping preset without id or name");
            continue;
        };
        if map.get("isBuiltIn").and_then(Value::as_bool) == Some(true) {
            continue;
        }
        if presets.iter().any(|preset| preset.id == id) {
            continue;
        }
        let sounds = map.get("sounds").map(read_sounds).unwrap_or_default();
        if sounds.is_empty() {
            debug!("dropping empty preset {}", id);
            continue;
        }
        presets.push(SoundPreset {
            id: id.to_string(),
            name: name.to_string(),
            icon: map.get("icon").and_then(Value::as_str).map(str::to_string),
            sounds,
            is_built_in: false,
        });
    }
    if presets.len() > MAX_USER_PRESETS {
        warn!(
            "{} stored presets, keeping the first {}",
            presets.len(),
            MAX_USER_PRESETS
        );
        presets.truncate(MAX_USER_PRESETS);
    }
    presets
}
