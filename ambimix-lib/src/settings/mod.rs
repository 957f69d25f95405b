//! Persisted audio settings and the versioned state file.

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_ALARM;
use crate::mix::{AmbientSoundState, HistoryEntry, SoundPreset};

mod file;
pub mod migrate;

pub use file::{parse_state, LoadedState, StateFile};

/// Base name of the state file.
pub const STORAGE_KEY: &str = "audio-storage-v2";
/// Version written by [`StateFile::save`].
pub const STATE_VERSION: u32 = 4;

/// Which surface owns the primary display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSource {
    Ambient,
    Youtube,
    #[default]
    None,
}

impl ActiveSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveSource::Ambient => "ambient",
            ActiveSource::Youtube => "youtube",
            ActiveSource::None => "none",
        }
    }

    /// Cycle order used by the TUI.
    pub fn next(&self) -> Self {
        match self {
            ActiveSource::None => ActiveSource::Ambient,
            ActiveSource::Ambient => ActiveSource::Youtube,
            ActiveSource::Youtube => ActiveSource::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    pub master_volume: u8,
    pub is_muted: bool,
    pub fade_in_out: bool,
    pub active_source: ActiveSource,
    pub alarm_type: String,
    pub alarm_volume: u8,
    pub youtube_url: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 50,
            is_muted: false,
            fade_in_out: true,
            active_source: ActiveSource::None,
            alarm_type: DEFAULT_ALARM.to_string(),
            alarm_volume: 70,
            youtube_url: String::new(),
        }
    }
}

/// Partial update for [`AudioSettings`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioSettingsPatch {
    pub master_volume: Option<u8>,
    pub is_muted: Option<bool>,
    pub fade_in_out: Option<bool>,
    pub active_source: Option<ActiveSource>,
    pub alarm_type: Option<String>,
    pub alarm_volume: Option<u8>,
    pub youtube_url: Option<String>,
}

impl AudioSettings {
    /// Apply a patch, clamping volumes.
    pub fn apply(&mut self, patch: AudioSettingsPatch) {
        if let Some(volume) = patch.master_volume {
            self.master_volume = volume.min(100);
        }
        if let Some(muted) = patch.is_muted {
            self.is_muted = muted;
        }
        if let Some(fade) = patch.fade_in_out {
            self.fade_in_out = fade;
        }
        if let Some(source) = patch.active_source {
            self.active_source = source;
        }
        if let Some(alarm) = patch.alarm_type {
            self.alarm_type = alarm;
        }
        if let Some(volume) = patch.alarm_volume {
            self.alarm_volume = volume.min(100);
        }
        if let Some(url) = patch.youtube_url {
            self.youtube_url = url;
        }
    }
}

/// Everything that survives a restart. The active set is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedAudioState {
    pub audio_settings: AudioSettings,
    pub favorites: Vec<String>,
    pub recently_played: Vec<String>,
    pub audio_history: Vec<HistoryEntry>,
    pub presets: Vec<SoundPreset>,
    pub saved_ambient_state: Vec<AmbientSoundState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = AudioSettings::default();
        assert_eq!(settings.master_volume, 50);
        assert!(!settings.is_muted);
        assert!(settings.fade_in_out);
        assert_eq!(settings.active_source, ActiveSource::None);
        assert_eq!(settings.alarm_type, "bell");
        assert_eq!(settings.alarm_volume, 70);
        assert_eq!(settings.youtube_url, "");
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let mut settings = AudioSettings::default();
        settings.apply(AudioSettingsPatch {
            master_volume: Some(130),
            alarm_type: Some("gong".to_string()),
            ..AudioSettingsPatch::default()
        });
        assert_eq!(settings.master_volume, 100);
        assert_eq!(settings.alarm_type, "gong");
        assert_eq!(settings.alarm_volume, 70);
        assert!(settings.fade_in_out);
    }

    #[test]
    fn serializes_camel_case_without_active_sounds() {
        let json = serde_json::to_value(PersistedAudioState::default()).unwrap();
        assert_eq!(json["audioSettings"]["masterVolume"], 50);
        assert_eq!(json["audioSettings"]["activeSource"], "none");
        assert!(json.get("savedAmbientState").is_some());
        assert!(json.get("activeAmbientSounds").is_none());
    }

    #[test]
    fn source_cycle_visits_all() {
        let mut source = ActiveSource::None;
        let mut seen = vec![];
        for _ in 0..3 {
            source = source.next();
            seen.push(source.as_str());
        }
        assert_eq!(seen, ["ambient", "youtube", "none"]);
    }
}
