use serde::{Deserialize, Serialize};

/// One active ambient sound and its own volume (0-100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientSoundState {
    pub id: String,
    pub volume: u8,
}

impl AmbientSoundState {
    pub fn new(id: &str, volume: u8) -> Self {
        Self {
            id: id.to_string(),
            volume: volume.min(100),
        }
    }
}

/// Named snapshot of ambient sounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPreset {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub sounds: Vec<AmbientSoundState>,
    #[serde(default)]
    pub is_built_in: bool,
}

/// Kind of thing shown as now playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    Ambient,
    Youtube,
}

impl AudioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioKind::Ambient => "ambient",
            AudioKind::Youtube => "youtube",
        }
    }
}

/// Derived display projection. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub kind: AudioKind,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vn: Option<String>,
    pub volume: u8,
    pub is_playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// A non-ambient primary selection, such as a video or playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainSource {
    pub kind: AudioKind,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vn: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// Listening history record, most recent first in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(alias = "type")]
    pub kind: AudioKind,
    pub id: String,
    pub name: String,
    #[serde(default, alias = "timestamp")]
    pub started_at: u64,
    #[serde(default, alias = "duration")]
    pub listened_secs: f64,
}

/// Outcome of loading a preset or restoring a saved mix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetLoadReport {
    pub started: Vec<String>,
    pub skipped: Vec<String>,
}

/// Aggregate numbers for a stats view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStats {
    pub total_play_time: f64,
    pub favorite_count: usize,
    pub most_played_type: String,
    pub recent_activity: Vec<String>,
}
