use thiserror::Error;

/// Error type shared by the catalog, engine, store and persistence layers.
#[derive(Debug, Error)]
pub enum MixerError {
    #[error("unknown sound: {0}")]
    UnknownSound(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("preset {0} is built in and cannot be changed")]
    BuiltInPreset(String),
    #[error("cannot save a preset without active sounds")]
    NoActiveSounds,
    #[error("preset name cannot be empty")]
    EmptyPresetName,
    #[error("maximum of {0} user presets reached")]
    PresetLimit(usize),
    #[error("failed to load {id}: {reason}")]
    ResourceLoad { id: String, reason: String },
    #[error("output stream error: {0}")]
    OutputStream(String),
    #[error("probe error: {0}")]
    Probe(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MixerError {
    pub(crate) fn resource_load(id: &str, reason: impl ToString) -> Self {
        Self::ResourceLoad {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
