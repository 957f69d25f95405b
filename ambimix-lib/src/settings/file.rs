use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use super::migrate::migrate;
use super::{PersistedAudioState, STATE_VERSION, STORAGE_KEY};
use crate::MixerError;

/// Result of reading a state file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedState {
    pub state: PersistedAudioState,
    /// Version found on disk, `None` when the file did not exist.
    pub stored_version: Option<u32>,
}

impl LoadedState {
    pub fn migrated(&self) -> bool {
        self.stored_version.is_some_and(|version| version < STATE_VERSION)
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    state: &'a PersistedAudioState,
    version: u32,
}

/// The JSON file holding [`PersistedAudioState`] inside a versioned envelope.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/audio-storage-v2.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and migrate. A missing file yields the defaults.
    pub fn load(&self) -> Result<LoadedState, MixerError> {
        if !self.path.exists() {
            debug!("no state file at {}, using defaults", self.path.display());
            return Ok(LoadedState {
                state: PersistedAudioState::default(),
                stored_version: None,
            });
        }
        let text = fs::read_to_string(&self.path)?;
        let (state, version) = parse_state(&text)?;
        info!(
            "loaded state v{} from {}",
            version,
            self.path.display()
        );
        Ok(LoadedState {
            state,
            stored_version: Some(version),
        })
    }

    /// Write the state at the current version.
    pub fn save(&self, state: &PersistedAudioState) -> Result<(), MixerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&Envelope {
            state,
            version: STATE_VERSION,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("saved state to {}", self.path.display());
        Ok(())
    }

    /// Remove the file if present.
    pub fn reset(&self) -> Result<(), MixerError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("removed {}", self.path.display());
        }
        Ok(())
    }
}

/// Parse file contents into the current schema and the version found.
///
/// Accepts the `{ "state": .., "version": N }` envelope as well as a bare
/// state object, which is treated as version 0.
pub fn parse_state(text: &str) -> Result<(PersistedAudioState, u32), MixerError> {
    let value: Value = serde_json::from_str(text)?;
    let (inner, version) = match value {
        Value::Object(mut map) if map.contains_key("state") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .map(|version| u32::try_from(version).unwrap_or(u32::MAX))
                .unwrap_or_else(|| {
                    warn!("state envelope without a version, treating as v0");
                    0
                });
            (map.remove("state").unwrap_or(Value::Null), version)
        }
        flat => (flat, 0),
    };
    Ok((migrate(inner, version), version))
}
