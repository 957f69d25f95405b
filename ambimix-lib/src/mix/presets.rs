use log::{info, warn};

use super::store::MixStore;
use super::types::{PresetLoadReport, SoundPreset};
use super::MAX_USER_PRESETS;
use crate::catalog::{built_in_preset, built_in_presets};
use crate::tools::now_ms;
use crate::MixerError;

impl MixStore {
    /// Snapshot the active set as a user preset.
    pub fn save_preset(&mut self, name: &str, icon: Option<&str>) -> Result<SoundPreset, MixerError> {
        let sounds: Vec<_> = self
            .active_sounds()
            .iter()
            .filter(|sound| sound.volume > 0)
            .cloned()
            .collect();
        if sounds.is_empty() {
            return Err(MixerError::NoActiveSounds);
        }
        if self.presets.len() >= MAX_USER_PRESETS {
            return Err(MixerError::PresetLimit(MAX_USER_PRESETS));
        }

        let mut stamp = now_ms();
        while self.presets.iter().any(|preset| preset.id == format!("user-{}", stamp)) {
            stamp += 1;
        }
        let name = name.trim();
        let preset = SoundPreset {
            id: format!("user-{}", stamp),
            name: if name.is_empty() {
                format!("Mix {}", self.presets.len() + 1)
            } else {
                name.to_string()
            },
            icon: icon.map(str::to_string),
            sounds,
            is_built_in: false,
        };
        info!("saved preset {} ({} sounds)", preset.name, preset.sounds.len());
        self.presets.push(preset.clone());
        Ok(preset)
    }

    /// Replace the active set with the preset's sounds, in order.
    pub fn load_preset(&mut self, preset: &SoundPreset) -> PresetLoadReport {
        info!("loading preset {}", preset.name);
        let report = self.replace_active(&preset.sounds);
        if !report.skipped.is_empty() {
            warn!(
                "preset {}: skipped {}",
                preset.name,
                report.skipped.join(", ")
            );
        }
        report
    }

    pub fn load_preset_by_id(&mut self, id: &str) -> Result<PresetLoadReport, MixerError> {
        let preset = self
            .find_preset(id)
            .ok_or_else(|| MixerError::UnknownPreset(id.to_string()))?;
        Ok(self.load_preset(&preset))
    }

    /// Remove a user preset. Built-ins cannot be deleted.
    pub fn delete_preset(&mut self, id: &str) -> Result<SoundPreset, MixerError> {
        if built_in_preset(id).is_some() {
            return Err(MixerError::BuiltInPreset(id.to_string()));
        }
        let index = self
            .presets
            .iter()
            .position(|preset| preset.id == id)
            .ok_or_else(|| MixerError::UnknownPreset(id.to_string()))?;
        Ok(self.presets.remove(index))
    }

    pub fn rename_preset(&mut self, id: &str, name: &str) -> Result<(), MixerError> {
        if built_in_preset(id).is_some() {
            return Err(MixerError::BuiltInPreset(id.to_string()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(MixerError::EmptyPresetName);
        }
        let preset = self
            .presets
            .iter_mut()
            .find(|preset| preset.id == id)
            .ok_or_else(|| MixerError::UnknownPreset(id.to_string()))?;
        preset.name = name.to_string();
        Ok(())
    }

    /// Built-ins first, then user presets in creation order.
    pub fn all_presets(&self) -> Vec<SoundPreset> {
        let mut presets = built_in_presets();
        presets.extend(self.presets.iter().cloned());
        presets
    }

    pub fn user_presets(&self) -> &[SoundPreset] {
        &self.presets
    }

    pub fn find_preset(&self, id: &str) -> Option<SoundPreset> {
        built_in_preset(id).or_else(|| self.presets.iter().find(|preset| preset.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::AmbientSoundState;
    use crate::playback::{EngineConfig, PlaybackEngine};
    use crate::test_support::RecordingBackend;
    use std::sync::Arc;

    fn store_with(backend: RecordingBackend) -> MixStore {
        let engine = PlaybackEngine::new_manual(
            Arc::new(backend),
            EngineConfig {
                fade_in_out: false,
                ..EngineConfig::default()
            },
        );
        MixStore::new(engine, "/assets")
    }

    fn preset(sounds: &[(&str, u8)]) -> SoundPreset {
        SoundPreset {
            id: "user-1".to_string(),
            name: "Test".to_string(),
            icon: None,
            sounds: sounds
                .iter()
                .map(|(id, volume)| AmbientSoundState::new(id, *volume))
                .collect(),
            is_built_in: false,
        }
    }

    #[test]
    fn failing_entry_is_skipped_and_rest_play() {
        let mut store = store_with(RecordingBackend::failing(&["wind"]));
        let report = store.load_preset(&preset(&[("rain", 60), ("wind", 30), ("waves", 40)]));
        assert_eq!(report.started, vec!["rain", "waves"]);
        assert_eq!(report.skipped, vec!["wind"]);
        assert_eq!(
            store.active_sounds(),
            &[
                AmbientSoundState::new("rain", 60),
                AmbientSoundState::new("waves", 40)
            ]
        );
    }

    #[test]
    fn loading_replaces_current_mix() {
        let mut store = store_with(RecordingBackend::default());
        store.play_ambient("campfire", None).unwrap();
        store.play_ambient("thunder", None).unwrap();
        store.load_preset(&preset(&[("rain", 60)]));
        assert_eq!(store.active_sounds(), &[AmbientSoundState::new("rain", 60)]);
    }

    #[test]
    fn unknown_ids_in_preset_are_skipped() {
        let mut store = store_with(RecordingBackend::default());
        let report = store.load_preset(&preset(&[("vuvuzela", 60), ("rain", 10)]));
        assert_eq!(report.skipped, vec!["vuvuzela"]);
        assert_eq!(report.started, vec!["rain"]);
    }

    #[test]
    fn save_requires_sounds_and_respects_limit() {
        let mut store = store_with(RecordingBackend::default());
        assert!(matches!(
            store.save_preset("Empty", None),
            Err(MixerError::NoActiveSounds)
        ));

        store.play_ambient("rain", Some(35)).unwrap();
        let mut ids = Vec::new();
        for n in 0..MAX_USER_PRESETS {
            let saved = store.save_preset(&format!("Mix {}", n), Some("🎧")).unwrap();
            assert!(saved.id.starts_with("user-"));
            assert_eq!(saved.sounds, vec![AmbientSoundState::new("rain", 35)]);
            ids.push(saved.id);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), MAX_USER_PRESETS);
        assert!(matches!(
            store.save_preset("One more", None),
            Err(MixerError::PresetLimit(10))
        ));
    }

    #[test]
    fn built_ins_are_listed_first_and_immutable() {
        let mut store = store_with(RecordingBackend::default());
        store.play_ambient("rain", None).unwrap();
        let saved = store.save_preset("Mine", None).unwrap();

        let all = store.all_presets();
        assert!(all[0].is_built_in);
        assert_eq!(all.last().unwrap().id, saved.id);

        assert!(matches!(
            store.delete_preset("cafe"),
            Err(MixerError::BuiltInPreset(_))
        ));
        assert!(matches!(
            store.rename_preset("cafe", "Coffee"),
            Err(MixerError::BuiltInPreset(_))
        ));

        store.rename_preset(&saved.id, " Renamed ").unwrap();
        assert_eq!(store.user_presets()[0].name, "Renamed");
        assert!(matches!(
            store.rename_preset(&saved.id, "   "),
            Err(MixerError::EmptyPresetName)
        ));
        assert_eq!(store.user_presets()[0].name, "Renamed");
        store.delete_preset(&saved.id).unwrap();
        assert!(store.user_presets().is_empty());
        assert!(matches!(
            store.delete_preset(&saved.id),
            Err(MixerError::UnknownPreset(_))
        ));
    }

    #[test]
    fn load_by_id_finds_built_ins() {
        let mut store = store_with(RecordingBackend::default());
        let report = store.load_preset_by_id("library").unwrap();
        assert!(!report.started.is_empty());
        assert!(matches!(
            store.load_preset_by_id("nope"),
            Err(MixerError::UnknownPreset(_))
        ));
    }
}
