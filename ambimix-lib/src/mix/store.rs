//! Single-owner mix state.
//!
//! `MixStore` owns the active set (ordered by activation, unique by id) and
//! recomputes the now-playing projection after every mutation of it. Audio
//! work goes through the shared [`PlaybackEngine`]; the store only records
//! what the engine accepted.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::projection::{derive_now_playing, main_now_playing};
use super::types::{
    AmbientSoundState, AudioKind, AudioStats, HistoryEntry, MainSource, NowPlaying,
    PresetLoadReport, SoundPreset,
};
use super::{DEFAULT_SOUND_VOLUME, MAX_HISTORY, MAX_RECENT};
use crate::catalog::{find_alarm, find_sound, resolve_locator, SoundItem};
use crate::playback::{PlaybackEngine, StartOutcome, VoiceRequest};
use crate::settings::{ActiveSource, AudioSettings, AudioSettingsPatch, PersistedAudioState};
use crate::tools::now_ms;
use crate::tools::timer::Timer;
use crate::MixerError;

pub struct MixStore {
    engine: PlaybackEngine,
    sounds_dir: PathBuf,
    active: Vec<AmbientSoundState>,
    main_source: Option<MainSource>,
    now_playing: Option<NowPlaying>,
    is_playing: bool,
    settings: AudioSettings,
    favorites: Vec<String>,
    recently_played: Vec<String>,
    history: Vec<HistoryEntry>,
    pub(super) presets: Vec<SoundPreset>,
    saved_ambient: Vec<AmbientSoundState>,
    listening: Timer,
}

impl MixStore {
    /// Empty store with default settings.
    pub fn new(engine: PlaybackEngine, sounds_dir: impl Into<PathBuf>) -> Self {
        Self::restore(engine, sounds_dir, PersistedAudioState::default())
    }

    /// Rebuild a store from persisted state.
    ///
    /// Settings are pushed into the engine. Nothing is played: the saved
    /// ambient state stays saved until [`MixStore::restore_ambient_state`].
    pub fn restore(
        engine: PlaybackEngine,
        sounds_dir: impl Into<PathBuf>,
        persisted: PersistedAudioState,
    ) -> Self {
        let PersistedAudioState {
            audio_settings,
            favorites,
            recently_played,
            audio_history,
            presets,
            saved_ambient_state,
        } = persisted;

        let store = Self {
            engine,
            sounds_dir: sounds_dir.into(),
            active: Vec::new(),
            main_source: None,
            now_playing: None,
            is_playing: true,
            settings: audio_settings,
            favorites,
            recently_played,
            history: audio_history,
            presets: presets.into_iter().filter(|preset| !preset.is_built_in).collect(),
            saved_ambient: saved_ambient_state,
            listening: Timer::new(),
        };
        store.push_settings();
        info!(
            "mix store ready ({} presets, {} saved sounds)",
            store.presets.len(),
            store.saved_ambient.len()
        );
        store
    }

    fn push_settings(&self) {
        self.engine.set_master_volume(self.settings.master_volume);
        self.engine.set_muted(self.settings.is_muted);
        self.engine.set_fade_enabled(self.settings.fade_in_out);
    }

    fn request_for(&self, item: &SoundItem) -> VoiceRequest {
        VoiceRequest {
            id: item.id.to_string(),
            path: resolve_locator(&self.sounds_dir, item.url),
            looped: true,
        }
    }

    // --- ambient sounds ---

    /// Start `id` or update its volume. `None` means the default volume and
    /// a volume of 0 stops the sound.
    pub fn play_ambient(&mut self, id: &str, volume: Option<u8>) -> Result<(), MixerError> {
        let item = find_sound(id).ok_or_else(|| MixerError::UnknownSound(id.to_string()))?;
        let volume = volume.unwrap_or(DEFAULT_SOUND_VOLUME).min(100);
        if volume == 0 {
            self.stop_ambient(id);
            return Ok(());
        }

        match self.engine.start(self.request_for(item), volume) {
            Ok(StartOutcome::Superseded) => {
                debug!("start of {} was superseded", id);
                return Ok(());
            }
            Ok(outcome) => debug!("{} -> {:?}", id, outcome),
            Err(err) => {
                warn!("could not play {}: {}", id, err);
                return Err(err);
            }
        }

        match self.active.iter_mut().find(|sound| sound.id == id) {
            Some(sound) => sound.volume = volume,
            None => self.active.push(AmbientSoundState::new(id, volume)),
        }
        if !self.is_playing {
            self.is_playing = true;
            self.listening.resume();
        }
        self.refresh_projection();
        Ok(())
    }

    /// Flip `id`. Returns whether it is active afterwards.
    pub fn toggle_ambient(&mut self, id: &str) -> Result<bool, MixerError> {
        if self.is_active(id) {
            self.stop_ambient(id);
            Ok(false)
        } else {
            self.play_ambient(id, None)?;
            Ok(self.is_active(id))
        }
    }

    pub fn stop_ambient(&mut self, id: &str) {
        self.engine.stop(id);
        let before = self.active.len();
        self.active.retain(|sound| sound.id != id);
        if self.active.len() != before {
            debug!("stopped {}", id);
            self.refresh_projection();
        }
    }

    pub fn stop_all_ambient(&mut self) {
        self.engine.stop_all();
        if !self.active.is_empty() {
            self.active.clear();
            self.refresh_projection();
        }
    }

    /// Change one sound's volume. 0 removes it; inactive ids are ignored.
    pub fn set_sound_volume(&mut self, id: &str, volume: u8) {
        let volume = volume.min(100);
        if !self.is_active(id) {
            return;
        }
        if volume == 0 {
            self.stop_ambient(id);
            return;
        }
        if let Some(sound) = self.active.iter_mut().find(|sound| sound.id == id) {
            sound.volume = volume;
        }
        self.engine.set_sound_volume(id, volume);
    }

    // --- settings ---

    pub fn set_master_volume(&mut self, volume: u8) {
        self.settings.master_volume = volume.min(100);
        self.engine.set_master_volume(self.settings.master_volume);
        if let Some(now) = self.now_playing.as_mut() {
            now.volume = self.settings.master_volume;
        }
    }

    /// Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.is_muted = !self.settings.is_muted;
        self.engine.set_muted(self.settings.is_muted);
        self.settings.is_muted
    }

    pub fn set_fade_in_out(&mut self, enabled: bool) {
        self.settings.fade_in_out = enabled;
        self.engine.set_fade_enabled(enabled);
    }

    /// Apply a partial update. A source change goes through
    /// [`MixStore::set_active_source`].
    pub fn update_settings(&mut self, mut patch: AudioSettingsPatch) {
        let source = patch.active_source.take();
        self.settings.apply(patch);
        self.push_settings();
        if let Some(now) = self.now_playing.as_mut() {
            now.volume = self.settings.master_volume;
        }
        if let Some(source) = source {
            self.set_active_source(source);
        }
    }

    pub fn reset_settings(&mut self) {
        self.settings = AudioSettings::default();
        self.push_settings();
        if let Some(now) = self.now_playing.as_mut() {
            now.volume = self.settings.master_volume;
        }
    }

    // --- sources ---

    /// Show a non-ambient source. Ambient sounds keep playing underneath.
    pub fn play_main(&mut self, source: MainSource) {
        if source.kind == AudioKind::Youtube && !source.url.is_empty() {
            self.settings.youtube_url = source.url.clone();
        }
        let projection = main_now_playing(&source, self.settings.master_volume, now_ms());
        self.main_source = Some(source);
        self.is_playing = true;
        self.engine.resume_all();
        self.set_projection(Some(projection));
    }

    /// Drop the main source and go back to the ambient projection.
    pub fn clear_main(&mut self) {
        if self.main_source.take().is_none() {
            return;
        }
        let projection = derive_now_playing(
            None,
            &self.active,
            self.settings.master_volume,
            self.is_playing,
            now_ms(),
        );
        self.set_projection(projection);
    }

    pub fn set_active_source(&mut self, source: ActiveSource) {
        if self.settings.active_source == source {
            return;
        }
        info!(
            "active source {} -> {}",
            self.settings.active_source.as_str(),
            source.as_str()
        );
        match source {
            ActiveSource::Youtube => {
                // An empty mix keeps whatever was saved before.
                if !self.active.is_empty() {
                    self.save_ambient_state();
                }
                self.stop_all_ambient();
            }
            ActiveSource::Ambient => {
                self.clear_main();
                if !self.saved_ambient.is_empty() {
                    let report = self.restore_ambient_state();
                    if !report.skipped.is_empty() {
                        warn!("could not restore {:?}", report.skipped);
                    }
                }
            }
            ActiveSource::None => {}
        }
        self.settings.active_source = source;
    }

    /// Remember the current active set for a later restore.
    pub fn save_ambient_state(&mut self) {
        self.saved_ambient = self
            .active
            .iter()
            .filter(|sound| sound.volume > 0)
            .cloned()
            .collect();
        debug!("saved {} ambient sounds", self.saved_ambient.len());
    }

    /// Replace the active set with the saved one, then forget it.
    pub fn restore_ambient_state(&mut self) -> PresetLoadReport {
        let saved = std::mem::take(&mut self.saved_ambient);
        self.replace_active(&saved)
    }

    /// Stop everything, then play `sounds` in order, skipping failures.
    pub(super) fn replace_active(&mut self, sounds: &[AmbientSoundState]) -> PresetLoadReport {
        self.stop_all_ambient();
        let mut report = PresetLoadReport::default();
        for sound in sounds {
            match self.play_ambient(&sound.id, Some(sound.volume)) {
                Ok(()) if self.is_active(&sound.id) => report.started.push(sound.id.clone()),
                Ok(()) => report.skipped.push(sound.id.clone()),
                Err(err) => {
                    warn!("skipping {}: {}", sound.id, err);
                    report.skipped.push(sound.id.clone());
                }
            }
        }
        report
    }

    // --- transport ---

    /// Pause or resume everything. Returns whether audio is playing.
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.is_playing {
            self.engine.pause_all();
            self.listening.pause();
            self.is_playing = false;
        } else {
            self.engine.resume_all();
            if self.now_playing.is_some() {
                self.listening.resume();
            }
            self.is_playing = true;
        }
        if let Some(now) = self.now_playing.as_mut() {
            now.is_playing = self.is_playing;
        }
        self.is_playing
    }

    /// Stop all ambient sounds and clear the main source and projection.
    pub fn stop(&mut self) {
        self.engine.stop_all();
        self.engine.resume_all();
        self.active.clear();
        self.main_source = None;
        self.is_playing = true;
        self.set_projection(None);
    }

    /// Play the configured alarm once at the alarm volume. Skipped while muted.
    pub fn play_alarm(&mut self) -> Result<(), MixerError> {
        if self.settings.is_muted {
            debug!("alarm skipped while muted");
            return Ok(());
        }
        let alarm = find_alarm(&self.settings.alarm_type);
        let request = VoiceRequest {
            id: format!("alarm:{}", alarm.id),
            path: resolve_locator(&self.sounds_dir, alarm.url),
            looped: false,
        };
        self.engine
            .play_oneshot(request, self.settings.alarm_volume as f32 / 100.0)
    }

    // --- favorites ---

    pub fn add_favorite(&mut self, id: &str) {
        if !self.is_favorite(id) {
            self.favorites.push(id.to_string());
        }
    }

    pub fn remove_favorite(&mut self, id: &str) {
        self.favorites.retain(|favorite| favorite != id);
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if self.is_favorite(id) {
            self.remove_favorite(id);
            false
        } else {
            self.add_favorite(id);
            true
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|favorite| favorite == id)
    }

    // --- projection & history ---

    fn refresh_projection(&mut self) {
        let projection = derive_now_playing(
            self.now_playing.as_ref(),
            &self.active,
            self.settings.master_volume,
            self.is_playing,
            now_ms(),
        );
        self.set_projection(projection);
    }

    fn set_projection(&mut self, projection: Option<NowPlaying>) {
        let old_id = self.now_playing.as_ref().map(|now| now.id.clone());
        let new_id = projection.as_ref().map(|now| now.id.clone());
        if old_id != new_id {
            let listened = self.listening.take().as_secs_f64();
            if let Some(old_id) = old_id {
                self.credit(&old_id, listened);
            }
            if let Some(now) = projection.as_ref() {
                self.record(now);
                if self.is_playing {
                    self.listening.restart();
                }
            }
        }
        self.now_playing = projection;
    }

    fn credit(&mut self, id: &str, secs: f64) {
        if let Some(entry) = self.history.iter_mut().find(|entry| entry.id == id) {
            entry.listened_secs += secs;
        }
    }

    fn record(&mut self, now: &NowPlaying) {
        let carried = match self.history.iter().position(|entry| entry.id == now.id) {
            Some(index) => self.history.remove(index).listened_secs,
            None => 0.0,
        };
        self.history.insert(
            0,
            HistoryEntry {
                kind: now.kind,
                id: now.id.clone(),
                name: now.name.clone(),
                started_at: now.timestamp.unwrap_or_else(now_ms),
                listened_secs: carried,
            },
        );
        self.history.truncate(MAX_HISTORY);

        self.recently_played.retain(|id| id != &now.id);
        self.recently_played.insert(0, now.id.clone());
        self.recently_played.truncate(MAX_RECENT);
    }

    pub fn audio_stats(&self) -> AudioStats {
        let history = self.history_with_running_time();
        let total_play_time = history.iter().map(|entry| entry.listened_secs).sum();
        let ambient = history
            .iter()
            .filter(|entry| entry.kind == AudioKind::Ambient)
            .count();
        let most_played = if history.len() - ambient > ambient {
            AudioKind::Youtube
        } else {
            AudioKind::Ambient
        };
        AudioStats {
            total_play_time,
            favorite_count: self.favorites.len(),
            most_played_type: most_played.as_str().to_string(),
            recent_activity: history
                .iter()
                .take(5)
                .map(|entry| format!("{} ({})", entry.name, entry.kind.as_str()))
                .collect(),
        }
    }

    fn history_with_running_time(&self) -> Vec<HistoryEntry> {
        let mut history = self.history.clone();
        if let Some(now) = self.now_playing.as_ref() {
            let running = self.listening.elapsed().as_secs_f64();
            if let Some(entry) = history.iter_mut().find(|entry| entry.id == now.id) {
                entry.listened_secs += running;
            }
        }
        history
    }

    /// What survives a restart. Never includes the active set.
    pub fn snapshot(&self) -> PersistedAudioState {
        PersistedAudioState {
            audio_settings: self.settings.clone(),
            favorites: self.favorites.clone(),
            recently_played: self.recently_played.clone(),
            audio_history: self.history_with_running_time(),
            presets: self.presets.clone(),
            saved_ambient_state: self.saved_ambient.clone(),
        }
    }

    // --- queries ---

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    pub fn active_sounds(&self) -> &[AmbientSoundState] {
        &self.active
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|sound| sound.id == id)
    }

    pub fn sound_volume(&self, id: &str) -> Option<u8> {
        self.active
            .iter()
            .find(|sound| sound.id == id)
            .map(|sound| sound.volume)
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn main_source(&self) -> Option<&MainSource> {
        self.main_source.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn recently_played(&self) -> &[String] {
        &self.recently_played
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn saved_ambient_state(&self) -> &[AmbientSoundState] {
        &self.saved_ambient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::MIXED_AMBIENT_ID;
    use crate::playback::EngineConfig;
    use crate::test_support::RecordingBackend;
    use std::sync::Arc;

    fn store_with(backend: &Arc<RecordingBackend>) -> MixStore {
        let engine = PlaybackEngine::new_manual(
            backend.clone(),
            EngineConfig {
                fade_in_out: false,
                ..EngineConfig::default()
            },
        );
        let mut persisted = PersistedAudioState::default();
        persisted.audio_settings.fade_in_out = false;
        MixStore::restore(engine, "/assets", persisted)
    }

    fn store() -> (Arc<RecordingBackend>, MixStore) {
        let backend = Arc::new(RecordingBackend::default());
        let store = store_with(&backend);
        (backend, store)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn rain_and_wind_walkthrough() {
        let (backend, mut store) = store();
        assert_eq!(store.settings().master_volume, 50);

        store.play_ambient("rain", Some(80)).unwrap();
        assert_eq!(store.active_sounds(), &[AmbientSoundState::new("rain", 80)]);
        let now = store.now_playing().unwrap();
        assert_eq!(now.name, "Rain");
        assert!(now.is_playing);
        assert!(close(backend.volume_of("rain").unwrap(), 0.4));

        store.play_ambient("wind", Some(60)).unwrap();
        assert_eq!(store.active_sounds().len(), 2);
        let now = store.now_playing().unwrap();
        assert_eq!(now.id, MIXED_AMBIENT_ID);
        assert_eq!(now.name, "Mixed Ambient (2 sounds)");
        assert!(close(backend.volume_of("wind").unwrap(), 0.3));

        store.set_sound_volume("rain", 0);
        assert_eq!(store.active_sounds(), &[AmbientSoundState::new("wind", 60)]);
        assert_eq!(store.now_playing().unwrap().name, "Wind");
        assert!(backend.was_stopped("rain"));
    }

    #[test]
    fn toggles_converge_by_parity() {
        let (_backend, mut store) = store();
        for count in 1..=7 {
            store.toggle_ambient("rain").unwrap();
            assert_eq!(store.is_active("rain"), count % 2 == 1, "after {} toggles", count);
        }
        assert_eq!(store.active_sounds().len(), 1);
    }

    #[test]
    fn default_volume_is_fifty_and_zero_stops() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        assert_eq!(store.sound_volume("rain"), Some(50));
        store.play_ambient("rain", Some(0)).unwrap();
        assert!(!store.is_active("rain"));
        assert_eq!(store.now_playing(), None);
    }

    #[test]
    fn replaying_updates_volume_without_duplicates() {
        let (backend, mut store) = store();
        store.play_ambient("rain", Some(30)).unwrap();
        store.play_ambient("rain", Some(90)).unwrap();
        assert_eq!(store.active_sounds(), &[AmbientSoundState::new("rain", 90)]);
        assert_eq!(backend.opened_count("rain"), 1);
    }

    #[test]
    fn unknown_sound_is_rejected() {
        let (_backend, mut store) = store();
        let err = store.play_ambient("vuvuzela", Some(40)).unwrap_err();
        assert!(matches!(err, MixerError::UnknownSound(id) if id == "vuvuzela"));
        assert!(store.active_sounds().is_empty());
    }

    #[test]
    fn load_failure_leaves_active_set_untouched() {
        let backend = Arc::new(RecordingBackend::failing(&["wind"]));
        let mut store = store_with(&backend);
        store.play_ambient("rain", Some(40)).unwrap();
        let err = store.play_ambient("wind", Some(40)).unwrap_err();
        assert!(matches!(err, MixerError::ResourceLoad { .. }));
        assert_eq!(store.active_sounds(), &[AmbientSoundState::new("rain", 40)]);
        assert_eq!(store.now_playing().unwrap().name, "Rain");
    }

    #[test]
    fn volume_change_on_inactive_sound_is_ignored() {
        let (backend, mut store) = store();
        store.set_sound_volume("rain", 70);
        assert!(store.active_sounds().is_empty());
        assert_eq!(backend.opened_count("rain"), 0);
    }

    #[test]
    fn master_volume_reaches_every_voice() {
        let (backend, mut store) = store();
        store.play_ambient("rain", Some(80)).unwrap();
        store.play_ambient("wind", Some(40)).unwrap();
        store.set_master_volume(100);
        assert!(close(backend.volume_of("rain").unwrap(), 0.8));
        assert!(close(backend.volume_of("wind").unwrap(), 0.4));
        assert_eq!(store.now_playing().unwrap().volume, 100);
    }

    #[test]
    fn mute_forces_silence_until_unmuted() {
        let (backend, mut store) = store();
        store.play_ambient("rain", Some(80)).unwrap();
        assert!(store.toggle_mute());
        assert_eq!(backend.volume_of("rain"), Some(0.0));
        assert!(!store.toggle_mute());
        assert!(close(backend.volume_of("rain").unwrap(), 0.4));
        assert_eq!(store.sound_volume("rain"), Some(80));
    }

    #[test]
    fn main_source_wins_over_ambient_changes() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        store.play_main(MainSource {
            kind: AudioKind::Youtube,
            id: "lofi".to_string(),
            name: "Lofi".to_string(),
            vn: None,
            url: "https://example.com/watch?v=lofi".to_string(),
        });
        store.play_ambient("wind", None).unwrap();
        store.stop_ambient("rain");
        assert_eq!(store.now_playing().unwrap().id, "lofi");
        assert_eq!(store.settings().youtube_url, "https://example.com/watch?v=lofi");

        store.clear_main();
        assert_eq!(store.now_playing().unwrap().name, "Wind");
    }

    #[test]
    fn switching_to_youtube_saves_and_back_restores() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", Some(70)).unwrap();
        store.play_ambient("wind", Some(20)).unwrap();

        store.set_active_source(ActiveSource::Youtube);
        assert!(store.active_sounds().is_empty());
        assert_eq!(store.saved_ambient_state().len(), 2);
        assert_eq!(store.settings().active_source, ActiveSource::Youtube);

        store.set_active_source(ActiveSource::Ambient);
        assert_eq!(
            store.active_sounds(),
            &[
                AmbientSoundState::new("rain", 70),
                AmbientSoundState::new("wind", 20)
            ]
        );
        assert!(store.saved_ambient_state().is_empty());
        assert_eq!(store.settings().active_source, ActiveSource::Ambient);
    }

    #[test]
    fn same_source_is_a_noop() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        store.set_active_source(ActiveSource::None);
        assert!(store.is_active("rain"));
        assert!(store.saved_ambient_state().is_empty());
    }

    #[test]
    fn play_pause_reaches_engine_and_projection() {
        let (backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        assert!(!store.toggle_play_pause());
        assert!(backend.is_paused("rain"));
        assert!(!store.now_playing().unwrap().is_playing);

        assert!(store.toggle_play_pause());
        assert!(!backend.is_paused("rain"));
        assert!(store.now_playing().unwrap().is_playing);
    }

    #[test]
    fn playing_while_paused_resumes() {
        let (backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        store.toggle_play_pause();
        store.play_ambient("wind", None).unwrap();
        assert!(store.is_playing());
        assert!(!backend.is_paused("rain"));
    }

    #[test]
    fn resume_with_nothing_keeps_projection_empty() {
        let (_backend, mut store) = store();
        store.toggle_play_pause();
        assert!(store.toggle_play_pause());
        assert_eq!(store.now_playing(), None);
    }

    #[test]
    fn stop_clears_everything_visible() {
        let (backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        store.play_main(MainSource {
            kind: AudioKind::Youtube,
            id: "lofi".to_string(),
            name: "Lofi".to_string(),
            vn: None,
            url: String::new(),
        });
        store.stop();
        assert!(store.active_sounds().is_empty());
        assert_eq!(store.now_playing(), None);
        assert_eq!(store.main_source(), None);
        assert!(backend.was_stopped("rain"));
    }

    #[test]
    fn alarm_ignores_master_and_respects_mute() {
        let (backend, mut store) = store();
        store.set_master_volume(10);
        store.play_alarm().unwrap();
        assert!(close(backend.volume_of("alarm:bell").unwrap(), 0.7));

        store.update_settings(AudioSettingsPatch {
            alarm_type: Some("klaxon".to_string()),
            alarm_volume: Some(40),
            ..AudioSettingsPatch::default()
        });
        store.play_alarm().unwrap();
        assert_eq!(backend.opened_count("alarm:bell"), 2);
        assert!(close(backend.volume_of("alarm:bell").unwrap(), 0.4));

        store.toggle_mute();
        store.play_alarm().unwrap();
        assert_eq!(backend.opened_count("alarm:bell"), 2);
    }

    #[test]
    fn mute_silences_a_sounding_alarm() {
        let (backend, mut store) = store();
        store.play_alarm().unwrap();
        assert!(close(backend.volume_of("alarm:bell").unwrap(), 0.7));

        assert!(store.toggle_mute());
        assert_eq!(backend.volume_of("alarm:bell"), Some(0.0));

        assert!(!store.toggle_mute());
        assert!(close(backend.volume_of("alarm:bell").unwrap(), 0.7));
    }

    #[test]
    fn favorites_stay_unique() {
        let (_backend, mut store) = store();
        store.add_favorite("rain");
        store.add_favorite("rain");
        assert_eq!(store.favorites(), &["rain".to_string()]);
        assert!(!store.toggle_favorite("rain"));
        assert!(store.toggle_favorite("waves"));
        assert!(store.is_favorite("waves"));
        assert!(!store.is_favorite("rain"));
    }

    #[test]
    fn history_and_recent_follow_projection_ids() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        store.play_ambient("wind", None).unwrap();
        store.play_ambient("waves", None).unwrap();
        let ids: Vec<&str> = store.history().iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["mixed-ambient", "rain"]);
        assert_eq!(store.recently_played(), &["mixed-ambient", "rain"]);

        store.stop_all_ambient();
        store.play_ambient("rain", None).unwrap();
        let ids: Vec<&str> = store.history().iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["rain", "mixed-ambient"]);
    }

    #[test]
    fn stats_summarise_history_and_favorites() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", None).unwrap();
        store.add_favorite("rain");
        let stats = store.audio_stats();
        assert_eq!(stats.favorite_count, 1);
        assert_eq!(stats.most_played_type, "ambient");
        assert_eq!(stats.recent_activity, vec!["Rain (ambient)"]);
        assert!(stats.total_play_time >= 0.0);
    }

    #[test]
    fn snapshot_never_contains_active_sounds() {
        let (_backend, mut store) = store();
        store.play_ambient("rain", Some(80)).unwrap();
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert!(json.get("activeAmbientSounds").is_none());
        assert!(json["savedAmbientState"].as_array().unwrap().is_empty());
    }

    #[test]
    fn restore_pushes_settings_without_playing() {
        let backend = Arc::new(RecordingBackend::default());
        let engine = PlaybackEngine::new_manual(backend.clone(), EngineConfig::default());
        let mut persisted = PersistedAudioState::default();
        persisted.audio_settings.master_volume = 20;
        persisted.audio_settings.is_muted = true;
        persisted.audio_settings.fade_in_out = false;
        persisted
            .saved_ambient_state
            .push(AmbientSoundState::new("rain", 60));

        let mut store = MixStore::restore(engine, "/assets", persisted);
        assert!(store.active_sounds().is_empty());
        assert_eq!(store.engine().voice_count(), 0);
        assert_eq!(backend.opened_count("rain"), 0);

        let report = store.restore_ambient_state();
        assert_eq!(report.started, vec!["rain"]);
        assert_eq!(store.engine().phase("rain"), Some(crate::playback::VoicePhase::Playing));
        assert_eq!(backend.volume_of("rain"), Some(0.0));
        store.toggle_mute();
        assert!(close(backend.volume_of("rain").unwrap(), 0.12));
    }

    #[test]
    fn voices_resolve_against_sounds_dir() {
        let (_backend, store) = store();
        let item = find_sound("rain").unwrap();
        assert_eq!(
            store.request_for(item).path,
            Path::new("/assets/rain/rain.mp3")
        );
    }
}
