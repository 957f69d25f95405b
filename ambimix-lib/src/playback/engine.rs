//! Multi-voice playback engine.
//!
//! The engine exclusively owns every live [`Voice`]. Each voice carries its
//! per-sound volume and a fade envelope; what reaches the backend is always
//! `envelope * sound * master / 10000`, or silence while muted. Envelopes are
//! advanced by the fader thread (or by [`PlaybackEngine::advance`] for a
//! manually driven engine).
//!
//! Overlapping calls for the same id resolve as last-call-wins: every start
//! and stop bumps a per-id intent number, and a start whose load finishes
//! after a newer intent was recorded releases its handle instead of playing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};

use super::backend::{PlaybackBackend, Voice, VoiceRequest};
use super::fader;
use super::gain::output_level;
use crate::MixerError;

const DEFAULT_FADE_MS: u64 = 800;
const DEFAULT_TICK_MS: u64 = 10;

/// Fade direction of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePhase {
    FadingIn,
    Playing,
    FadingOut,
}

/// Result of [`PlaybackEngine::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new handle was opened.
    Started,
    /// A voice that was fading out was brought back.
    Revived,
    /// The voice was already playing; only its volume changed.
    Updated,
    /// A later start or stop for the same id won while this one was loading.
    Superseded,
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub fade_in_out: bool,
    pub fade_duration: Duration,
    pub tick: Duration,
    pub master_volume: u8,
    pub muted: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_in_out: true,
            fade_duration: Duration::from_millis(DEFAULT_FADE_MS),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            master_volume: 50,
            muted: false,
        }
    }
}

struct VoiceSlot {
    voice: Box<dyn Voice>,
    sound_volume: u8,
    envelope: f32,
    phase: VoicePhase,
}

impl VoiceSlot {
    fn apply(&self, master: u8, muted: bool) {
        self.voice
            .set_volume(output_level(self.sound_volume, master, self.envelope, muted));
    }
}

struct OneShot {
    voice: Box<dyn Voice>,
    level: f32,
}

impl OneShot {
    fn apply(&self, muted: bool) {
        self.voice.set_volume(if muted { 0.0 } else { self.level });
    }
}

pub(super) struct EngineState {
    voices: HashMap<String, VoiceSlot>,
    oneshots: Vec<OneShot>,
    intents: HashMap<String, u64>,
    next_intent: u64,
    master: u8,
    muted: bool,
    paused: bool,
    fade_in_out: bool,
    fade_duration: Duration,
}

impl EngineState {
    fn new(config: &EngineConfig) -> Self {
        Self {
            voices: HashMap::new(),
            oneshots: Vec::new(),
            intents: HashMap::new(),
            next_intent: 0,
            master: config.master_volume.min(100),
            muted: config.muted,
            paused: false,
            fade_in_out: config.fade_in_out,
            fade_duration: config.fade_duration,
        }
    }

    fn bump_intent(&mut self, id: &str) -> u64 {
        self.next_intent += 1;
        self.intents.insert(id.to_string(), self.next_intent);
        self.next_intent
    }

    fn refresh(&self, id: &str) {
        if let Some(slot) = self.voices.get(id) {
            slot.apply(self.master, self.muted);
        }
    }

    fn refresh_all(&self) {
        for slot in self.voices.values() {
            slot.apply(self.master, self.muted);
        }
        for oneshot in &self.oneshots {
            oneshot.apply(self.muted);
        }
    }

    fn release(&mut self, id: &str) {
        if let Some(slot) = self.voices.remove(id) {
            slot.voice.stop();
            debug!("released voice {}", id);
        }
    }

    fn release_everything(&mut self) {
        let ids: Vec<String> = self.voices.keys().cloned().collect();
        for id in ids {
            self.bump_intent(&id);
            self.release(&id);
        }
        for oneshot in self.oneshots.drain(..) {
            oneshot.voice.stop();
        }
    }

    fn begin_fade_out(&mut self, id: &str) {
        let fade = self.fade_in_out;
        let Some(slot) = self.voices.get_mut(id) else {
            return;
        };
        if fade && slot.envelope > 0.0 {
            slot.phase = VoicePhase::FadingOut;
        } else {
            self.release(id);
        }
    }

    fn resume_voices(&mut self) {
        if self.paused {
            for slot in self.voices.values() {
                slot.voice.resume();
            }
            for oneshot in &self.oneshots {
                oneshot.voice.resume();
            }
            self.paused = false;
        }
    }

    /// One fader step.
    pub(super) fn advance(&mut self, dt: Duration) {
        let step = if self.fade_duration.is_zero() {
            1.0
        } else {
            dt.as_secs_f32() / self.fade_duration.as_secs_f32()
        };

        let mut finished = Vec::new();
        for (id, slot) in self.voices.iter_mut() {
            match slot.phase {
                VoicePhase::Playing => continue,
                VoicePhase::FadingIn => {
                    slot.envelope = (slot.envelope + step).min(1.0);
                    if slot.envelope >= 1.0 {
                        slot.phase = VoicePhase::Playing;
                    }
                }
                VoicePhase::FadingOut => {
                    slot.envelope = (slot.envelope - step).max(0.0);
                    if slot.envelope <= 0.0 {
                        finished.push(id.clone());
                    }
                }
            }
            slot.apply(self.master, self.muted);
        }
        for id in finished {
            self.release(&id);
        }

        self.oneshots.retain(|oneshot| {
            if oneshot.voice.finished() {
                oneshot.voice.stop();
                false
            } else {
                true
            }
        });
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        self.release_everything();
    }
}

/// Cloneable handle to the shared engine state.
#[derive(Clone)]
pub struct PlaybackEngine {
    state: Arc<Mutex<EngineState>>,
    backend: Arc<dyn PlaybackBackend>,
}

impl PlaybackEngine {
    /// Create an engine whose fades are driven by a background fader thread.
    pub fn new(backend: Arc<dyn PlaybackBackend>, config: EngineConfig) -> Self {
        let engine = Self::new_manual(backend, config);
        fader::spawn(Arc::downgrade(&engine.state), config.tick);
        info!("playback engine started ({})", engine.backend.name());
        engine
    }

    /// Create an engine without a fader thread; envelopes only move through
    /// [`PlaybackEngine::advance`].
    pub fn new_manual(backend: Arc<dyn PlaybackBackend>, config: EngineConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState::new(&config))),
            backend,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Start (or keep) a looping or one-pass voice for `request.id`.
    ///
    /// The backend load happens without holding the engine lock.
    pub fn start(&self, request: VoiceRequest, volume: u8) -> Result<StartOutcome, MixerError> {
        let volume = volume.min(100);
        let intent = {
            let mut state = self.lock();
            let intent = state.bump_intent(&request.id);
            let fade = state.fade_in_out;
            if let Some(slot) = state.voices.get_mut(&request.id) {
                slot.sound_volume = volume;
                let outcome = if slot.phase == VoicePhase::FadingOut {
                    if fade {
                        slot.phase = VoicePhase::FadingIn;
                    } else {
                        slot.phase = VoicePhase::Playing;
                        slot.envelope = 1.0;
                    }
                    StartOutcome::Revived
                } else {
                    StartOutcome::Updated
                };
                state.resume_voices();
                state.refresh(&request.id);
                return Ok(outcome);
            }
            intent
        };

        let opened = self.backend.open(&request);

        let mut state = self.lock();
        let voice = match opened {
            Ok(voice) => voice,
            Err(err) => {
                warn!("failed to start {}: {}", request.id, err);
                return Err(err);
            }
        };

        if state.intents.get(&request.id) != Some(&intent) || state.voices.contains_key(&request.id)
        {
            debug!("start of {} superseded while loading", request.id);
            voice.stop();
            return Ok(StartOutcome::Superseded);
        }

        let (envelope, phase) = if state.fade_in_out {
            (0.0, VoicePhase::FadingIn)
        } else {
            (1.0, VoicePhase::Playing)
        };
        state.resume_voices();
        state.voices.insert(
            request.id.clone(),
            VoiceSlot {
                voice,
                sound_volume: volume,
                envelope,
                phase,
            },
        );
        state.refresh(&request.id);
        debug!("started {} at volume {}", request.id, volume);

        Ok(StartOutcome::Started)
    }

    /// Stop a voice, fading it out first when fading is enabled.
    ///
    /// Unknown ids are a no-op apart from superseding an in-flight start.
    pub fn stop(&self, id: &str) {
        let mut state = self.lock();
        state.bump_intent(id);
        state.begin_fade_out(id);
    }

    /// Stop every voice, with fades when enabled.
    pub fn stop_all(&self) {
        let mut state = self.lock();
        let ids: Vec<String> = state
            .voices
            .keys()
            .chain(state.intents.keys())
            .cloned()
            .collect();
        for id in ids {
            state.bump_intent(&id);
            state.begin_fade_out(&id);
        }
    }

    /// Release every voice and one-shot immediately.
    pub fn release_all(&self) {
        self.lock().release_everything();
    }

    pub fn set_sound_volume(&self, id: &str, volume: u8) {
        let mut state = self.lock();
        if let Some(slot) = state.voices.get_mut(id) {
            slot.sound_volume = volume.min(100);
        }
        state.refresh(id);
    }

    pub fn set_master_volume(&self, volume: u8) {
        let mut state = self.lock();
        state.master = volume.min(100);
        state.refresh_all();
    }

    pub fn set_muted(&self, muted: bool) {
        let mut state = self.lock();
        state.muted = muted;
        state.refresh_all();
    }

    /// Toggle fading. Turning it off finishes in-flight fades immediately.
    pub fn set_fade_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        state.fade_in_out = enabled;
        if enabled {
            return;
        }
        let mut fading_out = Vec::new();
        for (id, slot) in state.voices.iter_mut() {
            match slot.phase {
                VoicePhase::FadingIn => {
                    slot.phase = VoicePhase::Playing;
                    slot.envelope = 1.0;
                }
                VoicePhase::FadingOut => fading_out.push(id.clone()),
                VoicePhase::Playing => {}
            }
        }
        for id in fading_out {
            state.release(&id);
        }
        state.refresh_all();
    }

    pub fn set_fade_duration(&self, duration: Duration) {
        self.lock().fade_duration = duration;
    }

    pub fn pause_all(&self) {
        let mut state = self.lock();
        for slot in state.voices.values() {
            slot.voice.pause();
        }
        for oneshot in &state.oneshots {
            oneshot.voice.pause();
        }
        state.paused = true;
    }

    pub fn resume_all(&self) {
        self.lock().resume_voices();
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Fire-and-forget playback of a non-looping resource at a fixed level.
    pub fn play_oneshot(&self, request: VoiceRequest, level: f32) -> Result<(), MixerError> {
        let request = VoiceRequest {
            looped: false,
            ..request
        };
        let voice = self.backend.open(&request)?;
        let mut state = self.lock();
        let oneshot = OneShot {
            voice,
            level: level.clamp(0.0, 1.0),
        };
        oneshot.apply(state.muted);
        state.oneshots.push(oneshot);
        Ok(())
    }

    /// Advance every fade by `dt` and release finished voices.
    pub fn advance(&self, dt: Duration) {
        self.lock().advance(dt);
    }

    /// True when the voice exists and is not fading out.
    pub fn is_active(&self, id: &str) -> bool {
        self.lock()
            .voices
            .get(id)
            .is_some_and(|slot| slot.phase != VoicePhase::FadingOut)
    }

    /// Ids of voices that are not fading out, sorted.
    pub fn active_ids(&self) -> Vec<String> {
        let state = self.lock();
        let mut ids: Vec<String> = state
            .voices
            .iter()
            .filter(|(_, slot)| slot.phase != VoicePhase::FadingOut)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Live voices, including ones still fading out.
    pub fn voice_count(&self) -> usize {
        self.lock().voices.len()
    }

    pub fn oneshot_count(&self) -> usize {
        self.lock().oneshots.len()
    }

    pub fn phase(&self, id: &str) -> Option<VoicePhase> {
        self.lock().voices.get(id).map(|slot| slot.phase)
    }

    /// Level currently written to the voice for `id`.
    pub fn output_level(&self, id: &str) -> Option<f32> {
        let state = self.lock();
        state
            .voices
            .get(id)
            .map(|slot| output_level(slot.sound_volume, state.master, slot.envelope, state.muted))
    }
}
