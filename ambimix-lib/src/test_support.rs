//! In-crate backend that records what the engine asks of its voices.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::playback::{PlaybackBackend, Voice, VoiceRequest};
use crate::MixerError;

type OpenHook = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub(crate) struct RecordingBackend {
    failing: HashSet<String>,
    voices: Mutex<Vec<Arc<VoiceRecord>>>,
    hook: Mutex<Option<OpenHook>>,
}

#[derive(Default)]
struct VoiceRecord {
    id: String,
    volume: Mutex<f32>,
    paused: AtomicBool,
    stopped: AtomicBool,
    finished: AtomicBool,
}

struct RecordedVoice(Arc<VoiceRecord>);

impl Voice for RecordedVoice {
    fn set_volume(&self, volume: f32) {
        *self.0.volume.lock().unwrap() = volume;
    }

    fn pause(&self) {
        self.0.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.0.paused.store(false, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.0.stopped.store(true, Ordering::SeqCst);
    }

    fn finished(&self) -> bool {
        self.0.finished.load(Ordering::SeqCst)
    }
}

impl RecordingBackend {
    /// Backend whose loads fail for the given ids.
    pub(crate) fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Run `hook` inside every `open`, after the engine released its lock.
    pub(crate) fn on_open(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    fn latest(&self, id: &str) -> Option<Arc<VoiceRecord>> {
        self.voices
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|record| record.id == id)
            .cloned()
    }

    pub(crate) fn volume_of(&self, id: &str) -> Option<f32> {
        self.latest(id).map(|record| *record.volume.lock().unwrap())
    }

    pub(crate) fn is_paused(&self, id: &str) -> bool {
        self.latest(id)
            .is_some_and(|record| record.paused.load(Ordering::SeqCst))
    }

    pub(crate) fn was_stopped(&self, id: &str) -> bool {
        self.latest(id)
            .is_some_and(|record| record.stopped.load(Ordering::SeqCst))
    }

    pub(crate) fn opened_count(&self, id: &str) -> usize {
        self.voices
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.id == id)
            .count()
    }

    /// Ids with a voice that has not been stopped.
    pub(crate) fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .voices
            .lock()
            .unwrap()
            .iter()
            .filter(|record| !record.stopped.load(Ordering::SeqCst))
            .map(|record| record.id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub(crate) fn finish(&self, id: &str) {
        if let Some(record) = self.latest(id) {
            record.finished.store(true, Ordering::SeqCst);
        }
    }
}

impl PlaybackBackend for RecordingBackend {
    fn open(&self, request: &VoiceRequest) -> Result<Box<dyn Voice>, MixerError> {
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(&request.id);
        }
        if self.failing.contains(&request.id) {
            return Err(MixerError::resource_load(&request.id, "decode failed"));
        }
        let record = Arc::new(VoiceRecord {
            id: request.id.clone(),
            ..VoiceRecord::default()
        });
        self.voices.lock().unwrap().push(record.clone());
        Ok(Box::new(RecordedVoice(record)))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
