//! Backend used when no output device is available.
//!
//! Resources are still probed, so a bad locator fails exactly as it would
//! with real output, but nothing is heard.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::backend::{PlaybackBackend, Voice, VoiceRequest};
use crate::probe::probe_resource;
use crate::MixerError;

#[derive(Debug, Default)]
pub struct SilentBackend;

impl PlaybackBackend for SilentBackend {
    fn open(&self, request: &VoiceRequest) -> Result<Box<dyn Voice>, MixerError> {
        let info = probe_resource(&request.path)
            .map_err(|err| MixerError::resource_load(&request.id, err))?;
        let length = if request.looped {
            None
        } else {
            Some(Duration::from_secs_f64(info.duration_secs))
        };
        Ok(Box::new(SilentVoice {
            length,
            started: Mutex::new(Some(Instant::now())),
        }))
    }

    fn name(&self) -> &'static str {
        "silent"
    }
}

struct SilentVoice {
    length: Option<Duration>,
    // `None` once stopped.
    started: Mutex<Option<Instant>>,
}

impl Voice for SilentVoice {
    fn set_volume(&self, _volume: f32) {}

    fn pause(&self) {}

    fn resume(&self) {}

    fn stop(&self) {
        if let Ok(mut started) = self.started.lock() {
            *started = None;
        }
    }

    fn finished(&self) -> bool {
        let Ok(started) = self.started.lock() else {
            return true;
        };
        match (*started, self.length) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(at), Some(length)) => at.elapsed() >= length,
        }
    }
}
