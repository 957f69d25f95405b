//! Seam between the engine and real audio output.

use std::path::PathBuf;

use crate::MixerError;

/// What the engine asks a backend to open.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRequest {
    pub id: String,
    pub path: PathBuf,
    pub looped: bool,
}

/// One live playback handle.
///
/// Voices are created silent and playing; the engine drives their volume.
pub trait Voice: Send {
    fn set_volume(&self, volume: f32);
    fn pause(&self);
    fn resume(&self);
    /// Release the handle. Calling it twice is harmless.
    fn stop(&self);
    /// True once a non-looping voice has played to its end.
    fn finished(&self) -> bool;
}

/// Factory for voices.
pub trait PlaybackBackend: Send + Sync {
    fn open(&self, request: &VoiceRequest) -> Result<Box<dyn Voice>, MixerError>;

    fn name(&self) -> &'static str;
}
