//! Playback: backends that produce voices and the engine that owns them.

mod backend;
mod engine;
mod fader;
pub mod gain;
mod output;
mod rodio_backend;
mod silent;

pub use backend::{PlaybackBackend, Voice, VoiceRequest};
pub use engine::{EngineConfig, PlaybackEngine, StartOutcome, VoicePhase};
pub use output::AudioOutput;
pub use rodio_backend::RodioBackend;
pub use silent::SilentBackend;
