//! The mix state store and the types it hands out.

mod presets;
mod projection;
mod store;
mod types;

pub use projection::{derive_now_playing, main_now_playing, MIXED_AMBIENT_ID};
pub use store::MixStore;
pub use types::{
    AmbientSoundState, AudioKind, AudioStats, HistoryEntry, MainSource, NowPlaying,
    PresetLoadReport, SoundPreset,
};

/// Volume used when a sound is started without one.
pub const DEFAULT_SOUND_VOLUME: u8 = 50;
pub const MAX_RECENT: usize = 10;
pub const MAX_HISTORY: usize = 20;
pub const MAX_USER_PRESETS: usize = 10;
