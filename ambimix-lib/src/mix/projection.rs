use crate::catalog::find_sound;

use super::types::{AmbientSoundState, AudioKind, MainSource, NowPlaying};

/// Synthetic id shown for two or more active sounds.
pub const MIXED_AMBIENT_ID: &str = "mixed-ambient";

/// Projection for a main source.
pub fn main_now_playing(source: &MainSource, master_volume: u8, now_ms: u64) -> NowPlaying {
    NowPlaying {
        kind: source.kind,
        id: source.id.clone(),
        name: source.name.clone(),
        vn: source.vn.clone(),
        volume: master_volume,
        is_playing: true,
        timestamp: Some(now_ms),
    }
}

/// Recompute the "now playing" projection from the active set.
///
/// A non-ambient `current` projection is returned untouched. Otherwise the
/// result depends only on how many sounds are active. The timestamp of
/// `current` is kept while the id does not change.
pub fn derive_now_playing(
    current: Option<&NowPlaying>,
    active: &[AmbientSoundState],
    master_volume: u8,
    is_playing: bool,
    now_ms: u64,
) -> Option<NowPlaying> {
    if let Some(current) = current {
        if current.kind != AudioKind::Ambient {
            return Some(current.clone());
        }
    }

    let (id, name, vn) = match active {
        [] => return None,
        [single] => match find_sound(&single.id) {
            Some(item) => (
                item.id.to_string(),
                item.label.to_string(),
                Some(item.vn.to_string()),
            ),
            None => (single.id.clone(), single.id.clone(), None),
        },
        many => (
            MIXED_AMBIENT_ID.to_string(),
            format!("Mixed Ambient ({} sounds)", many.len()),
            None,
        ),
    };

    let timestamp = match current {
        Some(current) if current.id == id => current.timestamp,
        _ => Some(now_ms),
    };

    Some(NowPlaying {
        kind: AudioKind::Ambient,
        id,
        name,
        vn,
        volume: master_volume,
        is_playing,
        timestamp,
    })
}
