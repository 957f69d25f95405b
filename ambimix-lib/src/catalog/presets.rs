use crate::mix::{AmbientSoundState, SoundPreset};

struct BuiltIn {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    sounds: &'static [(&'static str, u8)],
}

// Some entries reference sounds that may be missing from a sounds directory;
// loading skips them.
static BUILT_INS: &[BuiltIn] = &[
    BuiltIn {
        id: "cafe",
        name: "Cafe",
        icon: "☕",
        sounds: &[("coffee-shop", 50), ("keyboard", 25)],
    },
    BuiltIn {
        id: "rain",
        name: "Rain",
        icon: "🌧️",
        sounds: &[("light-rain", 60), ("thunder", 20)],
    },
    BuiltIn {
        id: "forest",
        name: "Forest",
        icon: "🌳",
        sounds: &[("wind-in-trees", 45), ("river", 35), ("droplets", 25)],
    },
    BuiltIn {
        id: "ocean",
        name: "Ocean",
        icon: "🌊",
        sounds: &[("waves", 55), ("wind", 30)],
    },
    BuiltIn {
        id: "train-ride",
        name: "Train Ride",
        icon: "🚂",
        sounds: &[("inside-a-train", 50), ("light-rain", 25)],
    },
    BuiltIn {
        id: "night",
        name: "Night",
        icon: "🌙",
        sounds: &[("campfire", 45), ("rain-on-leaves", 30), ("wind", 15)],
    },
    BuiltIn {
        id: "library",
        name: "Library",
        icon: "📚",
        sounds: &[("library", 50), ("clock", 15)],
    },
    BuiltIn {
        id: "cozy",
        name: "Cozy",
        icon: "🐱",
        sounds: &[("cat-purring", 40), ("campfire", 35), ("vinyl-effect", 20)],
    },
    BuiltIn {
        id: "deep-focus",
        name: "Deep Focus",
        icon: "🧠",
        sounds: &[("brown-noise", 60)],
    },
];

impl BuiltIn {
    fn to_preset(&self) -> SoundPreset {
        SoundPreset {
            id: self.id.to_string(),
            name: self.name.to_string(),
            icon: Some(self.icon.to_string()),
            sounds: self
                .sounds
                .iter()
                .map(|(id, volume)| AmbientSoundState::new(id, *volume))
                .collect(),
            is_built_in: true,
        }
    }
}

pub fn built_in_presets() -> Vec<SoundPreset> {
    BUILT_INS.iter().map(BuiltIn::to_preset).collect()
}

pub fn built_in_preset(id: &str) -> Option<SoundPreset> {
    BUILT_INS
        .iter()
        .find(|preset| preset.id == id)
        .map(BuiltIn::to_preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_sound;

    #[test]
    fn built_ins_reference_catalog_sounds() {
        for preset in built_in_presets() {
            assert!(preset.is_built_in);
            for sound in &preset.sounds {
                assert!(find_sound(&sound.id).is_some(), "{} -> {}", preset.id, sound.id);
                assert!(sound.volume > 0);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        let forest = built_in_preset("forest").expect("forest preset");
        assert_eq!(forest.sounds.len(), 3);
        assert!(built_in_preset("user-1").is_none());
    }
}
