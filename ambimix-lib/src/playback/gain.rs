//! Level math. Volumes are integer percentages, outputs are linear 0..1.

/// Effective output of one sound: `sound * master / 10000`.
pub fn effective_level(sound_volume: u8, master_volume: u8) -> f32 {
    let sound = sound_volume.min(100) as f32;
    let master = master_volume.min(100) as f32;
    sound * master / 10_000.0
}

/// Level actually written to a voice.
pub fn output_level(sound_volume: u8, master_volume: u8, envelope: f32, muted: bool) -> f32 {
    if muted {
        return 0.0;
    }
    effective_level(sound_volume, master_volume) * envelope.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_is_multiplicative() {
        assert!((effective_level(80, 50) - 0.4).abs() < 1e-6);
        assert_eq!(effective_level(100, 100), 1.0);
        assert_eq!(effective_level(0, 100), 0.0);
        assert_eq!(effective_level(255, 255), 1.0);
    }

    #[test]
    fn mute_and_envelope_apply_on_top() {
        assert_eq!(output_level(80, 50, 1.0, true), 0.0);
        assert!((output_level(80, 50, 0.5, false) - 0.2).abs() < 1e-6);
    }
}
