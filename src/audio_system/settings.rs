/// Process-wide volume and mute state.
use crate::catalog::MUSIC_ATTENUATION;

/// Global volume/mute applied uniformly to every registered resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalAudioSettings {
    volume: f32,
    muted: bool,
}

impl GlobalAudioSettings {
    pub fn new(volume: f64, muted: bool) -> Self {
        Self {
            volume: clamp_volume(volume),
            muted,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Store a new volume, clamped to 0.0-1.0. Returns the stored value.
    pub fn set_volume(&mut self, volume: f64) -> f32 {
        self.volume = clamp_volume(volume);
        self.volume
    }

    /// Flip the mute flag. Returns the new flag.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Volume for the background music resource.
    pub fn music_volume(&self) -> f32 {
        self.volume * MUSIC_ATTENUATION
    }
}

impl Default for GlobalAudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

/// Clamp to 0.0-1.0; NaN coerces to 0.
pub fn clamp_volume(volume: f64) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_clamping() {
        let mut settings = GlobalAudioSettings::default();
        assert_eq!(settings.set_volume(-1.0), 0.0);
        assert_eq!(settings.set_volume(5.0), 1.0);
        assert_eq!(settings.set_volume(0.5), 0.5);
        assert_eq!(settings.set_volume(f64::NAN), 0.0);
        assert_eq!(settings.set_volume(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_music_is_attenuated() {
        let settings = GlobalAudioSettings::new(0.5, false);
        assert!((settings.music_volume() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_toggle_mute_round_trip() {
        let mut settings = GlobalAudioSettings::default();
        assert!(settings.toggle_mute());
        assert!(!settings.toggle_mute());
        assert!(!settings.is_muted());
    }
}
