use std::path::{Path, PathBuf};

/// Narrator voices offered in the first wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Speaker {
    #[strum(to_string = "Calm Voice")]
    CalmVoice,
    #[strum(to_string = "Soothing Whisper")]
    SoothingWhisper,
    #[strum(to_string = "Gentle Guide")]
    GentleGuide,
}

impl Speaker {
    pub const ALL: [Speaker; 3] = [
        Speaker::CalmVoice,
        Speaker::SoothingWhisper,
        Speaker::GentleGuide,
    ];

    /// Parse a display name as written to the preference store
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.to_string() == name)
    }
}

/// Background tracks offered in the second wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MusicTrack {
    #[strum(to_string = "Ocean Waves")]
    OceanWaves,
    #[strum(to_string = "Forest Sounds")]
    ForestSounds,
    #[strum(to_string = "Soft Piano")]
    SoftPiano,
}

impl MusicTrack {
    pub const ALL: [MusicTrack; 3] = [
        MusicTrack::OceanWaves,
        MusicTrack::ForestSounds,
        MusicTrack::SoftPiano,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.to_string() == name)
    }
}

/// Fixed whole-minute durations offered before custom entry
pub const PRESET_MINUTES: [u32; 3] = [5, 10, 15];

pub const DEFAULT_PRESET_MINUTES: u32 = 5;
pub const DEFAULT_CUSTOM_VALUE: &str = "5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum DurationUnit {
    Seconds,
    #[default]
    Minutes,
}

impl DurationUnit {
    pub fn toggled(self) -> Self {
        match self {
            DurationUnit::Seconds => DurationUnit::Minutes,
            DurationUnit::Minutes => DurationUnit::Seconds,
        }
    }

    pub fn to_minutes(self, value: u32) -> f64 {
        match self {
            DurationUnit::Seconds => value as f64 / 60.0,
            DurationUnit::Minutes => value as f64,
        }
    }
}

/// File stem of a preview asset.
///
/// Only the first space is replaced; every current name has exactly one,
/// and the asset naming for longer names is not settled.
pub fn preview_slug(name: &str) -> String {
    name.to_lowercase().replacen(' ', "-", 1)
}

pub fn preview_asset_path(previews_dir: &Path, name: &str) -> PathBuf {
    previews_dir.join(format!("{}.mp3", preview_slug(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_names_roundtrip_through_display() {
        for speaker in Speaker::ALL {
            assert_eq!(Speaker::from_name(&speaker.to_string()), Some(speaker));
        }
        assert_eq!(Speaker::CalmVoice.to_string(), "Calm Voice");
        assert_eq!(Speaker::from_name("Loud Voice"), None);
        assert_eq!(Speaker::from_name(""), None);
    }

    #[test]
    fn test_music_names() {
        assert_eq!(MusicTrack::SoftPiano.to_string(), "Soft Piano");
        assert_eq!(
            MusicTrack::from_name("Forest Sounds"),
            Some(MusicTrack::ForestSounds)
        );
        assert_eq!(MusicTrack::from_name("ocean waves"), None);
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(DurationUnit::Seconds.to_minutes(90), 1.5);
        assert_eq!(DurationUnit::Minutes.to_minutes(3), 3.0);
        assert_eq!(DurationUnit::default(), DurationUnit::Minutes);
        assert_eq!(DurationUnit::Minutes.toggled(), DurationUnit::Seconds);
    }

    #[test]
    fn test_preview_slug() {
        assert_eq!(preview_slug("Calm Voice"), "calm-voice");
        assert_eq!(preview_slug("Soft Piano"), "soft-piano");
        // only the first space is rewritten
        assert_eq!(preview_slug("Very Soft Piano"), "very-soft piano");
    }

    #[test]
    fn test_preview_asset_path() {
        let path = preview_asset_path(Path::new("/previews"), "Ocean Waves");
        assert_eq!(path, PathBuf::from("/previews/ocean-waves.mp3"));
    }
}
