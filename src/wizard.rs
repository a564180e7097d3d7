use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::PreviewPlayer;
use crate::catalog::{
    preview_asset_path, DurationUnit, MusicTrack, Speaker, DEFAULT_CUSTOM_VALUE,
    DEFAULT_PRESET_MINUTES, PRESET_MINUTES,
};
use crate::prefs::{PreferenceStore, PREFERRED_MUSIC_KEY, PREFERRED_SPEAKER_KEY};
use crate::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Speaker,
    Music,
    Duration,
}

impl WizardStep {
    /// 1-based position shown to the user
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Speaker => 1,
            WizardStep::Music => 2,
            WizardStep::Duration => 3,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Speaker => Some(WizardStep::Music),
            WizardStep::Music => Some(WizardStep::Duration),
            WizardStep::Duration => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            WizardStep::Speaker => None,
            WizardStep::Music => Some(WizardStep::Speaker),
            WizardStep::Duration => Some(WizardStep::Music),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomDurationError {
    #[error("custom duration is empty")]
    Empty,
    #[error("custom duration {0:?} is not a whole number")]
    NotInteger(String),
    #[error("custom duration must be greater than zero")]
    Zero,
}

/// Parse the custom duration field into minutes
pub fn parse_custom_minutes(value: &str, unit: DurationUnit) -> Result<f64, CustomDurationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CustomDurationError::Empty);
    }
    let n: u32 = trimmed
        .parse()
        .map_err(|_| CustomDurationError::NotInteger(trimmed.to_string()))?;
    if n == 0 {
        return Err(CustomDurationError::Zero);
    }
    Ok(unit.to_minutes(n))
}

/// Unsaved selections held while the wizard is open
#[derive(Debug, Clone, PartialEq)]
pub struct WizardDraft {
    pub step: WizardStep,
    pub speaker: Option<Speaker>,
    pub music: Option<MusicTrack>,
    pub preset_minutes: u32,
    pub custom_mode: bool,
    pub custom_value: String,
    pub custom_unit: DurationUnit,
    pub remember_speaker: bool,
    pub remember_music: bool,
}

impl Default for WizardDraft {
    fn default() -> Self {
        Self {
            step: WizardStep::Speaker,
            speaker: None,
            music: None,
            preset_minutes: DEFAULT_PRESET_MINUTES,
            custom_mode: false,
            custom_value: DEFAULT_CUSTOM_VALUE.to_string(),
            custom_unit: DurationUnit::default(),
            remember_speaker: false,
            remember_music: false,
        }
    }
}

/// Result of pressing Next
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Advanced(WizardStep),
    /// Session committed; the host should close the wizard
    Completed { duration_minutes: f64 },
    Blocked,
}

/// Three-step session setup dialog
#[derive(Debug)]
pub struct SetupWizard {
    draft: WizardDraft,
    previews_dir: PathBuf,
}

impl SetupWizard {
    /// Fresh draft, pre-filled from any remembered choices
    pub fn open(prefs: &dyn PreferenceStore, previews_dir: PathBuf) -> Self {
        let mut draft = WizardDraft::default();

        if let Some(speaker) = prefs
            .get(PREFERRED_SPEAKER_KEY)
            .as_deref()
            .and_then(Speaker::from_name)
        {
            draft.speaker = Some(speaker);
            draft.remember_speaker = true;
        }
        if let Some(music) = prefs
            .get(PREFERRED_MUSIC_KEY)
            .as_deref()
            .and_then(MusicTrack::from_name)
        {
            draft.music = Some(music);
            draft.remember_music = true;
        }

        debug!(speaker = ?draft.speaker, music = ?draft.music, "wizard opened");
        Self {
            draft,
            previews_dir,
        }
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    pub fn select_speaker(&mut self, speaker: Speaker) {
        self.draft.speaker = Some(speaker);
    }

    pub fn select_music(&mut self, music: MusicTrack) {
        self.draft.music = Some(music);
    }

    pub fn select_preset(&mut self, minutes: u32) {
        self.draft.preset_minutes = minutes;
        self.draft.custom_mode = false;
    }

    pub fn select_custom(&mut self) {
        self.draft.custom_mode = true;
    }

    pub fn set_remember_speaker(&mut self, remember: bool) {
        self.draft.remember_speaker = remember;
    }

    pub fn set_remember_music(&mut self, remember: bool) {
        self.draft.remember_music = remember;
    }

    /// Flip the remember flag belonging to the current step
    pub fn toggle_remember(&mut self) {
        match self.draft.step {
            WizardStep::Speaker => self.set_remember_speaker(!self.draft.remember_speaker),
            WizardStep::Music => self.set_remember_music(!self.draft.remember_music),
            WizardStep::Duration => {}
        }
    }

    pub fn set_custom_value(&mut self, value: &str) {
        self.draft.custom_value = value.to_string();
    }

    /// The custom field only takes input while it is on screen
    fn custom_editable(&self) -> bool {
        self.draft.step == WizardStep::Duration && self.draft.custom_mode
    }

    pub fn push_custom_digit(&mut self, c: char) {
        if self.custom_editable() && c.is_ascii_digit() {
            self.draft.custom_value.push(c);
        }
    }

    pub fn pop_custom_char(&mut self) {
        if self.custom_editable() {
            self.draft.custom_value.pop();
        }
    }

    pub fn set_custom_unit(&mut self, unit: DurationUnit) {
        self.draft.custom_unit = unit;
    }

    pub fn toggle_custom_unit(&mut self) {
        if self.custom_editable() {
            self.draft.custom_unit = self.draft.custom_unit.toggled();
        }
    }

    /// Move the highlighted option of the current step up or down
    pub fn cycle(&mut self, forward: bool) {
        match self.draft.step {
            WizardStep::Speaker => {
                self.draft.speaker = Some(cycle_in(&Speaker::ALL, self.draft.speaker, forward));
            }
            WizardStep::Music => {
                self.draft.music = Some(cycle_in(&MusicTrack::ALL, self.draft.music, forward));
            }
            WizardStep::Duration => {
                // presets followed by the custom entry
                let choices: Vec<Option<u32>> = PRESET_MINUTES
                    .iter()
                    .copied()
                    .map(Some)
                    .chain(std::iter::once(None))
                    .collect();
                let current = if self.draft.custom_mode {
                    None
                } else {
                    Some(self.draft.preset_minutes)
                };
                match cycle_in(&choices, Some(current), forward) {
                    Some(minutes) => self.select_preset(minutes),
                    None => self.select_custom(),
                }
            }
        }
    }

    pub fn can_back(&self) -> bool {
        self.draft.step.prev().is_some()
    }

    pub fn can_next(&self) -> bool {
        match self.draft.step {
            WizardStep::Speaker => self.draft.speaker.is_some(),
            WizardStep::Music => self.draft.music.is_some(),
            WizardStep::Duration => self.duration_minutes().is_ok(),
        }
    }

    pub fn can_preview(&self) -> bool {
        self.preview_name().is_some()
    }

    /// Minutes the session would run for with the current draft
    pub fn duration_minutes(&self) -> Result<f64, CustomDurationError> {
        if self.draft.custom_mode {
            parse_custom_minutes(&self.draft.custom_value, self.draft.custom_unit)
        } else {
            Ok(self.draft.preset_minutes as f64)
        }
    }

    pub fn back(&mut self) -> bool {
        match self.draft.step.prev() {
            Some(step) => {
                debug!(from = self.draft.step.number(), to = step.number(), "wizard back");
                self.draft.step = step;
                true
            }
            None => false,
        }
    }

    /// Advance, or at the last step commit the session
    pub fn next(
        &mut self,
        store: &mut SessionStore,
        prefs: &mut dyn PreferenceStore,
    ) -> Transition {
        if !self.can_next() {
            if let Err(e) = self.duration_minutes() {
                debug!(error = %e, "start blocked");
            }
            return Transition::Blocked;
        }

        if let Some(step) = self.draft.step.next() {
            debug!(from = self.draft.step.number(), to = step.number(), "wizard next");
            self.draft.step = step;
            return Transition::Advanced(step);
        }

        let (Some(speaker), Some(music), Ok(duration_minutes)) =
            (self.draft.speaker, self.draft.music, self.duration_minutes())
        else {
            return Transition::Blocked;
        };

        remember(
            prefs,
            PREFERRED_SPEAKER_KEY,
            self.draft.remember_speaker.then(|| speaker.to_string()),
        );
        remember(
            prefs,
            PREFERRED_MUSIC_KEY,
            self.draft.remember_music.then(|| music.to_string()),
        );

        store.set_session_options(speaker, music, duration_minutes);
        store.start_session();
        info!(%speaker, %music, duration_minutes, "wizard completed");

        Transition::Completed { duration_minutes }
    }

    /// Stop any playing preview and start the one for the current selection
    pub fn preview(&self, player: &mut dyn PreviewPlayer) -> bool {
        let Some(name) = self.preview_name() else {
            return false;
        };
        let asset = preview_asset_path(&self.previews_dir, &name);
        debug!(asset = %asset.display(), "playing preview");
        player.stop();
        player.play(&asset);
        true
    }

    fn preview_name(&self) -> Option<String> {
        match self.draft.step {
            WizardStep::Speaker => self.draft.speaker.map(|s| s.to_string()),
            WizardStep::Music => self.draft.music.map(|m| m.to_string()),
            WizardStep::Duration => None,
        }
    }
}

fn cycle_in<T: Copy + PartialEq>(items: &[T], current: Option<T>, forward: bool) -> T {
    let len = items.len();
    let idx = match current.and_then(|c| items.iter().position(|i| *i == c)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    items[idx]
}

fn remember(prefs: &mut dyn PreferenceStore, key: &str, value: Option<String>) {
    let result = match value {
        Some(v) => prefs.set(key, &v),
        None => prefs.remove(key),
    };
    if let Err(e) = result {
        warn!(key, error = %e, "could not update preference");
    }
}
