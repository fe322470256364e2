//! Preset data model
//!
//! A preset is a named, persisted mix. Identity is the sorted list of
//! per-sound settings only: `id` and `name` are labels, so a renamed preset
//! still matches the mix that is playing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Clamp a gain into `0.0..=1.0`
///
/// NaN maps to silence and negative zero to positive zero, so that equal
/// gains always have equal bit patterns.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    // -0.0 + 0.0 == +0.0
    volume.clamp(0.0, 1.0) + 0.0
}

/// Settings of one sound inside a preset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetPlaybackState {
    pub sound_key: String,

    /// Normalized gain
    pub volume: f32,

    /// Repeat interval in seconds for non-looping sounds
    pub time_period: u32,
}

impl PresetPlaybackState {
    pub fn new(sound_key: impl Into<String>, volume: f32, time_period: u32) -> Self {
        Self {
            sound_key: sound_key.into(),
            volume: clamp_volume(volume),
            time_period,
        }
    }
}

impl PartialEq for PresetPlaybackState {
    fn eq(&self, other: &Self) -> bool {
        self.sound_key == other.sound_key
            && self.volume.to_bits() == other.volume.to_bits()
            && self.time_period == other.time_period
    }
}

impl Eq for PresetPlaybackState {}

impl Hash for PresetPlaybackState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sound_key.hash(state);
        self.volume.to_bits().hash(state);
        self.time_period.hash(state);
    }
}

/// Named, persisted mix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PresetRecord")]
pub struct Preset {
    /// Stable identifier used by commands and alarms
    pub id: String,

    /// Display label
    pub name: String,

    playback_states: Vec<PresetPlaybackState>,
}

/// Raw stored shape, normalized into a `Preset` on read
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    playback_states: Vec<PresetPlaybackState>,
}

impl From<PresetRecord> for Preset {
    fn from(record: PresetRecord) -> Self {
        let id = record
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_id);
        Self::with_id(id, record.name, record.playback_states)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Preset {
    /// Create a preset with a fresh id
    pub fn new(name: impl Into<String>, playback_states: Vec<PresetPlaybackState>) -> Self {
        Self::with_id(new_id(), name, playback_states)
    }

    /// Create a preset with a known id
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        playback_states: Vec<PresetPlaybackState>,
    ) -> Self {
        let mut playback_states: Vec<_> = playback_states
            .into_iter()
            .map(|s| PresetPlaybackState::new(s.sound_key, s.volume, s.time_period))
            .collect();
        playback_states.sort_by(|a, b| a.sound_key.cmp(&b.sound_key));

        Self {
            id: id.into(),
            name: name.into(),
            playback_states,
        }
    }

    /// Per-sound settings, sorted by sound key
    pub fn playback_states(&self) -> &[PresetPlaybackState] {
        &self.playback_states
    }

    pub fn is_empty(&self) -> bool {
        self.playback_states.is_empty()
    }

    pub fn contains(&self, sound_key: &str) -> bool {
        self.playback_states
            .binary_search_by(|s| s.sound_key.as_str().cmp(sound_key))
            .is_ok()
    }

    /// True when `states` describe the same mix as this preset
    ///
    /// `states` must already be sorted by sound key.
    pub fn matches(&self, states: &[PresetPlaybackState]) -> bool {
        self.playback_states == states
    }

    /// Display ordering: by name, ties broken by id
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialEq for Preset {
    fn eq(&self, other: &Self) -> bool {
        self.playback_states == other.playback_states
    }
}

impl Eq for Preset {}

impl Hash for Preset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.playback_states.hash(state);
    }
}
