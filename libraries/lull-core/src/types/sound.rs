//! Sound catalog types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog tag used to filter random mixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundTag {
    Focus,
    Relax,
}

impl fmt::Display for SoundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundTag::Focus => f.write_str("focus"),
            SoundTag::Relax => f.write_str("relax"),
        }
    }
}

/// Catalog entry for one sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    /// Catalog identity
    pub key: String,

    #[serde(default)]
    pub tags: Vec<SoundTag>,

    /// Continuous loop, or a one-shot replayed every time period
    #[serde(default = "default_looping")]
    pub is_looping: bool,
}

fn default_looping() -> bool {
    true
}

impl Sound {
    /// Create a looping sound
    pub fn looping(key: impl Into<String>, tags: &[SoundTag]) -> Self {
        Self {
            key: key.into(),
            tags: tags.to_vec(),
            is_looping: true,
        }
    }

    /// Create a one-shot sound replayed every time period
    pub fn one_shot(key: impl Into<String>, tags: &[SoundTag]) -> Self {
        Self {
            key: key.into(),
            tags: tags.to_vec(),
            is_looping: false,
        }
    }

    pub fn has_tag(&self, tag: SoundTag) -> bool {
        self.tags.contains(&tag)
    }
}
