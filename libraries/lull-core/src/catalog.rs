//! In-memory sound catalog

use crate::traits::SoundCatalog;
use crate::types::{Sound, SoundTag};

/// Catalog backed by a fixed list of sounds
///
/// Keys are unique; a later duplicate replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    sounds: Vec<Sound>,
}

impl StaticCatalog {
    pub fn new(sounds: impl IntoIterator<Item = Sound>) -> Self {
        let mut catalog = Self::default();
        for sound in sounds {
            catalog.insert(sound);
        }
        catalog
    }

    pub fn insert(&mut self, sound: Sound) {
        match self.sounds.iter_mut().find(|s| s.key == sound.key) {
            Some(existing) => *existing = sound,
            None => self.sounds.push(sound),
        }
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }
}

impl SoundCatalog for StaticCatalog {
    fn get(&self, sound_key: &str) -> Option<Sound> {
        self.sounds.iter().find(|s| s.key == sound_key).cloned()
    }

    fn filter(&self, tag: Option<SoundTag>) -> Vec<Sound> {
        self.sounds
            .iter()
            .filter(|s| match tag {
                Some(t) => s.has_tag(t),
                None => true,
            })
            .cloned()
            .collect()
    }
}
