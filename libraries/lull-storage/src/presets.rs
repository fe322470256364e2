//! Saved preset list
//!
//! The list is stored as one JSON array under [`PRESETS_KEY`] and is never
//! patched in place: every mutation reads the list, changes the copy, and
//! writes the whole list back.

use crate::backend::KeyValueStore;
use crate::error::Result;
use lull_core::{LullError, Preset};
use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Storage key of the preset list
pub const PRESETS_KEY: &str = "presets";

/// Whole-list preset persistence
#[derive(Clone)]
pub struct PresetStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PresetStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read every saved preset in stored order
    ///
    /// A missing, unreadable, or malformed list reads as empty.
    pub fn read_all(&self) -> Vec<Preset> {
        let raw = match self.backend.get(PRESETS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read presets: {}", e);
                return Vec::new();
            }
        };

        let (presets, missing_ids) = match decode_presets(&raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Ignoring stored presets: {}", e);
                return Vec::new();
            }
        };

        // Ids generated for older records must stick, or they never match again
        if missing_ids {
            match self.write_all(&presets) {
                Ok(()) => info!(count = presets.len(), "assigned ids to stored presets"),
                Err(e) => warn!("Failed to persist generated preset ids: {}", e),
            }
        }

        presets
    }

    /// Replace the whole list
    pub fn write_all(&self, presets: &[Preset]) -> Result<()> {
        let raw = serde_json::to_string(presets)?;
        self.backend.set(PRESETS_KEY, raw)?;
        debug!(count = presets.len(), "presets written");
        Ok(())
    }

    /// Add a preset at the end of the list
    pub fn append(&self, preset: Preset) -> Result<()> {
        let mut presets = self.read_all();
        presets.push(preset);
        self.write_all(&presets)
    }

    /// Remove the preset at `index` in stored order
    ///
    /// Returns the removed preset, or `None` if `index` is out of range.
    pub fn remove_at(&self, index: usize) -> Result<Option<Preset>> {
        let mut presets = self.read_all();
        if index >= presets.len() {
            return Ok(None);
        }

        let removed = presets.remove(index);
        self.write_all(&presets)?;
        Ok(Some(removed))
    }

    pub fn find_by_id(&self, id: &str) -> Option<Preset> {
        self.read_all().into_iter().find(|p| p.id == id)
    }

    /// Saved presets in display order (name, then id)
    pub fn sorted_by_name(&self) -> Vec<Preset> {
        let mut presets = self.read_all();
        presets.sort_by(Preset::cmp_by_name);
        presets
    }
}

/// Decode the stored list, reporting whether any record had no id
fn decode_presets(raw: &str) -> lull_core::Result<(Vec<Preset>, bool)> {
    let corrupt = |e: serde_json::Error| LullError::CorruptPersistedPreset(e.to_string());

    let records: Vec<Value> = serde_json::from_str(raw).map_err(corrupt)?;
    let missing_ids = records
        .iter()
        .any(|record| !matches!(record.get("id"), Some(Value::String(id)) if !id.is_empty()));

    let presets = records
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<Preset>, _>>()
        .map_err(corrupt)?;

    Ok((presets, missing_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use lull_core::PresetPlaybackState;

    fn preset(name: &str, key: &str) -> Preset {
        Preset::new(name, vec![PresetPlaybackState::new(key, 0.5, 60)])
    }

    fn store() -> (PresetStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        (PresetStore::new(backend.clone()), backend)
    }

    #[test]
    fn empty_when_nothing_stored() {
        let (presets, _) = store();
        assert!(presets.read_all().is_empty());
    }

    #[test]
    fn append_and_remove() {
        let (presets, _) = store();
        presets.append(preset("one", "rain")).unwrap();
        presets.append(preset("two", "wind")).unwrap();
        presets.append(preset("three", "fire")).unwrap();

        let removed = presets.remove_at(1).unwrap().unwrap();
        assert_eq!(removed.name, "two");

        let names: Vec<_> = presets.read_all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["one", "three"]);
        assert!(presets.remove_at(5).unwrap().is_none());
    }

    #[test]
    fn corrupt_list_reads_as_empty() {
        let (presets, backend) = store();
        backend
            .set(PRESETS_KEY, r#"[{"name": 3}]"#.to_string())
            .unwrap();
        assert!(presets.read_all().is_empty());
        assert!(matches!(
            decode_presets(r#"{"not": "a list"}"#),
            Err(LullError::CorruptPersistedPreset(_))
        ));

        // The next write replaces the corrupt value
        presets.append(preset("fresh", "rain")).unwrap();
        assert_eq!(presets.read_all().len(), 1);
    }

    #[test]
    fn generated_ids_are_stable_across_reads() {
        let (presets, backend) = store();
        backend
            .set(
                PRESETS_KEY,
                r#"[{"name":"Old","playbackStates":[{"soundKey":"rain","volume":0.4,"timePeriod":60}]}]"#
                    .to_string(),
            )
            .unwrap();

        let first = presets.read_all();
        let second = presets.read_all();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, second[0].id);

        let found = presets.find_by_id(&first[0].id).unwrap();
        assert_eq!(found.name, "Old");
    }

    #[test]
    fn lists_with_ids_are_not_rewritten() {
        let (presets, backend) = store();
        let raw = r#"[{"id":"a","name":"Kept","playbackStates":[]}]"#.to_string();
        backend.set(PRESETS_KEY, raw.clone()).unwrap();

        assert_eq!(presets.read_all()[0].id, "a");
        assert_eq!(backend.get(PRESETS_KEY).unwrap(), Some(raw));
    }

    #[test]
    fn find_and_sort() {
        let (presets, _) = store();
        let zen = preset("Zen", "rain");
        let zen_id = zen.id.clone();
        presets
            .write_all(&[zen, preset("Alpha", "wind"), preset("Mid", "fire")])
            .unwrap();

        assert_eq!(presets.find_by_id(&zen_id).unwrap().name, "Zen");
        assert!(presets.find_by_id("nope").is_none());

        let names: Vec<_> = presets
            .sorted_by_name()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zen"]);
    }
}
