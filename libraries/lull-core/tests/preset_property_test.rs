//! Property-based tests for the preset equality contract

use lull_core::{Preset, PresetPlaybackState};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn arbitrary_states() -> impl Strategy<Value = Vec<PresetPlaybackState>> {
    prop::collection::vec(("[a-z]{1,8}", 0.0f32..=1.0, 1u32..600), 0..12).prop_map(|entries| {
        // Sound keys are unique within a mix
        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|(key, _, _)| seen.insert(key.clone()))
            .map(|(key, volume, period)| PresetPlaybackState::new(key, volume, period))
            .collect()
    })
}

fn hash_of(preset: &Preset) -> u64 {
    let mut hasher = DefaultHasher::new();
    preset.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    /// Property: states are sorted by sound key right after construction
    #[test]
    fn states_sorted_after_construction(states in arbitrary_states()) {
        let preset = Preset::new("p", states);
        let keys: Vec<_> = preset.playback_states().iter().map(|s| s.sound_key.clone()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    /// Property: input order does not affect identity
    #[test]
    fn equality_is_order_independent(states in arbitrary_states()) {
        let mut reversed = states.clone();
        reversed.reverse();
        let a = Preset::new("a", states);
        let b = Preset::new("b", reversed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    /// Property: different names never break equality or hashing
    #[test]
    fn names_do_not_affect_identity(
        states in arbitrary_states(),
        name_a in "[A-Za-z ]{0,20}",
        name_b in "[A-Za-z ]{0,20}",
    ) {
        let a = Preset::new(name_a, states.clone());
        let b = Preset::new(name_b, states);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    /// Property: a stored preset reads back equal to itself
    #[test]
    fn survives_storage_format(states in arbitrary_states()) {
        let preset = Preset::new("stored", states);
        let json = serde_json::to_string(&preset).unwrap();
        let back: Preset = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&back.id, &preset.id);
        prop_assert_eq!(back, preset);
    }
}
