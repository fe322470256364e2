//! Property-based tests for random mix generation

use lull_core::{Sound, SoundTag};
use lull_playback::{random_mix, PlaybackConfig, PlaybackError};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn catalog(size: usize) -> Vec<Sound> {
    (0..size)
        .map(|i| {
            if i % 3 == 0 {
                Sound::one_shot(format!("sound{i}"), &[SoundTag::Relax])
            } else {
                Sound::looping(format!("sound{i}"), &[SoundTag::Relax])
            }
        })
        .collect()
}

proptest! {
    /// Property: a satisfiable request yields distinct catalog sounds within
    /// the requested count and configured bounds
    #[test]
    fn mix_respects_bounds(
        seed in any::<u64>(),
        catalog_size in 1usize..12,
        min in 0usize..6,
        extra in 0usize..6,
    ) {
        let sounds = catalog(catalog_size);
        let config = PlaybackConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);

        let result = random_mix(&mut rng, &sounds, None, min..=min + extra, &config);

        if catalog_size < min.max(1) {
            let is_insufficient = matches!(result, Err(PlaybackError::InsufficientCatalog { .. }));
            prop_assert!(is_insufficient);
            return Ok(());
        }

        let mix = result.unwrap();
        prop_assert!(mix.len() >= min.max(1));
        prop_assert!(mix.len() <= (min + extra).min(catalog_size));

        let keys: HashSet<_> = mix.iter().map(|s| s.sound_key.as_str()).collect();
        prop_assert_eq!(keys.len(), mix.len());

        for state in &mix {
            let sound = sounds.iter().find(|s| s.key == state.sound_key).unwrap();
            prop_assert!(state.volume >= config.random_volume_min);
            prop_assert!(state.volume <= config.random_volume_max);
            if sound.is_looping {
                prop_assert_eq!(state.time_period, config.default_time_period_secs);
            } else {
                prop_assert!(state.time_period >= config.min_time_period_secs);
                prop_assert!(state.time_period <= config.max_time_period_secs);
            }
        }
    }

    /// Property: the same seed always draws the same mix
    #[test]
    fn mix_is_deterministic_per_seed(seed in any::<u64>()) {
        let sounds = catalog(8);
        let config = PlaybackConfig::default();

        let first = random_mix(&mut StdRng::seed_from_u64(seed), &sounds, None, 2..=5, &config);
        let second = random_mix(&mut StdRng::seed_from_u64(seed), &sounds, None, 2..=5, &config);
        prop_assert_eq!(first.unwrap(), second.unwrap());
    }
}
