//! Random mix generation
//!
//! Picks a uniformly random count of distinct sounds and gives each a random
//! gain (and, for one-shot sounds, a random repeat interval).

use crate::error::{PlaybackError, Result};
use crate::types::PlaybackConfig;
use lull_core::{PresetPlaybackState, Sound, SoundTag};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Build an ad-hoc mix from `sounds`
///
/// The count is drawn from `size`, capped at the number of sounds available.
/// A lower bound of zero is treated as one.
///
/// # Errors
/// `InsufficientCatalog` when `sounds` holds fewer entries than the lower
/// bound, `InvalidOperation` for an empty range.
pub fn random_mix<R: Rng + ?Sized>(
    rng: &mut R,
    sounds: &[Sound],
    tag: Option<SoundTag>,
    size: RangeInclusive<usize>,
    config: &PlaybackConfig,
) -> Result<Vec<PresetPlaybackState>> {
    let min = (*size.start()).max(1);
    let max = *size.end();

    if max < min {
        return Err(PlaybackError::InvalidOperation(format!(
            "empty size range {}..={}",
            size.start(),
            max
        )));
    }

    if sounds.len() < min {
        return Err(PlaybackError::InsufficientCatalog {
            tag: tag.map_or_else(|| "any".to_string(), |t| t.to_string()),
            required: min,
            available: sounds.len(),
        });
    }

    let count = rng.gen_range(min..=max.min(sounds.len()));
    let (volume_lo, volume_hi) = ordered(config.random_volume_min, config.random_volume_max);
    let (period_lo, period_hi) = ordered(config.min_time_period_secs, config.max_time_period_secs);

    let states = sounds
        .choose_multiple(rng, count)
        .map(|sound| {
            let volume = rng.gen_range(volume_lo..=volume_hi);
            let time_period = if sound.is_looping {
                config.default_time_period_secs
            } else {
                rng.gen_range(period_lo..=period_hi)
            };
            PresetPlaybackState::new(sound.key.clone(), volume, time_period)
        })
        .collect();

    Ok(states)
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
