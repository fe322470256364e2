//! Player manager
//!
//! Owns every active [`SoundPlayer`] and is the only component that asks for
//! or gives back audio focus. No player is started unless focus is
//! `FocusGranted`; players waiting on a focus answer sit in the pending set
//! while stopped.

use crate::error::{PlaybackError, Result};
use crate::events::{EventBus, PlaybackEvent};
use crate::player::SoundPlayer;
use crate::random::random_mix;
use crate::types::{FocusState, PlaybackConfig, PlaybackState, PlayerState, SkipDirection};
use crossbeam_channel::Receiver;
use lull_core::{
    FocusArbiter, FocusChange, FocusRequestResult, LullError, PlaybackEngine, Preset,
    PresetPlaybackState, SoundCatalog, SoundTag,
};
use lull_storage::PresetStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Mix-level playback and focus authority
///
/// Orchestrates:
/// - Active players, keyed by sound key
/// - Fading tails of players already removed from the mix
/// - The focus state machine (request, delayed grant, transient and permanent loss)
/// - Saved presets (play, save, remove, skip)
pub struct PlayerManager {
    config: PlaybackConfig,
    engine: Arc<dyn PlaybackEngine>,
    catalog: Arc<dyn SoundCatalog>,
    focus: Box<dyn FocusArbiter>,
    presets: PresetStore,

    // Mix
    players: BTreeMap<String, SoundPlayer>,
    fading: Vec<SoundPlayer>,

    // Focus
    focus_state: FocusState,
    pending_start: BTreeSet<String>,
    resume_on_gain: BTreeSet<String>,

    events: EventBus,
    rng: StdRng,
}

impl PlayerManager {
    pub fn new(
        config: PlaybackConfig,
        engine: Arc<dyn PlaybackEngine>,
        catalog: Arc<dyn SoundCatalog>,
        focus: Box<dyn FocusArbiter>,
        presets: PresetStore,
    ) -> Self {
        Self {
            config,
            engine,
            catalog,
            focus,
            presets,
            players: BTreeMap::new(),
            fading: Vec::new(),
            focus_state: FocusState::NoFocus,
            pending_start: BTreeSet::new(),
            resume_on_gain: BTreeSet::new(),
            events: EventBus::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Make random mixes reproducible
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Single sounds =====

    /// Add a sound to the mix (or restart it) and start it once focus allows
    pub fn play(&mut self, sound_key: &str) -> Result<()> {
        let sound = self
            .catalog
            .get(sound_key)
            .ok_or_else(|| PlaybackError::UnknownSound(sound_key.to_string()))?;

        if self.player_state(sound_key) == Some(PlayerState::Playing) {
            return Ok(());
        }

        if !self.players.contains_key(sound_key) {
            let player = SoundPlayer::new(
                &sound,
                self.config.default_volume,
                self.config.default_time_period_secs,
                self.engine.clone(),
            );
            self.players.insert(sound_key.to_string(), player);
        }

        self.pending_start.insert(sound_key.to_string());
        self.request_playback();
        self.emit_state_changed();
        Ok(())
    }

    /// Remove one sound from the mix
    ///
    /// Removing the last sound stops the whole mix and releases focus.
    pub fn stop_sound(&mut self, sound_key: &str) {
        let Some(mut player) = self.players.remove(sound_key) else {
            debug!(sound = sound_key, "stop for sound not in mix");
            return;
        };

        self.pending_start.remove(sound_key);
        self.resume_on_gain.remove(sound_key);
        if player.fade_out(self.config.fade_out()) {
            self.fading.push(player);
        }

        if self.players.is_empty() {
            self.stop();
        } else {
            self.emit_state_changed();
        }
    }

    /// Change the gain of one sound in the mix
    pub fn set_volume(&mut self, sound_key: &str, volume: f32) -> bool {
        let Some(player) = self.players.get_mut(sound_key) else {
            return false;
        };

        player.set_volume(volume);
        self.emit_state_changed();
        true
    }

    /// Change the repeat interval of one sound in the mix
    pub fn set_time_period(&mut self, sound_key: &str, seconds: u32) -> bool {
        let Some(player) = self.players.get_mut(sound_key) else {
            return false;
        };

        player.set_time_period(seconds);
        self.emit_state_changed();
        true
    }

    // ===== Whole mix =====

    /// Pause every player, keeping the focus grant
    pub fn pause(&mut self) {
        for player in self.players.values_mut() {
            player.pause();
        }
        self.pending_start.clear();
        self.resume_on_gain.clear();
        self.stop_fading();
        debug!("mix paused");
        self.emit_state_changed();
    }

    /// Restart every paused player once focus allows
    ///
    /// No-op while focus is transiently lost: only the regain decides what
    /// comes back.
    pub fn resume(&mut self) {
        if self.players.is_empty() {
            return;
        }
        if self.focus_state == FocusState::FocusLostTransient {
            debug!("resume ignored during transient focus loss");
            return;
        }

        self.pending_start = self
            .players
            .iter()
            .filter(|(_, p)| p.state() != PlayerState::Playing)
            .map(|(key, _)| key.clone())
            .collect();
        self.request_playback();
        self.emit_state_changed();
    }

    /// Stop every player, clear the mix, and release focus
    pub fn stop(&mut self) {
        self.clear_players();
        self.release_focus();
        debug!("mix stopped");
        self.emit_state_changed();
    }

    /// Headphones unplugged or similar
    pub fn handle_becoming_noisy(&mut self) {
        if self.is_playing() {
            info!("audio output becoming noisy, pausing");
            self.pause();
        }
    }

    /// Stop everything as the last act before the owner goes away
    pub fn shutdown(&mut self) {
        self.stop();
        self.stop_fading();
    }

    /// Advance fades and one-shot repeat timers
    pub fn tick(&mut self, dt: Duration) {
        for player in self.players.values_mut() {
            player.advance(dt);
        }
        self.fading.retain_mut(|player| !player.advance(dt));
    }

    // ===== Presets =====

    /// Replace the mix with the saved preset `preset_id`
    pub fn play_preset(&mut self, preset_id: &str) -> Result<()> {
        let preset = self
            .presets
            .find_by_id(preset_id)
            .ok_or_else(|| PlaybackError::PresetNotFound(preset_id.to_string()))?;

        self.play_preset_value(&preset);
        Ok(())
    }

    /// Replace the mix with `preset`, which need not be saved
    pub fn play_preset_value(&mut self, preset: &Preset) {
        info!(preset = %preset.name, sounds = preset.playback_states().len(), "playing preset");
        self.play_mix(preset.playback_states());
    }

    /// Replace the mix with a random selection of sounds
    ///
    /// The mix is untouched when the catalog cannot satisfy `size`.
    pub fn play_random_preset(
        &mut self,
        tag: Option<SoundTag>,
        size: RangeInclusive<usize>,
    ) -> Result<()> {
        let sounds = self.catalog.filter(tag);
        let states = random_mix(&mut self.rng, &sounds, tag, size, &self.config)?;
        info!(sounds = states.len(), "playing random preset");
        self.play_mix(&states);
        Ok(())
    }

    /// Saved preset structurally equal to the live mix
    pub fn current_preset(&self) -> Option<Preset> {
        if self.players.is_empty() {
            return None;
        }

        let states = self.mix();
        self.presets
            .read_all()
            .into_iter()
            .find(|preset| preset.matches(&states))
    }

    /// Save the live mix under `name`
    ///
    /// Returns `None` when the mix is empty.
    pub fn save_current_preset(&mut self, name: &str) -> Result<Option<Preset>> {
        if self.players.is_empty() {
            return Ok(None);
        }

        let preset = Preset::new(name, self.mix());
        self.presets.append(preset.clone())?;
        info!(preset = %preset.name, id = %preset.id, "preset saved");
        self.events.emit(PlaybackEvent::PresetsChanged);
        Ok(Some(preset))
    }

    /// Delete the saved preset at `index` (stored order)
    ///
    /// Stops playback when the removed preset is the live mix.
    pub fn remove_preset(&mut self, index: usize) -> Result<Option<Preset>> {
        let Some(removed) = self.presets.remove_at(index)? else {
            return Ok(None);
        };

        info!(preset = %removed.name, "preset removed");
        self.events.emit(PlaybackEvent::PresetsChanged);

        if !self.players.is_empty() && removed.matches(&self.mix()) {
            info!("removed preset was playing, stopping");
            self.stop();
        }
        Ok(Some(removed))
    }

    /// Play the saved preset adjacent to the current one in name order
    pub fn skip_preset(&mut self, direction: SkipDirection) {
        let presets = self.presets.sorted_by_name();
        if presets.is_empty() {
            debug!("no saved presets to skip to");
            return;
        }

        let len = presets.len();
        let current = if self.players.is_empty() {
            None
        } else {
            let states = self.mix();
            presets.iter().position(|p| p.matches(&states))
        };

        let target = match (current, direction) {
            (None, SkipDirection::Next) => 0,
            (None, SkipDirection::Prev) => len - 1,
            (Some(i), SkipDirection::Next) => (i + 1) % len,
            (Some(i), SkipDirection::Prev) => (i + len - 1) % len,
        };

        self.play_preset_value(&presets[target]);
    }

    // ===== Focus =====

    /// Late answer to a request that came back `Delayed`
    pub fn handle_focus_request_result(&mut self, result: FocusRequestResult) {
        if self.focus_state != FocusState::FocusDelayed {
            debug!(?result, state = ?self.focus_state, "ignoring focus result");
            return;
        }

        self.apply_focus_result(result);
        self.emit_state_changed();
    }

    pub fn handle_focus_change(&mut self, change: FocusChange) {
        debug!(?change, state = ?self.focus_state, "focus change");

        match change {
            FocusChange::Gain => match self.focus_state {
                FocusState::FocusDelayed => {
                    self.focus_state = FocusState::FocusGranted;
                    self.start_pending();
                }
                FocusState::FocusLostTransient => {
                    self.focus_state = FocusState::FocusGranted;
                    self.pending_start = std::mem::take(&mut self.resume_on_gain);
                    self.start_pending();
                }
                _ => return,
            },
            FocusChange::TransientLoss => {
                if self.focus_state != FocusState::FocusGranted {
                    return;
                }

                self.resume_on_gain.clear();
                for (key, player) in &mut self.players {
                    if player.pause() {
                        self.resume_on_gain.insert(key.clone());
                    }
                }
                self.pending_start.clear();
                self.stop_fading();
                self.focus_state = FocusState::FocusLostTransient;
                info!(paused = self.resume_on_gain.len(), "focus lost transiently");
            }
            FocusChange::PermanentLoss => {
                if matches!(
                    self.focus_state,
                    FocusState::NoFocus | FocusState::FocusLostPermanent
                ) {
                    return;
                }

                for player in self.players.values_mut() {
                    player.stop();
                }
                self.pending_start.clear();
                self.resume_on_gain.clear();
                self.stop_fading();
                self.focus.abandon_focus();
                self.focus_state = FocusState::FocusLostPermanent;
                info!("focus lost permanently");
            }
        }

        self.emit_state_changed();
    }

    // ===== Queries =====

    pub fn focus_state(&self) -> FocusState {
        self.focus_state
    }

    pub fn is_playing(&self) -> bool {
        self.players
            .values()
            .any(|p| p.state() == PlayerState::Playing)
    }

    /// Mix is non-empty and nothing in it is audible
    pub fn is_paused(&self) -> bool {
        !self.players.is_empty() && !self.is_playing()
    }

    pub fn playback_state(&self) -> PlaybackState {
        if self.players.is_empty() {
            PlaybackState::Stopped
        } else if self.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    pub fn player_state(&self, sound_key: &str) -> Option<PlayerState> {
        self.players.get(sound_key).map(SoundPlayer::state)
    }

    /// Settings of the live mix, sorted by sound key
    pub fn mix(&self) -> Vec<PresetPlaybackState> {
        self.players
            .values()
            .map(SoundPlayer::to_playback_state)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.len()
    }

    pub fn fading_count(&self) -> usize {
        self.fading.len()
    }

    // ===== Internals =====

    fn play_mix(&mut self, states: &[PresetPlaybackState]) {
        self.clear_players();

        for state in states {
            let Some(sound) = self.catalog.get(&state.sound_key) else {
                warn!(sound = %state.sound_key, "skipping sound missing from catalog");
                continue;
            };

            let player = SoundPlayer::new(
                &sound,
                state.volume,
                state.time_period,
                self.engine.clone(),
            );
            self.players.insert(state.sound_key.clone(), player);
            self.pending_start.insert(state.sound_key.clone());
        }

        if self.players.is_empty() {
            self.release_focus();
        } else {
            self.request_playback();
        }
        self.emit_state_changed();
    }

    /// Move every player to the fading tail (or stop it) and empty the mix
    fn clear_players(&mut self) {
        let fade = self.config.fade_out();
        for (_, mut player) in std::mem::take(&mut self.players) {
            if player.fade_out(fade) {
                self.fading.push(player);
            }
        }
        self.pending_start.clear();
        self.resume_on_gain.clear();
    }

    fn stop_fading(&mut self) {
        for mut player in self.fading.drain(..) {
            player.stop();
        }
    }

    /// Start pending players now, or ask for focus first
    fn request_playback(&mut self) {
        match self.focus_state {
            FocusState::FocusGranted => self.start_pending(),
            FocusState::FocusDelayed => debug!("focus request outstanding, deferring start"),
            FocusState::FocusLostTransient => {
                debug!("focus lost transiently, not starting");
                self.pending_start.clear();
            }
            FocusState::NoFocus | FocusState::FocusLostPermanent => {
                let result = self.focus.request_focus();
                info!(?result, "requested audio focus");
                self.apply_focus_result(result);
            }
        }
    }

    fn apply_focus_result(&mut self, result: FocusRequestResult) {
        match result {
            FocusRequestResult::Granted => {
                self.focus_state = FocusState::FocusGranted;
                self.start_pending();
            }
            FocusRequestResult::Denied => {
                warn!("{}, clearing mix", LullError::FocusDenied);
                self.clear_players();
                self.stop_fading();
                self.focus_state = FocusState::NoFocus;
            }
            FocusRequestResult::Delayed => {
                self.focus_state = FocusState::FocusDelayed;
            }
        }
    }

    fn start_pending(&mut self) {
        for key in std::mem::take(&mut self.pending_start) {
            let Some(player) = self.players.get_mut(&key) else {
                continue;
            };

            if let Err(e) = player.play() {
                warn!(sound = %key, "failed to start sound: {}", e);
                self.players.remove(&key);
            }
        }

        if self.players.is_empty() {
            self.release_focus();
        }
    }

    fn release_focus(&mut self) {
        if matches!(
            self.focus_state,
            FocusState::FocusGranted | FocusState::FocusDelayed | FocusState::FocusLostTransient
        ) {
            self.focus.abandon_focus();
            debug!("audio focus released");
        }
        self.focus_state = FocusState::NoFocus;
    }

    fn emit_state_changed(&mut self) {
        self.events.emit(PlaybackEvent::StateChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EngineCall, RecordingEngine, ScriptedFocus};
    use lull_core::{Sound, StaticCatalog};
    use lull_storage::MemoryStore;

    struct Fixture {
        manager: PlayerManager,
        engine: RecordingEngine,
        focus: ScriptedFocus,
    }

    fn fixture(focus: ScriptedFocus, fade_out_ms: u64) -> Fixture {
        let engine = RecordingEngine::new();
        let catalog = StaticCatalog::new([
            Sound::looping("rain", &[SoundTag::Relax]),
            Sound::looping("wind", &[SoundTag::Relax]),
            Sound::one_shot("birds", &[SoundTag::Focus]),
        ]);
        let config = PlaybackConfig {
            fade_out_ms,
            ..PlaybackConfig::default()
        };

        let manager = PlayerManager::new(
            config,
            Arc::new(engine.clone()),
            Arc::new(catalog),
            Box::new(focus.clone()),
            PresetStore::new(Arc::new(MemoryStore::new())),
        );

        Fixture {
            manager,
            engine,
            focus,
        }
    }

    #[test]
    fn first_play_requests_focus_once() {
        let mut f = fixture(ScriptedFocus::new(), 0);

        f.manager.play("rain").unwrap();
        f.manager.play("wind").unwrap();

        assert_eq!(f.focus.requests(), 1);
        assert_eq!(f.manager.focus_state(), FocusState::FocusGranted);
        assert_eq!(f.manager.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn unknown_sound_is_rejected() {
        let mut f = fixture(ScriptedFocus::new(), 0);

        let err = f.manager.play("thunder").unwrap_err();
        assert!(matches!(err, PlaybackError::UnknownSound(_)));
        assert_eq!(f.focus.requests(), 0);
    }

    #[test]
    fn stopping_last_sound_releases_focus() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        f.manager.play("rain").unwrap();
        f.manager.play("wind").unwrap();

        f.manager.stop_sound("rain");
        assert_eq!(f.focus.abandons(), 0);
        assert_eq!(f.manager.player_state("wind"), Some(PlayerState::Playing));

        f.manager.stop_sound("wind");
        assert_eq!(f.focus.abandons(), 1);
        assert_eq!(f.manager.playback_state(), PlaybackState::Stopped);
        assert_eq!(f.manager.focus_state(), FocusState::NoFocus);
    }

    #[test]
    fn pause_and_resume_keep_focus() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        f.manager.play("rain").unwrap();

        f.manager.pause();
        assert!(f.manager.is_paused());
        assert_eq!(f.manager.focus_state(), FocusState::FocusGranted);

        f.manager.resume();
        assert!(f.manager.is_playing());
        assert_eq!(f.focus.requests(), 1);
        assert_eq!(f.focus.abandons(), 0);
    }

    #[test]
    fn becoming_noisy_only_pauses_when_playing() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        let events = f.manager.subscribe();

        f.manager.handle_becoming_noisy();
        assert_eq!(events.try_iter().count(), 0);

        f.manager.play("rain").unwrap();
        f.manager.handle_becoming_noisy();
        assert!(f.manager.is_paused());
    }

    #[test]
    fn stop_fades_playing_sounds_out_of_the_mix() {
        let mut f = fixture(ScriptedFocus::new(), 500);
        f.manager.play("rain").unwrap();

        f.manager.stop();
        assert_eq!(f.manager.active_count(), 0);
        assert_eq!(f.manager.fading_count(), 1);
        assert_eq!(f.manager.focus_state(), FocusState::NoFocus);
        assert_eq!(f.engine.count(|c| matches!(c, EngineCall::Release(_))), 0);

        f.manager.tick(Duration::from_millis(250));
        assert_eq!(f.manager.fading_count(), 1);
        f.manager.tick(Duration::from_millis(250));
        assert_eq!(f.manager.fading_count(), 0);
        assert_eq!(f.engine.count(|c| matches!(c, EngineCall::Release(_))), 1);
    }

    #[test]
    fn transient_loss_hard_stops_fading_tail() {
        let mut f = fixture(ScriptedFocus::new(), 500);
        f.manager.play("rain").unwrap();
        f.manager.play("wind").unwrap();
        f.manager.stop_sound("rain");
        assert_eq!(f.manager.fading_count(), 1);

        f.manager.handle_focus_change(FocusChange::TransientLoss);
        assert_eq!(f.manager.fading_count(), 0);
        assert_eq!(f.engine.count(|c| matches!(c, EngineCall::Release(_))), 1);
    }

    #[test]
    fn one_shot_sound_repeats_on_tick() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        f.manager.play("birds").unwrap();

        let period = f.manager.config().default_time_period_secs;
        f.manager.tick(Duration::from_secs(u64::from(period)));
        assert_eq!(f.engine.count(|c| matches!(c, EngineCall::Start(_))), 2);
    }

    #[test]
    fn volume_change_is_reflected_in_mix() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        f.manager.play("rain").unwrap();

        assert!(f.manager.set_volume("rain", 0.7));
        assert!(f.manager.set_time_period("rain", 90));
        assert!(!f.manager.set_volume("wind", 0.7));
        assert_eq!(
            f.manager.mix(),
            vec![PresetPlaybackState::new("rain", 0.7, 90)]
        );
    }

    #[test]
    fn engine_failure_drops_sound_and_releases_focus() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        f.engine.fail_open("rain");

        f.manager.play("rain").unwrap();
        assert_eq!(f.manager.active_count(), 0);
        assert_eq!(f.manager.focus_state(), FocusState::NoFocus);
        assert_eq!(f.focus.abandons(), 1);
    }

    #[test]
    fn save_current_preset_snapshots_mix() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        assert!(f.manager.save_current_preset("empty").unwrap().is_none());

        f.manager.play("wind").unwrap();
        f.manager.play("rain").unwrap();
        let saved = f.manager.save_current_preset("Storm").unwrap().unwrap();

        assert_eq!(saved.playback_states().len(), 2);
        assert_eq!(f.manager.current_preset(), Some(saved));
    }

    #[test]
    fn random_preset_replaces_mix() {
        let mut f = fixture(ScriptedFocus::new(), 0);
        f.manager.seed_rng(42);
        f.manager.play("birds").unwrap();

        f.manager
            .play_random_preset(Some(SoundTag::Relax), 2..=2)
            .unwrap();
        assert_eq!(f.manager.player_state("birds"), None);
        assert_eq!(f.manager.player_state("rain"), Some(PlayerState::Playing));
        assert_eq!(f.manager.player_state("wind"), Some(PlayerState::Playing));
    }

    #[test]
    fn shutdown_releases_focus_and_everything() {
        let mut f = fixture(ScriptedFocus::new(), 1000);
        f.manager.play("rain").unwrap();

        f.manager.shutdown();
        assert_eq!(f.manager.active_count(), 0);
        assert_eq!(f.manager.fading_count(), 0);
        assert_eq!(f.focus.abandons(), 1);
    }
}
