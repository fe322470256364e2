mod focus;
mod preset;
mod sound;

pub use focus::{FocusChange, FocusRequestResult};
pub use preset::{clamp_volume, Preset, PresetPlaybackState};
pub use sound::{Sound, SoundTag};
