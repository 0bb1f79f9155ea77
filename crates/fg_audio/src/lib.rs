//! Audio playback via rodio.
//!
//! Sound effects are read into memory once at startup and decoded on every
//! play, so triggering a sound never touches the filesystem. A missing or
//! undecodable file is not an error for the caller: the loader logs it and
//! returns `None`, and playing `None` is a silent no-op.

mod sound;
mod system;

pub use sound::{load_sound_or_silent, SoundData};
pub use system::AudioSystem;
