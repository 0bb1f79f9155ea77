use std::path::Path;

use rodio::stream::{OutputStream, OutputStreamBuilder};
use rodio::{Sink, Source};

use crate::sound::SoundData;

/// Owns the output device, fire-and-forget effects and the music sink.
pub struct AudioSystem {
    stream: OutputStream,
    music: Option<Sink>,
}

impl AudioSystem {
    /// Open the default output device. Returns `None` if no device is
    /// available; the game then runs silently.
    pub fn new() -> Option<Self> {
        match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                log::info!("Audio output opened");
                Some(Self {
                    stream,
                    music: None,
                })
            }
            Err(err) => {
                log::warn!("No audio output available: {err}. Running without sound.");
                None
            }
        }
    }

    /// Play a one-shot effect. `None` (a sound that failed to load) is a no-op.
    pub fn play(&self, sound: Option<&SoundData>) {
        let Some(sound) = sound else {
            return;
        };
        match sound.decoder() {
            Ok(source) => {
                let sink = Sink::connect_new(self.stream.mixer());
                sink.append(source);
                sink.detach();
            }
            Err(err) => log::error!("{err}"),
        }
    }

    /// Start looping background music at `volume` (0.0..=1.0), replacing any
    /// music already playing.
    pub fn play_music_loop(&mut self, path: &Path, volume: f32) -> Result<(), String> {
        let music = SoundData::load(path)?;
        let source = music.decoder()?.buffered().repeat_infinite();
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume);
        sink.append(source);
        if let Some(previous) = self.music.replace(sink) {
            previous.stop();
        }
        log::info!("Background music started");
        Ok(())
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.as_ref().is_some_and(|sink| !sink.empty())
    }
}
