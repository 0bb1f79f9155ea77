use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::Decoder;

/// An encoded sound file held in memory.
#[derive(Debug, Clone)]
pub struct SoundData {
    label: String,
    bytes: Arc<[u8]>,
}

impl SoundData {
    /// Read `path` and verify that it decodes.
    pub fn load(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read sound {}: {e}", path.display()))?;
        Self::from_bytes(&path.display().to_string(), bytes)
    }

    pub fn from_bytes(label: &str, bytes: Vec<u8>) -> Result<Self, String> {
        let sound = Self {
            label: label.to_string(),
            bytes: Arc::from(bytes),
        };
        sound.decoder()?;
        Ok(sound)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, String> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes)))
            .map_err(|e| format!("Failed to decode sound {}: {e}", self.label))
    }
}

/// Load a sound, degrading to silence on failure.
pub fn load_sound_or_silent(path: &Path) -> Option<SoundData> {
    match SoundData::load(path) {
        Ok(sound) => {
            log::info!("Loaded sound '{}'", path.display());
            Some(sound)
        }
        Err(err) => {
            log::error!("{err}. Continuing without this sound.");
            None
        }
    }
}
