//! Startup asset loading with placeholder fallback.
//!
//! Each asset is loaded independently. A failure is logged and replaced by a
//! deterministic stand-in (a solid colour for images, silence for sounds), so
//! one bad file never stops the others from loading or the game from running.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use fg_audio::{load_sound_or_silent, SoundData};
use fg_core::layout::{SceneLayout, Size};
use fg_platform::ResourceLocator;

pub const CAST_SOUND_PATH: &str = "assets/cast_sound.mp3";
pub const CLICK_SOUND_PATH: &str = "assets/button_click.mp3";
pub const MUSIC_PATH: &str = "assets/background_music.mp3";

/// Every image drawn on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Background,
    CharacterIdle,
    CharacterCasting,
    ButtonReleased,
    ButtonPressed,
}

impl TextureKey {
    pub const ALL: [TextureKey; 5] = [
        TextureKey::Background,
        TextureKey::CharacterIdle,
        TextureKey::CharacterCasting,
        TextureKey::ButtonReleased,
        TextureKey::ButtonPressed,
    ];

    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Background => "assets/background.png",
            Self::CharacterIdle => "assets/character_idle.png",
            Self::CharacterCasting => "assets/character_casting.png",
            Self::ButtonReleased => "assets/button_normal_new.png",
            Self::ButtonPressed => "assets/button_pressed_new.png",
        }
    }

    pub fn placeholder_color(self) -> [u8; 3] {
        match self {
            Self::Background => [135, 206, 235],
            Self::CharacterIdle => [255, 0, 0],
            Self::CharacterCasting => [0, 255, 0],
            Self::ButtonReleased => [0, 0, 255],
            Self::ButtonPressed => [0, 100, 255],
        }
    }

    /// On-screen size of this image in `layout`.
    pub fn target_size(self, layout: &SceneLayout) -> Size {
        let rect = match self {
            Self::Background => layout.background,
            Self::CharacterIdle | Self::CharacterCasting => layout.character,
            Self::ButtonReleased | Self::ButtonPressed => layout.button,
        };
        Size::new(rect.width.max(1), rect.height.max(1))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::CharacterIdle => "character_idle",
            Self::CharacterCasting => "character_casting",
            Self::ButtonReleased => "button_released",
            Self::ButtonPressed => "button_pressed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAsset {
    Decoded {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    },
    Placeholder {
        color: [u8; 3],
    },
}

impl ImageAsset {
    pub fn decode(path: &Path) -> Result<Self, String> {
        let image = image::open(path)
            .map_err(|e| format!("Failed to load image {}: {e}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(format!("Image {} has zero size", path.display()));
        }
        Ok(Self::Decoded {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    pub fn load_or_placeholder(path: &Path, color: [u8; 3]) -> Self {
        match Self::decode(path) {
            Ok(asset) => asset,
            Err(err) => {
                log::error!("{err}. Using placeholder colour {:?}.", color);
                Self::Placeholder { color }
            }
        }
    }

    /// Resample a decoded image to the size it is drawn at. Images are never
    /// uploaded larger than their on-screen rectangle.
    pub fn fit_to(self, size: Size) -> Self {
        let (width, height, rgba) = match self {
            Self::Decoded {
                width,
                height,
                rgba,
            } if (width, height) != (size.width, size.height) => (width, height, rgba),
            other => return other,
        };
        let Some(source) = image::RgbaImage::from_raw(width, height, rgba) else {
            log::error!("Decoded image buffer does not match {width}x{height}");
            return Self::Placeholder {
                color: [255, 0, 255],
            };
        };
        let resized =
            image::imageops::resize(&source, size.width, size.height, FilterType::Triangle);
        log::debug!("Resized image {width}x{height} -> {}x{}", size.width, size.height);
        Self::Decoded {
            width: size.width,
            height: size.height,
            rgba: resized.into_raw(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Sounds triggered by gameplay. `None` entries play nothing.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    pub click: Option<SoundData>,
    pub cast: Option<SoundData>,
}

pub struct GameAssets {
    pub images: HashMap<TextureKey, ImageAsset>,
    pub sounds: SoundBank,
    pub music_path: PathBuf,
}

impl GameAssets {
    pub fn load(locator: &ResourceLocator, layout: &SceneLayout) -> Self {
        let images = TextureKey::ALL
            .iter()
            .map(|&key| {
                let path = locator.resolve(key.asset_path());
                let image = ImageAsset::load_or_placeholder(&path, key.placeholder_color())
                    .fit_to(key.target_size(layout));
                (key, image)
            })
            .collect();

        let sounds = SoundBank {
            click: load_sound_or_silent(&locator.resolve(CLICK_SOUND_PATH)),
            cast: load_sound_or_silent(&locator.resolve(CAST_SOUND_PATH)),
        };

        let assets = Self {
            images,
            sounds,
            music_path: locator.resolve(MUSIC_PATH),
        };
        log::info!(
            "Assets loaded: {} image(s) using placeholders, {} sound(s) silent",
            assets.placeholder_image_count(),
            assets.silent_sound_count()
        );
        assets
    }

    pub fn image(&self, key: TextureKey) -> Option<&ImageAsset> {
        self.images.get(&key)
    }

    pub fn placeholder_image_count(&self) -> u32 {
        self.images.values().filter(|i| i.is_placeholder()).count() as u32
    }

    pub fn silent_sound_count(&self) -> u32 {
        [&self.sounds.click, &self.sounds.cast]
            .iter()
            .filter(|s| s.is_none())
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::layout::{ScaleMapping, DESIGN_CANVAS};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "fg_assets_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(dir.join("assets")).expect("create temp asset dir");
        dir
    }

    fn layout() -> SceneLayout {
        let mapping = ScaleMapping::new(DESIGN_CANVAS, Size::new(400, 800));
        SceneLayout::compute(&mapping)
    }

    fn decoded_size(asset: Option<&ImageAsset>) -> Option<(u32, u32)> {
        match asset {
            Some(ImageAsset::Decoded { width, height, rgba }) => {
                assert_eq!(rgba.len(), (*width as usize) * (*height as usize) * 4);
                Some((*width, *height))
            }
            _ => None,
        }
    }

    fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
        image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))
            .save(path)
            .expect("write temp png");
    }

    #[test]
    fn decode_reads_rgba_pixels() {
        let dir = temp_dir("decode");
        let path = dir.join("assets/background.png");
        write_png(&path, 3, 2, [10, 20, 30, 255]);

        let asset = ImageAsset::decode(&path).expect("png should decode");
        match asset {
            ImageAsset::Decoded {
                width,
                height,
                rgba,
            } => {
                assert_eq!((width, height), (3, 2));
                assert_eq!(rgba.len(), 3 * 2 * 4);
                assert_eq!(&rgba[..4], &[10, 20, 30, 255]);
            }
            ImageAsset::Placeholder { .. } => panic!("expected decoded image"),
        }

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_image_becomes_placeholder() {
        let dir = temp_dir("missing");
        let asset = ImageAsset::load_or_placeholder(&dir.join("nope.png"), [1, 2, 3]);
        assert_eq!(asset, ImageAsset::Placeholder { color: [1, 2, 3] });
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_image_becomes_placeholder() {
        let dir = temp_dir("corrupt");
        let path = dir.join("assets/character_idle.png");
        fs::write(&path, b"not a png").expect("write corrupt file");
        let asset = ImageAsset::load_or_placeholder(&path, [255, 0, 0]);
        assert!(asset.is_placeholder());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn one_failed_asset_does_not_block_the_others() {
        let dir = temp_dir("partial");
        write_png(&dir.join("assets/background.png"), 4, 4, [0, 0, 0, 255]);
        write_png(&dir.join("assets/button_pressed_new.png"), 2, 2, [9, 9, 9, 255]);
        fs::write(dir.join("assets/character_idle.png"), b"garbage").expect("write");

        let assets = GameAssets::load(&ResourceLocator::new(dir.clone()), &layout());

        assert_eq!(assets.images.len(), TextureKey::ALL.len());
        assert!(!assets.image(TextureKey::Background).expect("bg").is_placeholder());
        assert!(!assets
            .image(TextureKey::ButtonPressed)
            .expect("pressed")
            .is_placeholder());
        assert_eq!(
            assets.image(TextureKey::CharacterIdle),
            Some(&ImageAsset::Placeholder {
                color: [255, 0, 0]
            })
        );
        assert_eq!(assets.placeholder_image_count(), 3);
        assert_eq!(assets.silent_sound_count(), 2);
        assert_eq!(assets.music_path, dir.join(MUSIC_PATH));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn decoded_images_are_resized_to_their_layout_rect() {
        let dir = temp_dir("resize");
        write_png(&dir.join("assets/background.png"), 800, 1600, [1, 2, 3, 255]);
        write_png(&dir.join("assets/button_normal_new.png"), 495, 495, [4, 5, 6, 255]);
        write_png(&dir.join("assets/character_casting.png"), 10, 20, [7, 8, 9, 255]);

        let layout = layout();
        let assets = GameAssets::load(&ResourceLocator::new(dir.clone()), &layout);

        assert_eq!(
            decoded_size(assets.image(TextureKey::Background)),
            Some((400, 800))
        );
        assert_eq!(
            decoded_size(assets.image(TextureKey::ButtonReleased)),
            Some((layout.button.width, layout.button.height))
        );
        // Smaller sources are scaled up to the same on-screen size.
        assert_eq!(
            decoded_size(assets.image(TextureKey::CharacterCasting)),
            Some((layout.character.width, layout.character.height))
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn fit_to_keeps_placeholders_and_matching_sizes() {
        let placeholder = ImageAsset::Placeholder { color: [1, 1, 1] };
        assert_eq!(placeholder.clone().fit_to(Size::new(5, 5)), placeholder);

        let exact = ImageAsset::Decoded {
            width: 2,
            height: 1,
            rgba: vec![9; 8],
        };
        assert_eq!(exact.clone().fit_to(Size::new(2, 1)), exact);
    }

    #[test]
    fn placeholder_colours_are_distinct_per_state() {
        assert_ne!(
            TextureKey::CharacterIdle.placeholder_color(),
            TextureKey::CharacterCasting.placeholder_color()
        );
        assert_ne!(
            TextureKey::ButtonReleased.placeholder_color(),
            TextureKey::ButtonPressed.placeholder_color()
        );
    }
}
