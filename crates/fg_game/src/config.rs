//! Startup configuration.
//!
//! Window size, design canvas and timings live in one `GameConfig` built once
//! before the window opens. The file is optional: a missing file means
//! defaults, and every field left out of the file keeps its default.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use fg_core::character::{CastTimerMode, DEFAULT_CAST_DURATION_US};
use fg_core::layout::{ScaleMapping, Size, DESIGN_CANVAS, MIN_DESIGN_CANVAS};
use fg_platform::PlatformConfig;

pub const CONFIG_PATH: &str = "assets/config/game.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub design: DesignConfig,
    pub cast_duration_ms: u64,
    pub cast_timer: CastTimerMode,
    pub music_volume: f32,
    pub target_fps: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DesignConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            design: DesignConfig::default(),
            cast_duration_ms: DEFAULT_CAST_DURATION_US / 1000,
            cast_timer: CastTimerMode::default(),
            music_volume: 0.5,
            target_fps: 60,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
        }
    }
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            width: DESIGN_CANVAS.width,
            height: DESIGN_CANVAS.height,
        }
    }
}

impl GameConfig {
    pub fn window_size(&self) -> Size {
        Size::new(self.window.width, self.window.height)
    }

    pub fn design_size(&self) -> Size {
        Size::new(self.design.width, self.design.height)
    }

    pub fn scale_mapping(&self) -> ScaleMapping {
        ScaleMapping::new(self.design_size(), self.window_size())
    }

    pub fn cast_duration_us(&self) -> u64 {
        self.cast_duration_ms.saturating_mul(1000)
    }

    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config file if present. A broken file is reported and replaced by
/// defaults rather than stopping the game.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!("No config file at '{}', using defaults", path.display());
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded config '{}'", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}. Using default configuration.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err("Config validation failed: window width/height must be > 0".to_string());
    }
    if config.design.width < MIN_DESIGN_CANVAS.width
        || config.design.height < MIN_DESIGN_CANVAS.height
    {
        return Err(format!(
            "Config validation failed: design canvas {}x{} is smaller than {}x{}, \
             the button and character would be placed off-canvas",
            config.design.width,
            config.design.height,
            MIN_DESIGN_CANVAS.width,
            MIN_DESIGN_CANVAS.height
        ));
    }
    if config.cast_duration_ms == 0 {
        return Err("Config validation failed: cast_duration_ms must be > 0".to_string());
    }
    if !(0.0..=1.0).contains(&config.music_volume) {
        return Err(format!(
            "Config validation failed: music_volume {} outside [0, 1]",
            config.music_volume
        ));
    }
    if config.target_fps == 0 {
        return Err("Config validation failed: target_fps must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "fg_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn defaults_match_fishing_game_layout() {
        let config = GameConfig::default();
        assert_eq!(config.window_size(), Size::new(400, 800));
        assert_eq!(config.design_size(), Size::new(1530, 3320));
        assert_eq!(config.window.title, "Fishing Game");
        assert_eq!(config.cast_duration_us(), 2_000_000);
        assert_eq!(config.cast_timer, CastTimerMode::ArmOnce);
        assert_eq!(config.target_fps, 60);
        assert!((config.music_volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{ "window": { "width": 600 }, "cast_timer": "rearm_every_tick" }"#,
        )
        .expect("write temp config");

        let config = load_config_from_path(&path).expect("config should load");
        assert_eq!(config.window_size(), Size::new(600, 800));
        assert_eq!(config.window.title, "Fishing Game");
        assert_eq!(config.cast_timer, CastTimerMode::RearmEveryTick);
        assert_eq!(config.cast_duration_ms, 2000);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_zero_window() {
        let path = temp_file_path("zero_window");
        fs::write(&path, r#"{ "window": { "width": 0, "height": 800 } }"#)
            .expect("write temp config");
        let err = load_config_from_path(&path).expect_err("zero width should fail");
        assert!(err.contains("window width/height"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_design_canvas_too_small_for_anchors() {
        let path = temp_file_path("small_design");
        fs::write(&path, r#"{ "design": { "width": 900, "height": 3320 } }"#)
            .expect("write temp config");
        let err = load_config_from_path(&path).expect_err("narrow canvas should fail");
        assert!(err.contains("off-canvas"));

        fs::write(&path, r#"{ "design": { "width": 1530, "height": 1600 } }"#)
            .expect("write temp config");
        let err = load_config_from_path(&path).expect_err("short canvas should fail");
        assert!(err.contains("design canvas 1530x1600"));

        fs::write(&path, r#"{ "design": { "width": 950, "height": 1700 } }"#)
            .expect("write temp config");
        assert!(load_config_from_path(&path).is_ok());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let path = temp_file_path("volume");
        fs::write(&path, r#"{ "music_volume": 1.5 }"#).expect("write temp config");
        let err = load_config_from_path(&path).expect_err("volume should fail");
        assert!(err.contains("music_volume"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_unknown_timer_mode() {
        let path = temp_file_path("timer_mode");
        fs::write(&path, r#"{ "cast_timer": "sometimes" }"#).expect("write temp config");
        let err = load_config_from_path(&path).expect_err("unknown mode should fail");
        assert!(err.contains("Failed to parse config JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let missing = temp_file_path("missing");
        assert_eq!(load_config_or_default(&missing), GameConfig::default());

        let broken = temp_file_path("broken");
        fs::write(&broken, "{ not json").expect("write temp config");
        assert_eq!(load_config_or_default(&broken), GameConfig::default());
        let _ = fs::remove_file(broken);
    }

    #[test]
    fn scale_mapping_uses_configured_sizes() {
        let config = GameConfig::default();
        let mapping = config.scale_mapping();
        assert!((mapping.scale() - 800.0 / 3320.0).abs() < 1e-12);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(CONFIG_PATH);
        let config = load_config_from_path(&path).expect("shipped config should load");
        assert_eq!(config, GameConfig::default());
    }
}
