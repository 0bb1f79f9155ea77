use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes, WindowButtons};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl PlatformConfig {
    pub fn inner_size(&self) -> LogicalSize<u32> {
        LogicalSize::new(self.width, self.height)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Fishing Game".to_string(),
            width: 400,
            height: 800,
        }
    }
}

/// Create the single fixed-size game window. Layout is computed once from
/// `config`, so the window is never resizable.
pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(config.title.as_str())
        .with_inner_size(config.inner_size())
        .with_resizable(false)
        .with_enabled_buttons(WindowButtons::CLOSE | WindowButtons::MINIMIZE);

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::info!(
        "Window created: '{}' {}x{} (scale factor {:.2})",
        config.title,
        config.width,
        config.height,
        window.scale_factor()
    );
    Arc::new(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_fishing_game_portrait() {
        let config = PlatformConfig::default();
        assert_eq!(config.title, "Fishing Game");
        assert_eq!(config.inner_size(), LogicalSize::new(400, 800));
    }
}
