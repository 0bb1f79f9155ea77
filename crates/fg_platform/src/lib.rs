pub mod resources;
pub mod window;

pub use resources::ResourceLocator;
pub use window::PlatformConfig;
