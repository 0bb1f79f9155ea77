//! Resource directory discovery.
//!
//! Asset paths are authored relative to a resource root (`assets/...`). When the
//! game ships as a bundle the assets sit next to the executable; during
//! development they live under the working directory. The executable's
//! directory wins when it contains the marker directory.

use std::path::{Path, PathBuf};

/// Directory whose presence marks a usable resource root.
pub const ASSET_DIR: &str = "assets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    root: PathBuf,
}

impl ResourceLocator {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Probe the running executable's directory, then the working directory.
    pub fn discover() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let cwd = std::env::current_dir().unwrap_or_else(|err| {
            log::warn!("Failed to read working directory: {err}. Using '.'");
            PathBuf::from(".")
        });
        let locator = Self::discover_from(exe_dir.as_deref(), &cwd);
        log::info!("Resource root: {}", locator.root.display());
        locator
    }

    pub fn discover_from(exe_dir: Option<&Path>, cwd: &Path) -> Self {
        if let Some(dir) = exe_dir {
            if dir.join(ASSET_DIR).is_dir() {
                return Self::new(dir.to_path_buf());
            }
        }
        Self::new(cwd.to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
