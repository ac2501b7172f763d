// Asset file loading

use super::AssetError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Image,
    Sound,
    Font,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetType::Image => "image",
            AssetType::Sound => "sound",
            AssetType::Font => "font",
        };
        f.write_str(name)
    }
}

/// Asset loader responsible for finding and reading asset files
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Load asset bytes from disk
    pub fn load_bytes<P: AsRef<Path>>(
        &self,
        asset_type: AssetType,
        path: P,
    ) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve_path(path);

        if !full.is_file() {
            return Err(AssetError::NotFound(full.display().to_string()));
        }

        log::debug!("reading {} {}", asset_type, full.display());
        Ok(std::fs::read(&full)?)
    }

    /// Check if an asset exists
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.resolve_path(path).is_file()
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
