// Central asset management system

use super::cache::ResourceCache;
use super::types::{FontAsset, ImageAsset, SoundAsset};
use super::{AssetError, AssetLoader, AssetType};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Session-wide asset caches
///
/// One cache per category: images and sounds are keyed by path, fonts by
/// (path, pixel size).
pub struct AssetManager {
    loader: AssetLoader,
    images: ResourceCache<PathBuf, ImageAsset>,
    sounds: ResourceCache<PathBuf, SoundAsset>,
    fonts: ResourceCache<(PathBuf, u32), FontAsset>,
}

impl AssetManager {
    /// Create a new asset manager rooted at `asset_path`
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            images: ResourceCache::new(),
            sounds: ResourceCache::new(),
            fonts: ResourceCache::new(),
        }
    }

    /// Get an image, decoding it on first use
    pub fn image<P: AsRef<Path>>(&mut self, path: P) -> Result<Rc<ImageAsset>, AssetError> {
        let path = path.as_ref();
        let loader = &self.loader;
        self.images.get_or_load(path.to_path_buf(), || {
            let bytes = loader.load_bytes(AssetType::Image, path)?;
            let image = ImageAsset::from_bytes(&bytes, &path.to_string_lossy())?;
            log::debug!(
                "loaded image {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            Ok(image)
        })
    }

    /// Get a sound, decoding it on first use
    pub fn sound<P: AsRef<Path>>(&mut self, path: P) -> Result<Rc<SoundAsset>, AssetError> {
        let path = path.as_ref();
        let loader = &self.loader;
        self.sounds.get_or_load(path.to_path_buf(), || {
            let bytes = loader.load_bytes(AssetType::Sound, path)?;
            let sound = SoundAsset::from_bytes(&bytes, &path.to_string_lossy())?;
            log::debug!(
                "loaded sound {} ({:.2}s)",
                path.display(),
                sound.duration_secs()
            );
            Ok(sound)
        })
    }

    /// Get a font at a pixel size, parsing it on first use of that pair
    pub fn font<P: AsRef<Path>>(
        &mut self,
        path: P,
        size: u32,
    ) -> Result<Rc<FontAsset>, AssetError> {
        let path = path.as_ref();
        let loader = &self.loader;
        self.fonts.get_or_load((path.to_path_buf(), size), || {
            let bytes = loader.load_bytes(AssetType::Font, path)?;
            let font = FontAsset::from_bytes(&bytes, size, &path.to_string_lossy())?;
            log::debug!("loaded font {} at {}px", path.display(), size);
            Ok(font)
        })
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            image_count: self.images.len(),
            sound_count: self.sounds.len(),
            font_count: self.fonts.len(),
            image_loads: self.images.loads(),
            sound_loads: self.sounds.loads(),
            font_loads: self.fonts.loads(),
        }
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub image_count: usize,
    pub sound_count: usize,
    pub font_count: usize,
    pub image_loads: usize,
    pub sound_loads: usize,
    pub font_loads: usize,
}
