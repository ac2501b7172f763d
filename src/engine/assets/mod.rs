// Asset management system
//
// Loads images, sounds and fonts on first use and keeps them for the session.

mod cache;
mod loader;
mod manager;
mod types;

pub use cache::ResourceCache;
pub use loader::{AssetLoader, AssetType};
pub use manager::{AssetManager, AssetStats};
pub use types::{FontAsset, ImageAsset, SoundAsset};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
