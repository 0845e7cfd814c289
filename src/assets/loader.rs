// Asset file lookup and loading

use super::AssetError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    /// Action channel definitions
    Channel,
    /// Input source definitions (keyboard bindings)
    Input,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Channel => "channels",
            AssetType::Input => "inputs",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Channel | AssetType::Input => &["json"],
        }
    }
}

/// Asset loader responsible for finding and loading asset files
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
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, asset_type: AssetType, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        let bytes = std::fs::read(&path).map_err(AssetError::Io)?;
        Ok(bytes)
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }

    /// List all assets of a given type, sorted by file name
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>> {
        let dir = self.base_path.join(asset_type.default_directory());

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        let extensions = asset_type.extensions();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let matches = path
                .extension()
                .is_some_and(|ext| extensions.contains(&ext.to_string_lossy().as_ref()));
            if let (true, Some(name)) = (matches, path.file_name()) {
                assets.push(name.to_string_lossy().to_string());
            }
        }

        // Stable load order regardless of directory iteration order
        assets.sort();
        Ok(assets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
