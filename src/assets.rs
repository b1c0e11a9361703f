//! Reference asset access: glyph images and the symbol catalog listing under
//! the asset base path, plus HTTP retrieval for remote references.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::GrayImage;
use serde::Deserialize;

use crate::error::{ScanError, ScanResult};
use crate::prep;

/// Fetch raw bytes from a URL with the blocking HTTP client. Retry policy,
/// if any, belongs to the caller's environment, not the engine.
pub fn fetch_bytes(url: &str) -> ScanResult<Vec<u8>> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// Fetch and decode a screenshot, returning the image and its byte size.
pub fn fetch_image(url: &str) -> ScanResult<(image::DynamicImage, u64)> {
    let bytes = fetch_bytes(url)?;
    let image = image::load_from_memory(&bytes)?;
    Ok((image, bytes.len() as u64))
}

#[derive(Deserialize)]
struct AssetCatalog {
    // BTreeMap so catalog iteration order is stable across runs.
    assets: BTreeMap<String, String>,
}

/// Read-only view over the asset base directory:
///
/// ```text
/// <base>/data/       reference glyphs, assets.json
/// <base>/train/      descriptor cache records (written by the trainer)
/// ```
pub struct AssetStore {
    base_path: PathBuf,
}

impl AssetStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load a reference glyph as 8-bit grayscale.
    pub fn load_glyph(&self, name: &str) -> ScanResult<GrayImage> {
        let path = self.base_path.join("data").join(name);
        if !path.is_file() {
            return Err(ScanError::MissingAsset { path });
        }
        let image = image::open(&path)?;
        Ok(prep::luma_of(&prep::flatten(&image)))
    }

    /// Symbol -> reference URL listing from `data/assets.json`, in sorted
    /// symbol order.
    pub fn catalog_entries(&self) -> ScanResult<BTreeMap<String, String>> {
        let path = self.base_path.join("data").join("assets.json");
        if !path.is_file() {
            return Err(ScanError::MissingAsset { path });
        }
        let text = std::fs::read_to_string(&path)?;
        let catalog: AssetCatalog = serde_json::from_str(&text)?;
        Ok(catalog.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_parse_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(
            data.join("assets.json"),
            r#"{"assets": {"zeta": "http://example/z.png", "alpha": "http://example/a.png"}}"#,
        )
        .unwrap();

        let store = AssetStore::new(dir.path());
        let entries = store.catalog_entries().unwrap();
        let symbols: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(symbols, vec!["alpha", "zeta"]);
        assert_eq!(entries["alpha"], "http://example/a.png");
    }

    #[test]
    fn missing_assets_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            store.load_glyph("starfull.png"),
            Err(ScanError::MissingAsset { .. })
        ));
        assert!(store.catalog_entries().is_err());
    }
}
