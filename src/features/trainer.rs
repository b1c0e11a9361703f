//! Symbol training: turn one reference image into a cached descriptor set.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::assets;
use crate::error::{ScanError, ScanResult};
use crate::features::cache;
use crate::features::extractor::{Descriptor, FastBriefExtractor, FeatureExtractor};
use crate::prep;

/// Builds and persists descriptor sets, one `<symbol>.bin` record per symbol
/// under `<base>/train/`. Training is skipped when a cache record already
/// exists, unless forced; extraction over the full asset catalog is the most
/// expensive startup cost, so the cache dominates reinitialization time.
pub struct Trainer {
    base_path: PathBuf,
    extractor: FastBriefExtractor,
}

impl Trainer {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            extractor: FastBriefExtractor::default(),
        }
    }

    fn cache_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join("train").join(format!("{symbol}.bin"))
    }

    /// Whether a cached descriptor record exists for this symbol.
    pub fn is_trained(&self, symbol: &str) -> bool {
        self.cache_path(symbol).is_file()
    }

    /// Train from an image file relative to the asset base path.
    pub fn train_file(&self, relative: &str, symbol: &str, force: bool) -> ScanResult<()> {
        if !force && self.is_trained(symbol) {
            return Ok(());
        }
        let path = self.base_path.join(relative);
        if !path.is_file() {
            return Err(ScanError::MissingAsset { path });
        }
        let image = image::open(&path)?;
        self.train_image(&image, symbol, force)
    }

    /// Train from a reference image fetched over HTTP.
    pub fn train_url(&self, url: &str, symbol: &str, force: bool) -> ScanResult<()> {
        if !force && self.is_trained(symbol) {
            return Ok(());
        }
        let bytes = assets::fetch_bytes(url)?;
        let image = image::load_from_memory(&bytes)?;
        self.train_image(&image, symbol, force)
    }

    /// Train from an already decoded reference image.
    ///
    /// The reference is cropped to its top 70% height before extraction to
    /// exclude the variable-height name caption. A crop that yields zero
    /// descriptors (blank or placeholder reference art) is silently skipped:
    /// no cache record is written and no error is raised.
    pub fn train_image(&self, image: &DynamicImage, symbol: &str, force: bool) -> ScanResult<()> {
        let out_path = self.cache_path(symbol);
        if !force && out_path.is_file() {
            return Ok(());
        }

        let rgb = prep::flatten(image);
        let gray = prep::luma_of(&rgb);
        let cropped = image::imageops::crop_imm(
            &gray,
            0,
            0,
            gray.width(),
            gray.height() * 7 / 10,
        )
        .to_image();

        let descriptors = self.extractor.extract(&cropped);
        if descriptors.is_empty() {
            log::debug!("no descriptors for '{symbol}', skipping");
            return Ok(());
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        cache::write_descriptors(&out_path, &descriptors)?;
        log::debug!("trained '{symbol}': {} descriptors", descriptors.len());
        Ok(())
    }

    /// Load the cached descriptor set for a trained symbol.
    pub fn read(&self, symbol: &str) -> ScanResult<Vec<Descriptor>> {
        cache::read_descriptors(&self.cache_path(symbol))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
