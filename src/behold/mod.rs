//! Behold (reward-reveal) screenshot analysis.

use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;

use crate::assets::{self, AssetStore};
use crate::counting::count_occurrences;
use crate::error::ScanResult;
use crate::features::{CatalogBuilder, MatchResult, SymbolCatalog, Trainer};
use crate::{geometry, prep};

#[cfg(test)]
mod tests;

/// Symbol under which the title banner reference is trained.
pub const TITLE_SYMBOL: &str = "behold_title";

/// Star strips are rescaled to this pixel height before counting, so one
/// reference star glyph covers all input resolutions.
const STAR_STRIP_HEIGHT: u32 = 72;
/// The close-button corner is rescaled to this fixed square.
const CLOSE_CORNER_SIZE: u32 = 78;
const STAR_THRESHOLD: f32 = 0.8;
/// Stricter match for the close button: any hit means the screenshot is a
/// dismissable dialog, not a behold.
const CLOSE_THRESHOLD: f32 = 0.7;

/// Per-analysis result record. `error` is advisory: downstream consumers may
/// still accept the rest of the record when other heuristics score highly.
#[derive(Debug, Clone, Serialize)]
pub struct BeholdResult {
    pub input_width: u32,
    pub input_height: u32,
    pub top: MatchResult,
    pub crew1: MatchResult,
    pub crew2: MatchResult,
    pub crew3: MatchResult,
    pub error: String,
    pub closebuttons: u32,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
}

impl BeholdResult {
    fn empty(input_width: u32, input_height: u32, file_size: u64) -> Self {
        Self {
            input_width,
            input_height,
            top: MatchResult::no_match(),
            crew1: MatchResult::no_match(),
            crew2: MatchResult::no_match(),
            crew3: MatchResult::no_match(),
            error: String::new(),
            closebuttons: 0,
            file_size,
        }
    }
}

/// Orchestrates behold analysis: symbol catalog lookups for the title banner
/// and crew portraits, star counting, and close-button rejection.
pub struct BeholdAnalyzer {
    store: AssetStore,
    trainer: Trainer,
    catalog: Arc<SymbolCatalog>,
    star_full: GrayImage,
    close_button: GrayImage,
}

impl BeholdAnalyzer {
    pub fn new(base_path: &str) -> Self {
        Self {
            store: AssetStore::new(base_path),
            trainer: Trainer::new(base_path),
            catalog: Arc::new(CatalogBuilder::new().build()),
            star_full: GrayImage::new(0, 0),
            close_button: GrayImage::new(0, 0),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_parts(
        catalog: SymbolCatalog,
        star_full: GrayImage,
        close_button: GrayImage,
    ) -> Self {
        Self {
            store: AssetStore::new("."),
            trainer: Trainer::new("."),
            catalog: Arc::new(catalog),
            star_full,
            close_button,
        }
    }

    /// Rebuild the symbol catalog wholesale: train (or reuse cached
    /// descriptors for) the title banner plus every entry of the asset
    /// catalog, then publish the new catalog atomically. In-flight matches
    /// keep using the previous catalog instance.
    pub fn reinitialize(&mut self, force_refresh: bool) -> ScanResult<()> {
        self.star_full = self.store.load_glyph("starfull.png")?;
        self.close_button = self.store.load_glyph("closeButton.png")?;

        let mut builder = CatalogBuilder::new();

        self.trainer
            .train_file("data/behold_title.png", TITLE_SYMBOL, force_refresh)?;
        if self.trainer.is_trained(TITLE_SYMBOL) {
            builder.add(self.trainer.read(TITLE_SYMBOL)?, TITLE_SYMBOL);
        }

        for (symbol, url) in self.store.catalog_entries()? {
            self.trainer.train_url(&url, &symbol, force_refresh)?;
            if self.trainer.is_trained(&symbol) {
                builder.add(self.trainer.read(&symbol)?, &symbol);
            } else {
                // Blank reference art yields no descriptors; leave it out so
                // the index-to-symbol table stays aligned with insertions.
                log::debug!("'{symbol}' has no descriptors, left out of catalog");
            }
        }

        let catalog = builder.build();
        log::info!("behold catalog rebuilt: {} symbols", catalog.len());
        self.catalog = Arc::new(catalog);
        Ok(())
    }

    /// Fetch a screenshot over HTTP and analyze it.
    pub fn analyze_url(&self, url: &str) -> BeholdResult {
        match assets::fetch_image(url) {
            Ok((image, file_size)) => self.analyze(&image, file_size),
            Err(e) => {
                let mut result = BeholdResult::empty(0, 0, 0);
                result.error = e.to_string();
                result
            }
        }
    }

    /// Analyze a decoded screenshot. Never panics and never returns an
    /// error; failures land in the record's `error` string.
    pub fn analyze(&self, query: &DynamicImage, file_size: u64) -> BeholdResult {
        let rgb = prep::flatten(query);
        let mut result = BeholdResult::empty(rgb.width(), rgb.height(), file_size);
        if let Err(e) = self.analyze_into(&rgb, &mut result) {
            if result.error.is_empty() {
                result.error = e.to_string();
            }
        }
        result
    }

    fn analyze_into(&self, rgb: &RgbImage, result: &mut BeholdResult) -> ScanResult<()> {
        let (width, height) = rgb.dimensions();
        let gray = prep::luma_of(rgb);

        let Ok(title_band) = geometry::behold_title_band(width, height) else {
            result.error = "Top row was empty".to_string();
            return Ok(());
        };
        result.top = self.catalog.match_region(&title_band.crop_luma(&gray));
        if result.top.symbol != TITLE_SYMBOL {
            // Advisory: other heuristics may still accept the record.
            result.error = "Top row doesn't look like a behold title".to_string();
        }

        let columns = geometry::crew_columns(width, height)?;
        result.crew1 = self.catalog.match_region(&columns[0].crop_luma(&gray));
        result.crew2 = self.catalog.match_region(&columns[1].crop_luma(&gray));
        result.crew3 = self.catalog.match_region(&columns[2].crop_luma(&gray));

        // Counting is the expensive part; skip it unless all three portraits
        // actually matched something.
        let all_matched =
            result.crew1.score > 0 && result.crew2.score > 0 && result.crew3.score > 0;
        if !all_matched {
            return Ok(());
        }

        let strips = geometry::star_strips(width, height)?;
        let counts: Vec<u8> = strips
            .iter()
            .map(|strip| {
                let crop = strip.crop_luma(&gray);
                let scaled = image::imageops::resize(
                    &crop,
                    crop.width() * STAR_STRIP_HEIGHT / crop.height(),
                    STAR_STRIP_HEIGHT,
                    FilterType::Lanczos3,
                );
                count_occurrences(&scaled, &self.star_full, STAR_THRESHOLD).min(u32::from(u8::MAX))
                    as u8
            })
            .collect();
        result.crew1.stars = counts[0];
        result.crew2.stars = counts[1];
        result.crew3.stars = counts[2];

        // A close button in the top-right corner means this is some other
        // dismissable dialog; surface the count and let the caller decide.
        let corner = geometry::close_button_corner(width, height)?;
        let corner_crop = image::imageops::resize(
            &corner.crop_luma(&gray),
            CLOSE_CORNER_SIZE,
            CLOSE_CORNER_SIZE,
            FilterType::Lanczos3,
        );
        result.closebuttons = count_occurrences(&corner_crop, &self.close_button, CLOSE_THRESHOLD);

        Ok(())
    }
}
