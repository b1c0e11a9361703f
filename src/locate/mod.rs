//! Scale-invariant anchor search.
//!
//! The voyage instrument panel scales with the screenshot resolution by an
//! unknown factor. To pin it down, known reference icons are resized across a
//! range of candidate heights and correlated against a search band; the first
//! height where the anchor(s) clear the threshold fixes the panel's scale and
//! pixel origin, from which every other field offset is derived.

use image::imageops::FilterType;
use image::GrayImage;
use imageproc::template_matching::{match_template, MatchTemplateMethod};

use crate::prep;


/// Candidate-height scan parameters for one anchor kind.
#[derive(Debug, Clone)]
pub struct ScaleScan {
    pub min_height: u32,
    pub max_height: u32,
    pub step: u32,
    pub threshold: f32,
}

impl ScaleScan {
    /// Single-anchor antimatter search over the top band.
    pub fn antimatter(band_height: u32) -> Self {
        Self {
            min_height: band_height / 4,
            max_height: band_height / 2,
            step: (band_height / 32).max(1),
            threshold: 0.8,
        }
    }

    /// Two-anchor command/science search over the skill panel band. Stricter
    /// threshold because both anchors must lock simultaneously.
    pub fn skill_panel(band_height: u32) -> Self {
        Self {
            min_height: band_height * 3 / 15,
            max_height: band_height * 5 / 15,
            step: (band_height / 30).max(1),
            threshold: 0.9,
        }
    }

    fn heights(&self) -> impl Iterator<Item = u32> + '_ {
        (self.min_height..=self.max_height).step_by(self.step.max(1) as usize)
    }
}

/// A located anchor: match origin plus the scaled glyph dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorFix {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub score: f32,
}

/// Find a single anchor glyph in the band, or `None` when the scan range is
/// exhausted; the caller must then treat layout extraction as impossible.
pub fn find_anchor(band: &GrayImage, glyph: &GrayImage, scan: &ScaleScan) -> Option<AnchorFix> {
    if glyph.width() == 0 || glyph.height() == 0 {
        return None;
    }

    let mut masked = band.clone();
    prep::mask_dim_pixels(&mut masked, prep::BRIGHTNESS_FLOOR);

    for height in scan.heights() {
        let Some(scaled) = rescale_to_height(glyph, height, band) else {
            continue;
        };
        let (score, x, y) = peak_correlation(&masked, &scaled);
        if score > scan.threshold {
            log::debug!("anchor locked at height {height}, score {score:.3}");
            return Some(AnchorFix {
                x,
                y,
                width: scaled.width(),
                height,
                score,
            });
        }
    }
    None
}

/// Find two anchors that must both clear the threshold at the same candidate
/// height. Returns the pair in argument order.
pub fn find_anchor_pair(
    band: &GrayImage,
    glyph_a: &GrayImage,
    glyph_b: &GrayImage,
    scan: &ScaleScan,
) -> Option<(AnchorFix, AnchorFix)> {
    if glyph_a.height() == 0 || glyph_b.height() == 0 {
        return None;
    }

    let mut masked = band.clone();
    prep::mask_dim_pixels(&mut masked, prep::BRIGHTNESS_FLOOR);

    for height in scan.heights() {
        let (Some(scaled_a), Some(scaled_b)) = (
            rescale_to_height(glyph_a, height, band),
            rescale_to_height(glyph_b, height, band),
        ) else {
            continue;
        };

        let (score_a, ax, ay) = peak_correlation(&masked, &scaled_a);
        let (score_b, bx, by) = peak_correlation(&masked, &scaled_b);

        if score_a > scan.threshold && score_b > scan.threshold {
            log::debug!(
                "anchor pair locked at height {height}, scores {score_a:.3}/{score_b:.3}"
            );
            return Some((
                AnchorFix {
                    x: ax,
                    y: ay,
                    width: scaled_a.width(),
                    height,
                    score: score_a,
                },
                AnchorFix {
                    x: bx,
                    y: by,
                    width: scaled_b.width(),
                    height,
                    score: score_b,
                },
            ));
        }
    }
    None
}

/// Resize a glyph to a candidate height preserving aspect ratio; `None` when
/// the result would be degenerate or larger than the search band.
fn rescale_to_height(glyph: &GrayImage, height: u32, band: &GrayImage) -> Option<GrayImage> {
    let width = glyph.width() * height / glyph.height();
    if width == 0 || height == 0 || width > band.width() || height > band.height() {
        return None;
    }
    Some(image::imageops::resize(
        glyph,
        width,
        height,
        FilterType::Lanczos3,
    ))
}

/// Peak of the normalized cross-correlation surface: (value, x, y).
fn peak_correlation(band: &GrayImage, template: &GrayImage) -> (f32, u32, u32) {
    let response = match_template(band, template, MatchTemplateMethod::CrossCorrelationNormalized);
    let mut best = (0.0f32, 0u32, 0u32);
    for (x, y, pixel) in response.enumerate_pixels() {
        let v = pixel[0];
        if v.is_finite() && v > best.0 {
            best = (v, x, y);
        }
    }
    best
}
