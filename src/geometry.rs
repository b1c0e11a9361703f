//! Proportional zone geometry for the two supported screenshot layouts.
//!
//! Every zone is a fixed fraction of the input dimensions, derived empirically
//! from the game's fixed UI layout. Nothing here inspects pixel content.

use crate::error::{ScanError, ScanResult};
use image::{GrayImage, RgbImage};

/// An axis-aligned pixel rectangle inside a known image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Build a region from row/column spans, validating against the image
    /// bounds. Spans are signed because callers derive them from anchor
    /// offsets that can go negative on unexpected layouts.
    pub fn from_spans(
        row_start: i64,
        row_end: i64,
        col_start: i64,
        col_end: i64,
        width: u32,
        height: u32,
    ) -> ScanResult<Self> {
        let valid = row_start >= 0
            && col_start >= 0
            && row_end > row_start
            && col_end > col_start
            && row_end <= i64::from(height)
            && col_end <= i64::from(width);
        if !valid {
            return Err(ScanError::InvalidRegion {
                row_start,
                row_end,
                col_start,
                col_end,
                width,
                height,
            });
        }
        Ok(Self {
            x: col_start as u32,
            y: row_start as u32,
            width: (col_end - col_start) as u32,
            height: (row_end - row_start) as u32,
        })
    }

    pub fn crop_luma(&self, image: &GrayImage) -> GrayImage {
        image::imageops::crop_imm(image, self.x, self.y, self.width, self.height).to_image()
    }

    pub fn crop_rgb(&self, image: &RgbImage) -> RgbImage {
        image::imageops::crop_imm(image, self.x, self.y, self.width, self.height).to_image()
    }
}

/// Title banner band of a behold screen: a short strip across the middle
/// third of the top edge.
pub fn behold_title_band(width: u32, height: u32) -> ScanResult<Region> {
    let depth = (height / 13).min(80);
    Region::from_spans(
        0,
        i64::from(depth),
        i64::from(width / 3),
        i64::from(width * 2 / 3),
        width,
        height,
    )
}

/// The three crew portrait columns of a behold screen, left to right.
///
/// Columns are thirds of the width with a 30 px inset; the vertical band runs
/// from 1/4 to 9/16 of the height.
pub fn crew_columns(width: u32, height: u32) -> ScanResult<[Region; 3]> {
    let row_start = i64::from(height) * 2 / 8;
    let row_end = i64::from(height) * 9 / 16;
    column_triplet(width, height, row_start, row_end)
}

/// Star rating strips, one under each crew portrait.
pub fn star_strips(width: u32, height: u32) -> ScanResult<[Region; 3]> {
    let scale = f64::from(width) / 100.0;
    column_triplet(
        width,
        height,
        (scale * 9.2) as i64,
        (scale * 12.8) as i64,
    )
}

/// Crew name caption strips, between the portraits and the star strips.
pub fn name_strips(width: u32, height: u32) -> ScanResult<[Region; 3]> {
    let scale = f64::from(width) / 100.0;
    column_triplet(
        width,
        height,
        (scale * 5.8) as i64,
        (scale * 9.1) as i64,
    )
}

fn column_triplet(
    width: u32,
    height: u32,
    row_start: i64,
    row_end: i64,
) -> ScanResult<[Region; 3]> {
    let w = i64::from(width);
    let left = Region::from_spans(row_start, row_end, 30, w / 3, width, height)?;
    let mid = Region::from_spans(row_start, row_end, w / 3 + 30, w * 2 / 3, width, height)?;
    let right = Region::from_spans(row_start, row_end, w * 2 / 3 + 30, w - 30, width, height)?;
    Ok([left, mid, right])
}

/// Top-right corner square where a close button sits on dismissable dialogs.
pub fn close_button_corner(width: u32, height: u32) -> ScanResult<Region> {
    let side = (f64::from(width.min(height)) * 0.11) as i64;
    Region::from_spans(0, side, i64::from(width) - side, i64::from(width), width, height)
}

/// Voyage top band searched for the antimatter icon.
pub fn voyage_top_band(width: u32, height: u32) -> ScanResult<Region> {
    let depth = (height / 5).max(80);
    Region::from_spans(
        0,
        i64::from(depth.min(height)),
        i64::from(width / 3),
        i64::from(width * 2 / 3),
        width,
        height,
    )
}

/// Voyage bottom band holding the skill instrument panel.
///
/// The panel's on-screen depth tracks the aspect ratio, so the band height is
/// proportional to `width / height`.
pub fn voyage_bottom_band(width: u32, height: u32) -> ScanResult<Region> {
    let aspect = f64::from(width) / f64::from(height);
    let depth = (f64::from(height) * aspect * 1.2 / 9.0) as i64;
    let h = i64::from(height);
    Region::from_spans(
        h - depth,
        h,
        i64::from(width / 6),
        i64::from(width * 5 / 6),
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_band_is_capped_at_80_rows() {
        let band = behold_title_band(900, 2000).unwrap();
        assert_eq!(band.y, 0);
        assert_eq!(band.height, 80);
        assert_eq!(band.x, 300);
        assert_eq!(band.width, 300);

        let short = behold_title_band(900, 390).unwrap();
        assert_eq!(short.height, 30);
    }

    #[test]
    fn crew_columns_are_inset_thirds() {
        let [left, mid, right] = crew_columns(900, 1200).unwrap();
        assert_eq!(left.x, 30);
        assert_eq!(left.width, 270);
        assert_eq!(mid.x, 330);
        assert_eq!(right.x, 630);
        assert_eq!(right.width, 240);
        assert_eq!(left.y, 300);
        assert_eq!(left.height, 375);
    }

    #[test]
    fn star_strips_sit_between_title_and_portraits() {
        let [strip, ..] = star_strips(900, 1200).unwrap();
        assert_eq!(strip.y, 82);
        assert_eq!(strip.height, 33);
    }

    #[test]
    fn name_strips_sit_above_star_strips() {
        let [name, ..] = name_strips(900, 1200).unwrap();
        let [stars, ..] = star_strips(900, 1200).unwrap();
        assert!(name.y + name.height <= stars.y + 1);
    }

    #[test]
    fn close_corner_hugs_top_right() {
        let corner = close_button_corner(900, 1200).unwrap();
        assert_eq!(corner.x + corner.width, 900);
        assert_eq!(corner.y, 0);
        assert_eq!(corner.width, 99);
        assert_eq!(corner.height, 99);
    }

    #[test]
    fn voyage_top_band_has_a_floor() {
        let band = voyage_top_band(600, 300).unwrap();
        assert_eq!(band.height, 80);
        let tall = voyage_top_band(600, 1500).unwrap();
        assert_eq!(tall.height, 300);
    }

    #[test]
    fn voyage_bottom_band_tracks_aspect_ratio() {
        let band = voyage_bottom_band(900, 1200).unwrap();
        // aspect 0.75 -> depth = 1200 * 0.75 * 1.2 / 9 = 120
        assert_eq!(band.height, 120);
        assert_eq!(band.y, 1080);
        assert_eq!(band.x, 150);
        assert_eq!(band.width, 600);
    }

    #[test]
    fn spans_outside_bounds_are_rejected() {
        assert!(Region::from_spans(0, 10, -5, 10, 100, 100).is_err());
        assert!(Region::from_spans(0, 10, 50, 50, 100, 100).is_err());
        assert!(Region::from_spans(0, 101, 0, 10, 100, 100).is_err());
        assert!(crew_columns(60, 1200).is_err());
    }

    #[test]
    fn crop_respects_region_bounds() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(5, 5, image::Luma([200]));
        let region = Region::from_spans(4, 8, 4, 8, 10, 10).unwrap();
        let crop = region.crop_luma(&img);
        assert_eq!(crop.dimensions(), (4, 4));
        assert_eq!(crop.get_pixel(1, 1)[0], 200);
    }
}
