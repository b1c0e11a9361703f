//! End-to-end behold analysis on synthetic screenshots.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};

use super::{BeholdAnalyzer, TITLE_SYMBOL};
use crate::features::{CatalogBuilder, FastBriefExtractor, FeatureExtractor, NO_MATCH};
use crate::testutil::{blob_texture, checker_glyph, paste_gray_on_rgb};

const WIDTH: u32 = 900;
const HEIGHT: u32 = 1200;

struct Fixture {
    title: GrayImage,
    crew: [GrayImage; 3],
    star_base: GrayImage,
    close_base: GrayImage,
}

impl Fixture {
    fn new() -> Self {
        Self {
            title: blob_texture(21, 300, 80),
            crew: [
                blob_texture(22, 270, 375),
                blob_texture(23, 270, 375),
                blob_texture(24, 240, 375),
            ],
            star_base: checker_glyph(33, 33, 8),
            close_base: checker_glyph(26, 26, 13),
        }
    }

    fn analyzer(&self) -> BeholdAnalyzer {
        let extractor = FastBriefExtractor::default();
        let mut builder = CatalogBuilder::new();
        builder.add(extractor.extract(&self.title), TITLE_SYMBOL);
        builder.add(extractor.extract(&self.crew[0]), "crew_alpha");
        builder.add(extractor.extract(&self.crew[1]), "crew_beta");
        builder.add(extractor.extract(&self.crew[2]), "crew_gamma");

        let star_ref = image::imageops::resize(&self.star_base, 72, 72, FilterType::Lanczos3);
        let close_ref = image::imageops::resize(&self.close_base, 78, 78, FilterType::Lanczos3);
        BeholdAnalyzer::with_parts(builder.build(), star_ref, close_ref)
    }

    /// Compose a behold screenshot with the given star counts per crew
    /// column and optionally the title banner.
    fn screenshot(&self, star_counts: [usize; 3], with_title: bool) -> RgbImage {
        let mut canvas = RgbImage::new(WIDTH, HEIGHT);
        if with_title {
            paste_gray_on_rgb(&mut canvas, &self.title, 300, 0);
        }
        paste_gray_on_rgb(&mut canvas, &self.crew[0], 30, 300);
        paste_gray_on_rgb(&mut canvas, &self.crew[1], 330, 300);
        paste_gray_on_rgb(&mut canvas, &self.crew[2], 630, 300);

        // Star strips sit at rows 82..115; columns start at x 30/330/630.
        let strip_x = [30u32, 330, 630];
        let offsets = [0u32, 99, 198];
        for (column, &count) in star_counts.iter().enumerate() {
            for &offset in offsets.iter().take(count) {
                paste_gray_on_rgb(&mut canvas, &self.star_base, strip_x[column] + offset, 82);
            }
        }
        canvas
    }
}

#[test]
fn full_behold_is_recognized() {
    let fixture = Fixture::new();
    let analyzer = fixture.analyzer();
    let screenshot = fixture.screenshot([2, 3, 1], true);

    let result = analyzer.analyze(&DynamicImage::ImageRgb8(screenshot), 1234);

    assert_eq!(result.input_width, WIDTH);
    assert_eq!(result.input_height, HEIGHT);
    assert_eq!(result.file_size, 1234);
    assert_eq!(result.top.symbol, TITLE_SYMBOL);
    assert_eq!(result.crew1.symbol, "crew_alpha");
    assert_eq!(result.crew2.symbol, "crew_beta");
    assert_eq!(result.crew3.symbol, "crew_gamma");
    assert_eq!(result.crew1.stars, 2);
    assert_eq!(result.crew2.stars, 3);
    assert_eq!(result.crew3.stars, 1);
    assert_eq!(result.closebuttons, 0);
    assert!(result.error.is_empty(), "unexpected error: {}", result.error);
}

#[test]
fn missing_title_is_a_soft_error() {
    let fixture = Fixture::new();
    let analyzer = fixture.analyzer();
    let screenshot = fixture.screenshot([2, 2, 2], false);

    let result = analyzer.analyze(&DynamicImage::ImageRgb8(screenshot), 0);

    assert_eq!(result.top.symbol, NO_MATCH);
    assert!(!result.error.is_empty());
    // The rest of the record is still populated.
    assert_eq!(result.crew1.symbol, "crew_alpha");
    assert_eq!(result.crew1.stars, 2);
}

#[test]
fn close_button_flags_a_non_behold() {
    let fixture = Fixture::new();
    let analyzer = fixture.analyzer();
    let mut screenshot = fixture.screenshot([1, 1, 1], true);

    // Corner square is min(900, 1200) * 0.11 = 99 px at the top-right.
    let corner = image::imageops::resize(&fixture.close_base, 99, 99, FilterType::Lanczos3);
    paste_gray_on_rgb(&mut screenshot, &corner, WIDTH - 99, 0);

    let result = analyzer.analyze(&DynamicImage::ImageRgb8(screenshot), 0);
    assert!(result.closebuttons > 0);
}

#[test]
fn sixteen_bit_input_is_normalized() {
    let fixture = Fixture::new();
    let analyzer = fixture.analyzer();
    let screenshot = fixture.screenshot([1, 1, 1], true);

    let deep = DynamicImage::ImageRgb16(DynamicImage::ImageRgb8(screenshot).to_rgb16());
    let result = analyzer.analyze(&deep, 0);
    assert_eq!(result.top.symbol, TITLE_SYMBOL);
    assert_eq!(result.crew2.symbol, "crew_beta");
    assert_eq!(result.crew2.stars, 1);
}

#[test]
fn degenerate_input_reports_empty_top_row() {
    let fixture = Fixture::new();
    let analyzer = fixture.analyzer();

    let result = analyzer.analyze(&DynamicImage::ImageRgb8(RgbImage::new(900, 10)), 0);
    assert_eq!(result.error, "Top row was empty");
    assert_eq!(result.top.score, 0);
}
