//! Tests for glyph counting on synthetic strips.

use image::GrayImage;

use super::count_occurrences;
use crate::testutil::{checker_glyph, paste_gray};

fn glyph() -> GrayImage {
    checker_glyph(16, 16, 4)
}

#[test]
fn count_is_monotonic_in_occurrences() {
    let glyph = glyph();
    let positions = [10u32, 70, 130];

    for n in 0..=3usize {
        let mut strip = GrayImage::new(200, 40);
        for &x in positions.iter().take(n) {
            paste_gray(&mut strip, &glyph, x, 12);
        }
        assert_eq!(
            count_occurrences(&strip, &glyph, 0.8),
            n as u32,
            "expected {n} occurrences"
        );
    }
}

#[test]
fn adjacent_peaks_are_suppressed_once() {
    let glyph = glyph();
    let mut strip = GrayImage::new(200, 40);
    // Two copies separated well beyond the suppression radius.
    paste_gray(&mut strip, &glyph, 20, 10);
    paste_gray(&mut strip, &glyph, 120, 10);
    assert_eq!(count_occurrences(&strip, &glyph, 0.8), 2);
}

#[test]
fn oversized_glyph_degrades_to_zero() {
    let region = GrayImage::new(10, 10);
    assert_eq!(count_occurrences(&region, &glyph(), 0.8), 0);
}

#[test]
fn empty_glyph_degrades_to_zero() {
    let region = GrayImage::new(50, 50);
    assert_eq!(count_occurrences(&region, &GrayImage::new(0, 0), 0.8), 0);
}

#[test]
fn faded_glyphs_below_brightness_floor_are_ignored() {
    let glyph = glyph();
    // Same pattern but dimmed below the floor, like a faded star outline.
    let mut faded = glyph.clone();
    for pixel in faded.pixels_mut() {
        pixel[0] = if pixel[0] > 0 { 80 } else { 0 };
    }

    let mut strip = GrayImage::new(200, 40);
    paste_gray(&mut strip, &faded, 30, 12);
    assert_eq!(count_occurrences(&strip, &glyph, 0.8), 0);
}
