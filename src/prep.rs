//! Input normalization applied before any cropping or matching.
//!
//! Screenshots arrive in whatever encoding the client produced: some devices
//! upload 16-bit-per-channel PNGs, some carry an alpha channel. All matching
//! downstream assumes 8-bit three-channel data.

use image::{DynamicImage, GrayImage, RgbImage};

/// Brightness floor below which pixels are treated as background noise.
pub const BRIGHTNESS_FLOOR: u8 = 100;

/// Reduce any input encoding to 8-bit RGB: 16-bit channels are scaled down
/// and an alpha channel, if present, is dropped.
pub fn flatten(query: &DynamicImage) -> RgbImage {
    query.to_rgb8()
}

/// Zero out pixels below the brightness floor, leaving the rest untouched.
///
/// This is the "threshold to zero" pass run over star strips and anchor
/// search bands so faded UI elements do not register as matches.
pub fn mask_dim_pixels(image: &mut GrayImage, floor: u8) {
    for pixel in image.pixels_mut() {
        if pixel[0] < floor {
            pixel[0] = 0;
        }
    }
}

/// Channel-wise threshold-to-zero for color buffers. The voyage pipeline
/// samples mean colors from the masked band, so the mask has to run on the
/// color data, not just the grayscale projection.
pub fn mask_dim_rgb(image: &mut RgbImage, floor: u8) {
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            if pixel[c] < floor {
                pixel[c] = 0;
            }
        }
    }
}

/// Grayscale projection of an RGB buffer.
pub fn luma_of(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}
