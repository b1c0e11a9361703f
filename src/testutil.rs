//! Shared helpers for building synthetic screenshots in tests.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Small deterministic generator so synthetic textures are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn next_in(&mut self, range: u32) -> u32 {
        self.next_u32() % range.max(1)
    }
}

/// A textured image: noise-filled rectangles scattered on black. Gives the
/// corner detector plenty of distinctive patches, and different seeds give
/// textures that do not share local structure.
pub fn blob_texture(seed: u64, width: u32, height: u32) -> GrayImage {
    let mut rng = Lcg::new(seed);
    let mut image = GrayImage::new(width, height);
    for _ in 0..40 {
        let rw = 10 + rng.next_in(20);
        let rh = 10 + rng.next_in(20);
        let x0 = rng.next_in(width.saturating_sub(rw).max(1));
        let y0 = rng.next_in(height.saturating_sub(rh).max(1));
        for y in y0..(y0 + rh).min(height) {
            for x in x0..(x0 + rw).min(width) {
                let value = 120 + rng.next_in(136) as u8;
                image.put_pixel(x, y, Luma([value]));
            }
        }
    }
    image
}

/// A two-tone checkerboard glyph; scale-sensitive enough that a correlation
/// search only locks on near the true size.
pub fn checker_glyph(width: u32, height: u32, cell: u32) -> GrayImage {
    let mut image = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let on = ((x / cell.max(1)) + (y / cell.max(1))) % 2 == 0;
            image.put_pixel(x, y, Luma([if on { 255 } else { 0 }]));
        }
    }
    image
}

/// Copy a gray patch into a gray canvas at (x, y).
pub fn paste_gray(canvas: &mut GrayImage, patch: &GrayImage, x: u32, y: u32) {
    for (px, py, pixel) in patch.enumerate_pixels() {
        let cx = x + px;
        let cy = y + py;
        if cx < canvas.width() && cy < canvas.height() {
            canvas.put_pixel(cx, cy, *pixel);
        }
    }
}

/// Copy a gray patch into an RGB canvas, replicating the value across
/// channels so the grayscale projection recovers it.
pub fn paste_gray_on_rgb(canvas: &mut RgbImage, patch: &GrayImage, x: u32, y: u32) {
    for (px, py, pixel) in patch.enumerate_pixels() {
        let cx = x + px;
        let cy = y + py;
        if cx < canvas.width() && cy < canvas.height() {
            let v = pixel[0];
            canvas.put_pixel(cx, cy, Rgb([v, v, v]));
        }
    }
}
