//! Iterative template-based glyph counting.
//!
//! Counts repeated occurrences of a small reference glyph (a filled star, a
//! close-button icon) inside a region: compute a normalized cross-correlation
//! response surface, then greedily accept the global peak and flood-fill its
//! blob to zero until no peak clears the threshold.

use image::GrayImage;
use imageproc::template_matching::{match_template, MatchTemplateMethod};

use crate::prep;

#[cfg(test)]
mod tests;

/// Count occurrences of `glyph` inside `region`.
///
/// Fail-soft: any internal failure yields a count of 0 and must never abort
/// the surrounding analysis. Assumes occurrences do not heavily overlap.
pub fn count_occurrences(region: &GrayImage, glyph: &GrayImage, threshold: f32) -> u32 {
    match try_count(region, glyph, threshold) {
        Ok(count) => count,
        Err(reason) => {
            log::debug!("glyph counting degraded to 0: {reason}");
            0
        }
    }
}

fn try_count(region: &GrayImage, glyph: &GrayImage, threshold: f32) -> Result<u32, String> {
    if glyph.width() == 0 || glyph.height() == 0 {
        return Err("empty glyph".to_string());
    }
    if glyph.width() > region.width() || glyph.height() > region.height() {
        return Err(format!(
            "glyph {}x{} larger than region {}x{}",
            glyph.width(),
            glyph.height(),
            region.width(),
            region.height()
        ));
    }

    // Low-intensity background (faded star outlines) must not correlate.
    let mut masked = region.clone();
    prep::mask_dim_pixels(&mut masked, prep::BRIGHTNESS_FLOOR);

    let response = match_template(&masked, glyph, MatchTemplateMethod::CrossCorrelationNormalized);
    let width = response.width() as usize;
    let height = response.height() as usize;

    // Threshold-to-zero; non-finite values (flat windows) count as below.
    let mut surface: Vec<f32> = response
        .pixels()
        .map(|p| {
            let v = p[0];
            if v.is_finite() && v >= threshold { v } else { 0.0 }
        })
        .collect();

    let mut count = 0u32;
    loop {
        let mut peak = 0usize;
        let mut peak_value = 0.0f32;
        for (i, &v) in surface.iter().enumerate() {
            if v > peak_value {
                peak_value = v;
                peak = i;
            }
        }
        if peak_value < threshold {
            break;
        }
        count += 1;
        suppress_blob(&mut surface, width, height, peak);
    }

    Ok(count)
}

/// Zero the connected nonzero component containing `start` so the same
/// physical glyph is not counted twice. After threshold-to-zero the response
/// blobs are isolated, so 4-connected flood fill is exactly the suppression
/// neighborhood.
fn suppress_blob(surface: &mut [f32], width: usize, height: usize, start: usize) {
    let mut stack = vec![start];
    surface[start] = 0.0;
    while let Some(index) = stack.pop() {
        let x = index % width;
        let y = index / width;
        let mut visit = |nx: usize, ny: usize| {
            let ni = ny * width + nx;
            if surface[ni] > 0.0 {
                surface[ni] = 0.0;
                stack.push(ni);
            }
        };
        if x > 0 {
            visit(x - 1, y);
        }
        if x + 1 < width {
            visit(x + 1, y);
        }
        if y > 0 {
            visit(x, y - 1);
        }
        if y + 1 < height {
            visit(x, y + 1);
        }
    }
}
