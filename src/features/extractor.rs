//! Local feature extraction: FAST-9 corners with 256-bit BRIEF descriptors.

use image::GrayImage;
use imageproc::corners::corners_fast9;

/// Descriptor width in bytes (256 binary intensity comparisons).
pub const DESCRIPTOR_LEN: usize = 32;

/// One binary descriptor for a small patch around a detected corner.
pub type Descriptor = [u8; DESCRIPTOR_LEN];

/// Keypoint sampling must stay this far from the image border.
const PATCH_MARGIN: u32 = 8;

/// Pluggable local-feature backend. Descriptors must be of uniform width
/// within one catalog; `Descriptor` fixes that at the type level.
pub trait FeatureExtractor {
    fn extract(&self, image: &GrayImage) -> Vec<Descriptor>;
}

/// Default extractor: FAST-9 corner detection followed by a fixed BRIEF
/// test pattern. Binary descriptors compare under Hamming distance.
#[derive(Debug, Clone)]
pub struct FastBriefExtractor {
    /// FAST intensity threshold; lower finds more (noisier) corners.
    pub corner_threshold: u8,
    /// Cap on descriptors per image to bound match cost.
    pub max_features: usize,
}

impl Default for FastBriefExtractor {
    fn default() -> Self {
        Self {
            corner_threshold: 30,
            max_features: 1000,
        }
    }
}

impl FeatureExtractor for FastBriefExtractor {
    fn extract(&self, image: &GrayImage) -> Vec<Descriptor> {
        if image.width() <= 2 * PATCH_MARGIN || image.height() <= 2 * PATCH_MARGIN {
            return Vec::new();
        }

        let corners = corners_fast9(image, self.corner_threshold);
        let mut descriptors = Vec::new();
        for corner in corners {
            if let Some(descriptor) = describe_patch(image, corner.x, corner.y) {
                descriptors.push(descriptor);
            }
            if descriptors.len() >= self.max_features {
                break;
            }
        }
        descriptors
    }
}

/// BRIEF descriptor for the patch centered at (x, y), or `None` when the
/// patch would leave the image.
fn describe_patch(image: &GrayImage, x: u32, y: u32) -> Option<Descriptor> {
    let (width, height) = image.dimensions();
    if x < PATCH_MARGIN
        || y < PATCH_MARGIN
        || x + PATCH_MARGIN >= width
        || y + PATCH_MARGIN >= height
    {
        return None;
    }

    let sample = |dx: i32, dy: i32| -> u8 {
        let px = (x as i32 + dx) as u32;
        let py = (y as i32 + dy) as u32;
        image.get_pixel(px, py)[0]
    };

    // Fixed pseudo-random test pattern; the two 15/13 strides decorrelate the
    // paired sample points while keeping them inside the +/-7 patch.
    let mut bits: Descriptor = [0; DESCRIPTOR_LEN];
    for i in 0..256usize {
        let a = sample((i % 15) as i32 - 7, ((i / 15) % 15) as i32 - 7);
        let b = sample((i % 13) as i32 - 6, ((i / 13) % 13) as i32 - 6);
        if a > b {
            bits[i / 8] |= 1 << (i % 8);
        }
    }
    Some(bits)
}

/// Hamming distance between two descriptors, in bits.
pub fn hamming_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}
