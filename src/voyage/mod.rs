//! Voyage status screenshot analysis.
//!
//! Unlike the behold layout, the voyage instrument panel is not at fixed
//! proportions: the panel scales with the device resolution. Two passes pin it
//! down. A single-anchor scan over the top band locates the antimatter icon
//! and the number next to it; a two-anchor scan over the bottom band locks the
//! command and science icons simultaneously, fixing the skill grid's scale and
//! origin so the six value fields and their emphasis stars can be derived by
//! offset arithmetic.

use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Serialize, Serializer};

use crate::assets::AssetStore;
use crate::error::{ScanError, ScanResult};
use crate::geometry::{self, Region};
use crate::locate::{self, ScaleScan};
use crate::ocr::{self, OcrNumeric, TesseractCli};
use crate::{assets, prep};


/// Emphasis marker next to a skill field: a star on the icon side of the
/// value marks the voyage's primary or secondary skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEmphasis {
    Unknown,
    None,
    Primary,
    Secondary,
}

impl SkillEmphasis {
    /// Wire encoding: -1 unknown, 0 none, 1 primary, 2 secondary.
    pub fn code(self) -> i8 {
        match self {
            SkillEmphasis::Unknown => -1,
            SkillEmphasis::None => 0,
            SkillEmphasis::Primary => 1,
            SkillEmphasis::Secondary => 2,
        }
    }
}

impl Serialize for SkillEmphasis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

/// One OCR'd skill field plus its emphasis classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillReading {
    #[serde(rename = "SkillValue")]
    pub value: i32,
    #[serde(rename = "Primary")]
    pub emphasis: SkillEmphasis,
}

impl SkillReading {
    fn empty() -> Self {
        Self {
            value: 0,
            emphasis: SkillEmphasis::Unknown,
        }
    }
}

/// Per-analysis result record. `valid` flips on only once both anchor scans
/// locked; the skill readings are meaningless without it.
#[derive(Debug, Clone, Serialize)]
pub struct VoyageResult {
    pub input_width: u32,
    pub input_height: u32,
    pub error: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    pub valid: bool,
    pub antimatter: i32,
    pub cmd: SkillReading,
    pub dip: SkillReading,
    pub eng: SkillReading,
    pub med: SkillReading,
    pub sci: SkillReading,
    pub sec: SkillReading,
}

impl VoyageResult {
    fn empty(input_width: u32, input_height: u32, file_size: u64) -> Self {
        Self {
            input_width,
            input_height,
            error: String::new(),
            file_size,
            valid: false,
            antimatter: 0,
            cmd: SkillReading::empty(),
            dip: SkillReading::empty(),
            eng: SkillReading::empty(),
            med: SkillReading::empty(),
            sci: SkillReading::empty(),
            sec: SkillReading::empty(),
        }
    }
}

/// Reference icons for the six skills plus the antimatter marker.
pub struct SkillGlyphs {
    pub cmd: GrayImage,
    pub dip: GrayImage,
    pub eng: GrayImage,
    pub med: GrayImage,
    pub sci: GrayImage,
    pub sec: GrayImage,
    pub antimatter: GrayImage,
}

pub struct VoyageAnalyzer {
    store: AssetStore,
    glyphs: Option<SkillGlyphs>,
    ocr: Box<dyn OcrNumeric>,
}

impl VoyageAnalyzer {
    pub fn new(base_path: &str) -> Self {
        Self {
            store: AssetStore::new(base_path),
            glyphs: None,
            ocr: Box::new(TesseractCli::default()),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_parts(glyphs: SkillGlyphs, ocr: Box<dyn OcrNumeric>) -> Self {
        Self {
            store: AssetStore::new("."),
            glyphs: Some(glyphs),
            ocr,
        }
    }

    /// Reload the skill and antimatter reference icons from the asset store.
    pub fn reinitialize(&mut self) -> ScanResult<()> {
        self.glyphs = Some(SkillGlyphs {
            cmd: self.store.load_glyph("cmd.png")?,
            dip: self.store.load_glyph("dip.png")?,
            eng: self.store.load_glyph("eng.png")?,
            med: self.store.load_glyph("med.png")?,
            sci: self.store.load_glyph("sci.png")?,
            sec: self.store.load_glyph("sec.png")?,
            antimatter: self.store.load_glyph("antimatter.png")?,
        });
        log::info!("voyage glyphs loaded");
        Ok(())
    }

    /// Fetch a screenshot over HTTP and analyze it.
    pub fn analyze_url(&self, url: &str) -> VoyageResult {
        match assets::fetch_image(url) {
            Ok((image, file_size)) => self.analyze(&image, file_size),
            Err(e) => {
                let mut result = VoyageResult::empty(0, 0, 0);
                result.error = e.to_string();
                result
            }
        }
    }

    /// Analyze a decoded screenshot. Never panics and never returns an
    /// error; failures land in the record's `error` string.
    pub fn analyze(&self, query: &DynamicImage, file_size: u64) -> VoyageResult {
        let rgb = prep::flatten(query);
        let mut result = VoyageResult::empty(rgb.width(), rgb.height(), file_size);
        if let Err(e) = self.analyze_into(&rgb, &mut result) {
            if result.error.is_empty() {
                result.error = e.to_string();
            }
        }
        result
    }

    fn analyze_into(&self, rgb: &RgbImage, result: &mut VoyageResult) -> ScanResult<()> {
        let glyphs = self.glyphs.as_ref().ok_or(ScanError::NotInitialized)?;
        let (width, height) = rgb.dimensions();

        if !self.read_antimatter(rgb, glyphs, width, height, result)? {
            return Ok(());
        }
        self.read_skills(rgb, glyphs, width, height, result)
    }

    /// Antimatter pass over the top band. Returns false when the record is
    /// finished early because the icon or the number could not be read.
    fn read_antimatter(
        &self,
        rgb: &RgbImage,
        glyphs: &SkillGlyphs,
        width: u32,
        height: u32,
        result: &mut VoyageResult,
    ) -> ScanResult<bool> {
        let band = geometry::voyage_top_band(width, height)?;
        let mut gray = prep::luma_of(&band.crop_rgb(rgb));
        prep::mask_dim_pixels(&mut gray, prep::BRIGHTNESS_FLOOR);

        let scan = ScaleScan::antimatter(gray.height());
        let Some(fix) = locate::find_anchor(&gray, &glyphs.antimatter, &scan) else {
            result.error = "Could not read antimatter".to_string();
            return Ok(false);
        };

        // The number sits right of the icon, up to ~6.75 icon widths out.
        let x = i64::from(fix.x);
        let w = i64::from(fix.width);
        let field = Region::from_spans(
            i64::from(fix.y),
            i64::from(fix.y) + i64::from(fix.height),
            x + w,
            (x + (f64::from(fix.width) * 6.75) as i64).min(i64::from(gray.width())),
            gray.width(),
            gray.height(),
        )?;
        let raw = ocr::read_number(self.ocr.as_ref(), &field.crop_luma(&gray));
        if raw == 0 {
            result.error = "Could not read antimatter".to_string();
            return Ok(false);
        }
        result.antimatter = ocr::correct_antimatter(raw);
        Ok(true)
    }

    /// Skill-grid pass over the bottom band: lock the command and science
    /// anchors, then read every field at offsets derived from them.
    fn read_skills(
        &self,
        rgb: &RgbImage,
        glyphs: &SkillGlyphs,
        width: u32,
        height: u32,
        result: &mut VoyageResult,
    ) -> ScanResult<()> {
        let band = geometry::voyage_bottom_band(width, height)?;
        let mut panel = band.crop_rgb(rgb);
        prep::mask_dim_rgb(&mut panel, prep::BRIGHTNESS_FLOOR);
        let panel_gray = prep::luma_of(&panel);

        let scan = ScaleScan::skill_panel(panel_gray.height());
        let Some((cmd_fix, sci_fix)) =
            locate::find_anchor_pair(&panel_gray, &glyphs.cmd, &glyphs.sci, &scan)
        else {
            result.error = "Could not read skill values".to_string();
            return Ok(());
        };

        let (bw, bh) = panel_gray.dimensions();
        let w = i64::from(sci_fix.width);
        let h = i64::from(sci_fix.height);
        // Width scale converts reference-glyph pixel widths to panel pixels.
        let ws = f64::from(sci_fix.width) / f64::from(glyphs.sci.width());
        let (cx, cy) = (i64::from(cmd_fix.x), i64::from(cmd_fix.y));
        let (sx, sy) = (i64::from(sci_fix.x), i64::from(sci_fix.y));

        // The grid is three rows by two columns; the middle row sits between
        // the two anchors. Left-column icons are right of their values, so
        // each value's right edge stops at the icon, corrected for the icon's
        // width difference against the science reference.
        let rows = [(cy, cy + h), (cy + h, sy), (sy, sy + h)];
        let icon_overhang = |glyph: &GrayImage| {
            ((f64::from(glyph.width()) - f64::from(glyphs.sci.width())) * ws) as i64
        };
        let left_value = |right_trim: i64| (cx - 5 * w, cx - right_trim);
        let right_value = (sx + (1.4 * w as f64) as i64, sx + 6 * w);
        let left_emphasis = (cx + 9 * w / 8, cx + 5 * w / 2);
        let right_emphasis = (sx - 12 * w / 8, sx - w / 6);

        let read = |rows: (i64, i64),
                    value_cols: (i64, i64),
                    emphasis_cols: (i64, i64)|
         -> ScanResult<SkillReading> {
            let field = Region::from_spans(rows.0, rows.1, value_cols.0, value_cols.1, bw, bh)?;
            let value = ocr::read_number(self.ocr.as_ref(), &field.crop_luma(&panel_gray));
            let star =
                Region::from_spans(rows.0, rows.1, emphasis_cols.0, emphasis_cols.1, bw, bh)?;
            Ok(SkillReading {
                value,
                emphasis: classify_emphasis(&star.crop_rgb(&panel)),
            })
        };

        result.cmd = read(rows[0], left_value(w / 8), left_emphasis)?;
        result.dip = read(rows[1], left_value(icon_overhang(&glyphs.dip)), left_emphasis)?;
        result.eng = read(rows[2], left_value(icon_overhang(&glyphs.eng)), left_emphasis)?;
        result.sec = read(rows[0], right_value, right_emphasis)?;
        result.med = read(rows[1], right_value, right_emphasis)?;
        result.sci = read(rows[2], right_value, right_emphasis)?;
        result.valid = true;
        Ok(())
    }
}

/// Classify the emphasis star slot by the mean color of its center patch.
/// The patch comes from the dim-masked panel, so "nothing there" reads as
/// near black, a gold primary star has almost no blue, and the bright silver
/// secondary star is high across all channels.
fn classify_emphasis(patch: &RgbImage) -> SkillEmphasis {
    const PROBE: u32 = 20;
    let (width, height) = patch.dimensions();
    if width < PROBE || height < PROBE {
        return SkillEmphasis::Unknown;
    }
    let x0 = (width - PROBE) / 2;
    let y0 = (height - PROBE) / 2;

    let mut sums = [0u64; 3];
    for y in y0..y0 + PROBE {
        for x in x0..x0 + PROBE {
            let pixel = patch.get_pixel(x, y);
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(channel);
            }
        }
    }
    let count = f64::from(PROBE * PROBE);
    let blue = sums[2] as f64 / count;
    let total = (sums[0] + sums[1] + sums[2]) as f64 / count;

    if total < 10.0 {
        SkillEmphasis::None
    } else if blue < 5.0 {
        SkillEmphasis::Primary
    } else if total > 100.0 {
        SkillEmphasis::Secondary
    } else {
        SkillEmphasis::Unknown
    }
}
