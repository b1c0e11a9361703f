//! Numeric OCR glue.
//!
//! Digit recognition itself is an external capability behind the
//! [`OcrNumeric`] trait; the default backend shells out to the `tesseract`
//! binary with a digits-only whitelist. Everything here passes the backend's
//! output through with minimal interpretation: unparseable text reads as 0.

use std::process::Command;

use image::GrayImage;

use crate::error::{ScanError, ScanResult};

/// Digits-only text recognition over a cropped field.
pub trait OcrNumeric {
    fn recognize(&self, image: &GrayImage) -> ScanResult<String>;
}

/// Backend driving the `tesseract` CLI in numeral classification mode.
pub struct TesseractCli {
    binary: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
        }
    }
}

impl OcrNumeric for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> ScanResult<String> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("field.png");
        image.save(&input)?;

        let output = Command::new(&self.binary)
            .arg(&input)
            .arg("stdout")
            .args(["--psm", "7"])
            .args(["-c", "tessedit_char_whitelist=0123456789"])
            .args(["-c", "classify_bln_numeric_mode=1"])
            .output()
            .map_err(|e| ScanError::Ocr {
                reason: format!("failed to run {}: {e}", self.binary),
            })?;

        if !output.status.success() {
            return Err(ScanError::Ocr {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Read an integer from a cropped field. Backend failures and unparseable
/// output both read as 0; the callers decide whether 0 is an error.
pub fn read_number(ocr: &dyn OcrNumeric, field: &GrayImage) -> i32 {
    match ocr.recognize(field) {
        Ok(text) => parse_leading_digits(&text),
        Err(e) => {
            log::debug!("numeric field read as 0: {e}");
            0
        }
    }
}

/// Leading-digits parse with atoi semantics: skip leading whitespace, take
/// consecutive ASCII digits, anything else reads as 0.
fn parse_leading_digits(text: &str) -> i32 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(9)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Antimatter readings above 8000 carry a known misread: a decorative
/// particle next to the digits is recognized as an extra trailing zero.
pub fn correct_antimatter(value: i32) -> i32 {
    if value > 8000 { value / 10 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    impl OcrNumeric for FixedOcr {
        fn recognize(&self, _image: &GrayImage) -> ScanResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingOcr;

    impl OcrNumeric for FailingOcr {
        fn recognize(&self, _image: &GrayImage) -> ScanResult<String> {
            Err(ScanError::Ocr {
                reason: "backend unavailable".to_string(),
            })
        }
    }

    #[test]
    fn parses_leading_digits() {
        assert_eq!(parse_leading_digits("1234\n"), 1234);
        assert_eq!(parse_leading_digits("  42"), 42);
        assert_eq!(parse_leading_digits("12ab34"), 12);
        assert_eq!(parse_leading_digits(""), 0);
        assert_eq!(parse_leading_digits("\n"), 0);
        assert_eq!(parse_leading_digits("abc"), 0);
    }

    #[test]
    fn read_number_passes_backend_output_through() {
        let field = GrayImage::new(10, 10);
        assert_eq!(read_number(&FixedOcr("2500\n"), &field), 2500);
        assert_eq!(read_number(&FixedOcr(""), &field), 0);
        assert_eq!(read_number(&FailingOcr, &field), 0);
    }

    #[test]
    fn antimatter_correction_applies_strictly_above_8000() {
        assert_eq!(correct_antimatter(0), 0);
        assert_eq!(correct_antimatter(2500), 2500);
        assert_eq!(correct_antimatter(8000), 8000);
        assert_eq!(correct_antimatter(8001), 800);
        assert_eq!(correct_antimatter(25000), 2500);
    }
}
