use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for scanner operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// The error type for all screenshot-scanning operations.
///
/// Nothing here escapes an analyzer's public `analyze` entry point; errors are
/// caught at the orchestration boundary and embedded in the result record.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to decode image: {source}")]
    ImageDecode {
        #[from]
        source: image::ImageError,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("HTTP fetch failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Failed to parse asset catalog: {source}")]
    AssetCatalog {
        #[from]
        source: serde_json::Error,
    },

    #[error("Reference asset not found at {path:?}")]
    MissingAsset { path: PathBuf },

    #[error("Region rows {row_start}..{row_end} cols {col_start}..{col_end} is invalid for a {width}x{height} image")]
    InvalidRegion {
        row_start: i64,
        row_end: i64,
        col_start: i64,
        col_end: i64,
        width: u32,
        height: u32,
    },

    #[error("Descriptor cache {path:?} is malformed: {reason}")]
    DescriptorCache { path: PathBuf, reason: String },

    #[error("OCR failed: {reason}")]
    Ocr { reason: String },

    #[error("Analyzer has no reference glyphs loaded; call reinitialize first")]
    NotInitialized,
}
