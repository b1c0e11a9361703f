//! Screenshot recognition engine for two game screens: the behold reward
//! reveal (three crew portraits behind a title banner) and the voyage status
//! panel (six skill fields plus an antimatter counter).
//!
//! Behold analysis matches fixed-proportion zones against a trained symbol
//! catalog of feature descriptors; voyage analysis locates scale-invariant
//! anchor icons and OCRs the numeric fields at offsets derived from them.
//! Both analyzers catch every failure at the orchestration boundary and
//! report it in the result record, never as a panic or an `Err`.

pub mod args;
pub mod assets;
pub mod behold;
pub mod counting;
pub mod error;
pub mod features;
pub mod geometry;
pub mod locate;
pub mod ocr;
pub mod prep;
pub mod voyage;

#[cfg(test)]
pub(crate) mod testutil;

pub use behold::{BeholdAnalyzer, BeholdResult};
pub use error::{ScanError, ScanResult};
pub use features::MatchResult;
pub use voyage::{VoyageAnalyzer, VoyageResult};
