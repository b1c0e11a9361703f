//! Feature-descriptor symbol catalog: train reference icons once, then
//! classify query regions by majority vote over nearest-neighbor descriptor
//! matches.

pub mod cache;
pub mod catalog;
pub mod extractor;
pub mod trainer;


pub use catalog::{CatalogBuilder, MatchResult, SymbolCatalog, NO_MATCH};
pub use extractor::{Descriptor, FastBriefExtractor, FeatureExtractor, DESCRIPTOR_LEN};
pub use trainer::Trainer;
