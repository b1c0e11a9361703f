//! Aggregate nearest-neighbor index over all trained symbols.

use image::GrayImage;
use serde::Serialize;

use crate::features::extractor::{
    hamming_distance, Descriptor, FastBriefExtractor, FeatureExtractor,
};

/// Sentinel symbol reported when nothing in the catalog matched.
pub const NO_MATCH: &str = "NO_MATCH";

/// Nearest-neighbor votes farther than this many bits are discarded; without
/// a cap every query descriptor votes for something and the score stops
/// meaning "descriptors that actually matched".
const MAX_VOTE_DISTANCE: u32 = 64;

/// Outcome of matching one query region against the catalog.
///
/// `score` is the raw count of query descriptors that voted for the winning
/// symbol, not a normalized confidence; scores are not comparable across
/// catalogs of different size. `score == 0` means "no usable match", never an
/// error.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MatchResult {
    pub symbol: String,
    pub score: u32,
    pub stars: u8,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            symbol: NO_MATCH.to_string(),
            score: 0,
            stars: 0,
        }
    }
}

/// Accumulates trained symbols in insertion order.
///
/// Matching reports training-image indices, so the index-to-symbol table must
/// exactly mirror insertion order; the builder keeps the two in lockstep by
/// construction.
#[derive(Default)]
pub struct CatalogBuilder {
    symbols: Vec<String>,
    // (descriptor, owning training-image index)
    entries: Vec<(Descriptor, usize)>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptors: Vec<Descriptor>, symbol: &str) {
        let index = self.symbols.len();
        self.symbols.push(symbol.to_string());
        self.entries
            .extend(descriptors.into_iter().map(|d| (d, index)));
    }

    pub fn build(self) -> SymbolCatalog {
        SymbolCatalog {
            symbols: self.symbols,
            entries: self.entries,
            extractor: FastBriefExtractor::default(),
        }
    }
}

/// Immutable symbol catalog. Reinitialization builds a fresh catalog and
/// publishes it wholesale (behind an `Arc` swap in the analyzers); nothing
/// here mutates after `build`, so concurrent matching needs no locking.
pub struct SymbolCatalog {
    symbols: Vec<String>,
    entries: Vec<(Descriptor, usize)>,
    extractor: FastBriefExtractor,
}

impl SymbolCatalog {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Classify a query region by majority vote.
    ///
    /// Each query descriptor takes its single nearest catalog descriptor; the
    /// winner is the training image with the most votes. Exact ties go to the
    /// lowest training index so results are deterministic.
    pub fn match_region(&self, query: &GrayImage) -> MatchResult {
        let query_descriptors = self.extractor.extract(query);
        if query_descriptors.is_empty() || self.entries.is_empty() {
            return MatchResult::no_match();
        }

        let mut votes = vec![0u32; self.symbols.len()];
        for descriptor in &query_descriptors {
            let mut best: Option<(u32, usize)> = None;
            for (candidate, index) in &self.entries {
                let distance = hamming_distance(descriptor, candidate);
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, *index));
                }
            }
            if let Some((distance, index)) = best {
                if distance <= MAX_VOTE_DISTANCE {
                    votes[index] += 1;
                }
            }
        }

        let mut winner = 0usize;
        for (index, &count) in votes.iter().enumerate() {
            if count > votes[winner] {
                winner = index;
            }
        }
        if votes[winner] == 0 {
            return MatchResult::no_match();
        }

        MatchResult {
            symbol: self.symbols[winner].clone(),
            score: votes[winner],
            stars: 0,
        }
    }
}
