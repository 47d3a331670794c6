//! Annotation ingestion
//!
//! This module handles:
//! - The feature data model (category, strand, record)
//! - Classifying raw GFF-like lines into feature records
//! - Reading an annotation file (plain or gzip) into a [`CategoryStore`]
//!
//! [`CategoryStore`]: crate::store::CategoryStore
mod classify;
mod reader;

pub use classify::{classify_line, Classified, CoordinateFallback, MIN_FIELDS};
pub use reader::{ingest, open_annotation, read_annotations};

use std::fmt;

/// The six feature types that are retained from an annotation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCategory {
    MRna,
    Exon,
    Cds,
    Protein,
    FivePrimeUtr,
    ThreePrimeUtr,
}

impl FeatureCategory {
    /// All categories in output order.
    pub const ALL: [FeatureCategory; 6] = [
        FeatureCategory::MRna,
        FeatureCategory::Exon,
        FeatureCategory::Cds,
        FeatureCategory::Protein,
        FeatureCategory::FivePrimeUtr,
        FeatureCategory::ThreePrimeUtr,
    ];

    /// Map a column-3 feature type to a category. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "mRNA" => Some(Self::MRna),
            "exon" => Some(Self::Exon),
            "CDS" => Some(Self::Cds),
            "protein" => Some(Self::Protein),
            "five_prime_UTR" => Some(Self::FivePrimeUtr),
            "three_prime_UTR" => Some(Self::ThreePrimeUtr),
            _ => None,
        }
    }

    /// The feature type string as it appears in the annotation file.
    pub fn label(self) -> &'static str {
        match self {
            Self::MRna => "mRNA",
            Self::Exon => "exon",
            Self::Cds => "CDS",
            Self::Protein => "protein",
            Self::FivePrimeUtr => "five_prime_UTR",
            Self::ThreePrimeUtr => "three_prime_UTR",
        }
    }

    /// Name used in chart labels and output file names.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::MRna => "mRNA",
            Self::Exon => "Exon",
            Self::Cds => "CDS",
            Self::Protein => "Protein",
            Self::FivePrimeUtr => "FivePrimeUTR",
            Self::ThreePrimeUtr => "ThreePrimeUTR",
        }
    }

    /// Position in [`FeatureCategory::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::MRna => 0,
            Self::Exon => 1,
            Self::Cds => 2,
            Self::Protein => 3,
            Self::FivePrimeUtr => 4,
            Self::ThreePrimeUtr => 5,
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Strand column (7th field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    /// `.`, `?`, empty, or anything else
    Other,
}

impl Strand {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "+" => Self::Plus,
            "-" => Self::Minus,
            _ => Self::Other,
        }
    }
}

/// A single retained annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub category: FeatureCategory,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
}

impl FeatureRecord {
    /// `end - start`, signed. Inverted intervals give a negative length.
    ///
    /// Saturates at the `i64` bounds; [`classify_line`] never produces a
    /// record whose length would.
    pub fn length(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}
