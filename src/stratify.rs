/// Strand stratification of record lengths
use crate::annotation::{FeatureRecord, Strand};
use std::fmt;

/// One of the three length sequences derived per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrandView {
    All,
    Plus,
    Minus,
}

impl StrandView {
    /// All views in output order.
    pub const ALL: [StrandView; 3] = [StrandView::All, StrandView::Plus, StrandView::Minus];

    /// Suffix appended to the category name in chart labels and file names.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Plus => "Plus",
            Self::Minus => "Minus",
        }
    }
}

impl fmt::Display for StrandView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Plus => write!(f, "plus"),
            Self::Minus => write!(f, "minus"),
        }
    }
}

/// Lengths of one category's records, split by strand.
///
/// `plus` and `minus` are subsequences of `all` in the same relative order.
/// Records on any other strand only appear in `all`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StratifiedLengths {
    pub all: Vec<i64>,
    pub plus: Vec<i64>,
    pub minus: Vec<i64>,
}

impl StratifiedLengths {
    pub fn view(&self, view: StrandView) -> &[i64] {
        match view {
            StrandView::All => &self.all,
            StrandView::Plus => &self.plus,
            StrandView::Minus => &self.minus,
        }
    }

    /// Records counted in `all` that belong to neither strand view.
    pub fn unstranded(&self) -> usize {
        self.all.len() - self.plus.len() - self.minus.len()
    }
}

/// Derive the `all`/`plus`/`minus` length sequences from `records`.
pub fn stratify(records: &[FeatureRecord]) -> StratifiedLengths {
    let mut lengths = StratifiedLengths {
        all: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for record in records {
        let length = record.length();
        lengths.all.push(length);
        match record.strand {
            Strand::Plus => lengths.plus.push(length),
            Strand::Minus => lengths.minus.push(length),
            Strand::Other => {}
        }
    }

    lengths
}
