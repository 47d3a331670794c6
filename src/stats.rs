/// Ingestion statistics tracking and reporting
use crate::annotation::FeatureCategory;
use log::info;

/// Tracks what happened to each line of an annotation file
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines read before end of file or a `##FASTA` directive
    pub total_lines: u64,
    /// Blank lines, comments and `##` directives
    pub comment_lines: u64,
    /// Well-formed lines whose feature type is not retained
    pub ignored: u64,
    /// Lines skipped as malformed (too few fields, bad coordinates)
    pub malformed: u64,
    /// Retained records, indexed by [`FeatureCategory::index`]
    per_category: [u64; 6],
}

impl IngestStats {
    /// Create new statistics tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a retained feature
    pub fn record_feature(&mut self, category: FeatureCategory) {
        self.per_category[category.index()] += 1;
    }

    /// Retained records for one category
    pub fn features(&self, category: FeatureCategory) -> u64 {
        self.per_category[category.index()]
    }

    /// Retained records across all categories
    pub fn total_features(&self) -> u64 {
        self.per_category.iter().sum()
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        if self.total_lines == 0 {
            info!("No annotation lines read");
            return;
        }

        info!("=== Ingestion Summary ===");
        info!("Annotation lines read: {}", self.total_lines);
        info!("Comment/blank lines: {}", self.comment_lines);
        info!(
            "Retained features: {} ({:.2}%)",
            self.total_features(),
            self.percent(self.total_features())
        );
        for category in FeatureCategory::ALL {
            info!("  {}: {}", category, self.features(category));
        }
        info!("Ignored feature types: {}", self.ignored);
        if self.malformed > 0 {
            info!(
                "Malformed lines skipped: {} ({:.2}%)",
                self.malformed,
                self.percent(self.malformed)
            );
        }
    }

    fn percent(&self, count: u64) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total_lines as f64
        }
    }
}
