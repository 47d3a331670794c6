use std::path::PathBuf;

use clap::Parser;

use crate::annotation::CoordinateFallback;
use crate::chart::DEFAULT_BAR_WIDTH;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// gffbars command-line parameters.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gffbars",
    about = "Plot per-record feature lengths from a genome annotation, split by strand",
    version
)]
pub struct Parameters {
    // ── Input ───────────────────────────────────────────────────────────
    /// Genome annotation file (GFF-like, tab-separated; .gz accepted)
    #[arg(short = 'A', long = "annotationfile")]
    pub annotation_file: PathBuf,

    /// What to do with non-integer start/end on a retained feature: skip or zero
    #[arg(long = "coordinateFallback", default_value = "skip")]
    pub coordinate_fallback: CoordinateFallback,

    // ── Output ──────────────────────────────────────────────────────────
    /// Directory receiving the bar<Category><View>.png charts
    #[arg(long = "outDir", default_value = "./")]
    pub out_dir: PathBuf,

    /// Bar width in pixels
    #[arg(long = "barWidth", default_value_t = DEFAULT_BAR_WIDTH)]
    pub bar_width: u32,

    // ── Run ─────────────────────────────────────────────────────────────
    /// Number of threads used to render charts
    #[arg(long = "runThreadN", default_value_t = 1)]
    pub run_thread_n: usize,
}

impl Parameters {
    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), Error> {
        if self.run_thread_n == 0 {
            return Err(Error::Parameter("--runThreadN must be >= 1".into()));
        }

        if self.bar_width == 0 {
            return Err(Error::Parameter("--barWidth must be >= 1".into()));
        }

        if !self.out_dir.is_dir() {
            return Err(Error::Parameter(format!(
                "--outDir {} does not exist or is not a directory",
                self.out_dir.display()
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
