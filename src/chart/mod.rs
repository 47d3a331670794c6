//! Bar chart emission
//!
//! This module handles:
//! - Naming the 18 (category × strand view) charts and their output files
//! - The [`ChartRenderer`] seam between the driver and the image backend
//! - Driving one render call per chart, sequentially or on a rayon pool
mod plot;

pub use plot::{PlottersRenderer, BAR_COLOR, CANVAS_SIZE, CAPTION};

use crate::annotation::FeatureCategory;
use crate::error::Error;
use crate::store::CategoryStore;
use crate::stratify::{stratify, StrandView};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Default bar width in pixels.
pub const DEFAULT_BAR_WIDTH: u32 = 14;

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart<'a> {
    /// Legend and y-axis text, e.g. `mRNAPlus`
    pub label: &'a str,
    /// One bar per value, x = index
    pub values: &'a [i64],
    /// Bar width in pixels
    pub bar_width: u32,
}

/// Draws a [`BarChart`] to an image file, overwriting any existing file.
pub trait ChartRenderer: Sync {
    fn render(&self, chart: &BarChart<'_>, path: &Path) -> Result<(), Error>;
}

/// Chart label for a (category, view) pair: `mRNA`, `mRNAPlus`, `mRNAMinus`, ...
pub fn chart_label(category: FeatureCategory, view: StrandView) -> String {
    format!("{}{}", category.display_name(), view.suffix())
}

/// Output file name for a (category, view) pair: `barmRNA.png`, `barCDSMinus.png`, ...
pub fn output_file_name(category: FeatureCategory, view: StrandView) -> String {
    format!("bar{}.png", chart_label(category, view))
}

/// One pending render call, built from a single derived length sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartJob {
    pub category: FeatureCategory,
    pub view: StrandView,
    pub label: String,
    pub values: Vec<i64>,
    pub path: PathBuf,
}

/// Settings for [`emit_all`].
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub out_dir: PathBuf,
    pub bar_width: u32,
    /// 1 renders sequentially on the calling thread
    pub threads: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("./"),
            bar_width: DEFAULT_BAR_WIDTH,
            threads: 1,
        }
    }
}

/// Build the 18 chart jobs in category-major, view-minor order.
pub fn plan_jobs(store: &CategoryStore, out_dir: &Path) -> Vec<ChartJob> {
    let mut jobs = Vec::with_capacity(FeatureCategory::ALL.len() * StrandView::ALL.len());

    for (category, records) in store.iter() {
        let lengths = stratify(records);
        log::debug!(
            "{}: {} all, {} plus, {} minus, {} unstranded",
            category,
            lengths.all.len(),
            lengths.plus.len(),
            lengths.minus.len(),
            lengths.unstranded()
        );

        for view in StrandView::ALL {
            jobs.push(ChartJob {
                category,
                view,
                label: chart_label(category, view),
                values: lengths.view(view).to_vec(),
                path: out_dir.join(output_file_name(category, view)),
            });
        }
    }

    jobs
}

/// Render every (category, view) chart for `store`.
///
/// Returns the written paths in job order. The first renderer failure aborts
/// the run; charts already written are left in place.
pub fn emit_all<R: ChartRenderer>(
    store: &CategoryStore,
    renderer: &R,
    options: &EmitOptions,
) -> Result<Vec<PathBuf>, Error> {
    let jobs = plan_jobs(store, &options.out_dir);

    let render_one = |job: &ChartJob| -> Result<(), Error> {
        let chart = BarChart {
            label: &job.label,
            values: &job.values,
            bar_width: options.bar_width,
        };
        renderer.render(&chart, &job.path)?;
        log::info!(
            "Wrote {} ({} bars)",
            job.path.display(),
            job.values.len()
        );
        Ok(())
    };

    if options.threads <= 1 {
        jobs.iter().try_for_each(render_one)?;
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|e| Error::Parameter(format!("failed to build thread pool: {}", e)))?;
        pool.install(|| jobs.par_iter().try_for_each(render_one))?;
    }

    Ok(jobs.into_iter().map(|job| job.path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{FeatureRecord, Strand};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records every call instead of drawing.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Mutex<Vec<(String, Vec<i64>, PathBuf)>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, chart: &BarChart<'_>, path: &Path) -> Result<(), Error> {
            self.calls.lock().unwrap().push((
                chart.label.to_string(),
                chart.values.to_vec(),
                path.to_path_buf(),
            ));
            Ok(())
        }
    }

    /// Fails on one label, succeeds otherwise.
    struct FailingRenderer {
        fail_on: &'static str,
    }

    impl ChartRenderer for FailingRenderer {
        fn render(&self, chart: &BarChart<'_>, path: &Path) -> Result<(), Error> {
            if chart.label == self.fail_on {
                Err(Error::render("boom", path))
            } else {
                Ok(())
            }
        }
    }

    fn record(category: FeatureCategory, strand: Strand, start: i64, end: i64) -> FeatureRecord {
        FeatureRecord {
            category,
            strand,
            start,
            end,
        }
    }

    fn sample_store() -> CategoryStore {
        vec![
            record(FeatureCategory::MRna, Strand::Plus, 100, 500),
            record(FeatureCategory::MRna, Strand::Minus, 0, 70),
            record(FeatureCategory::MRna, Strand::Other, 0, 5),
            record(FeatureCategory::Cds, Strand::Minus, 50, 20),
            record(FeatureCategory::FivePrimeUtr, Strand::Plus, 1, 11),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_labels_and_file_names() {
        assert_eq!(chart_label(FeatureCategory::MRna, StrandView::All), "mRNA");
        assert_eq!(chart_label(FeatureCategory::MRna, StrandView::Plus), "mRNAPlus");
        assert_eq!(
            output_file_name(FeatureCategory::ThreePrimeUtr, StrandView::Minus),
            "barThreePrimeUTRMinus.png"
        );
        assert_eq!(
            output_file_name(FeatureCategory::Exon, StrandView::All),
            "barExon.png"
        );
    }

    #[test]
    fn test_file_names_are_unique() {
        let names: std::collections::HashSet<String> = FeatureCategory::ALL
            .iter()
            .flat_map(|c| StrandView::ALL.iter().map(move |v| output_file_name(*c, *v)))
            .collect();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn test_plan_jobs_order_and_paths() {
        let jobs = plan_jobs(&sample_store(), Path::new("/tmp/out"));
        assert_eq!(jobs.len(), 18);
        assert_eq!(jobs[0].label, "mRNA");
        assert_eq!(jobs[1].label, "mRNAPlus");
        assert_eq!(jobs[2].label, "mRNAMinus");
        assert_eq!(jobs[3].label, "Exon");
        assert_eq!(jobs[17].label, "ThreePrimeUTRMinus");
        assert_eq!(jobs[2].path, PathBuf::from("/tmp/out/barmRNAMinus.png"));
    }

    #[test]
    fn test_each_view_uses_its_own_sequence() {
        let renderer = RecordingRenderer::default();
        let options = EmitOptions {
            out_dir: PathBuf::from("out"),
            ..Default::default()
        };
        let written = emit_all(&sample_store(), &renderer, &options).unwrap();
        assert_eq!(written.len(), 18);

        let calls = renderer.calls.into_inner().unwrap();
        let by_label: HashMap<String, Vec<i64>> =
            calls.into_iter().map(|(label, values, _)| (label, values)).collect();

        assert_eq!(by_label["mRNA"], vec![400, 70, 5]);
        assert_eq!(by_label["mRNAPlus"], vec![400]);
        assert_eq!(by_label["mRNAMinus"], vec![70]);
        assert_eq!(by_label["CDS"], vec![-30]);
        assert!(by_label["CDSPlus"].is_empty());
        assert_eq!(by_label["CDSMinus"], vec![-30]);
        assert_eq!(by_label["FivePrimeUTRPlus"], vec![10]);
        assert!(by_label["FivePrimeUTRMinus"].is_empty());
        assert!(by_label["Protein"].is_empty());
    }

    #[test]
    fn test_empty_store_still_emits_all_charts() {
        let renderer = RecordingRenderer::default();
        let written = emit_all(&CategoryStore::new(), &renderer, &EmitOptions::default()).unwrap();
        assert_eq!(written.len(), 18);
        let calls = renderer.calls.into_inner().unwrap();
        assert!(calls.iter().all(|(_, values, _)| values.is_empty()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let store = sample_store();

        let sequential = RecordingRenderer::default();
        let seq_paths = emit_all(&store, &sequential, &EmitOptions::default()).unwrap();

        let parallel = RecordingRenderer::default();
        let par_options = EmitOptions {
            threads: 4,
            ..Default::default()
        };
        let par_paths = emit_all(&store, &parallel, &par_options).unwrap();

        assert_eq!(seq_paths, par_paths);

        let mut seq_calls = sequential.calls.into_inner().unwrap();
        let mut par_calls = parallel.calls.into_inner().unwrap();
        seq_calls.sort();
        par_calls.sort();
        assert_eq!(seq_calls, par_calls);
    }

    #[test]
    fn test_renderer_failure_is_fatal() {
        let renderer = FailingRenderer { fail_on: "CDSPlus" };
        let err = emit_all(&sample_store(), &renderer, &EmitOptions::default()).unwrap_err();
        assert!(err.to_string().contains("barCDSPlus.png"));
    }

    #[test]
    fn test_bar_width_is_passed_through() {
        struct WidthCheck;
        impl ChartRenderer for WidthCheck {
            fn render(&self, chart: &BarChart<'_>, _path: &Path) -> Result<(), Error> {
                assert_eq!(chart.bar_width, 3);
                Ok(())
            }
        }
        let options = EmitOptions {
            bar_width: 3,
            ..Default::default()
        };
        emit_all(&sample_store(), &WidthCheck, &options).unwrap();
    }
}
