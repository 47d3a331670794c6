pub mod error;
pub mod params;

pub mod annotation;
pub mod chart;
pub mod stats;
pub mod store;
pub mod stratify;

use log::{info, warn};

use crate::chart::{EmitOptions, PlottersRenderer};
use crate::params::Parameters;

/// Top-level driver. Called from `main()` after CLI parsing.
///
/// Ingestion finishes before any chart is written, so an unreadable input
/// produces no output at all.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("gffbars v{}", env!("CARGO_PKG_VERSION"));
    info!("annotationfile: {}", params.annotation_file.display());
    info!("outDir: {}", params.out_dir.display());
    info!("runThreadN: {}", params.run_thread_n);

    let (store, stats) =
        annotation::read_annotations(&params.annotation_file, params.coordinate_fallback)?;
    stats.print_summary();
    if store.is_empty() {
        warn!("No retained features found; every chart will be empty");
    }

    let options = EmitOptions {
        out_dir: params.out_dir.clone(),
        bar_width: params.bar_width,
        threads: params.run_thread_n,
    };
    let written = chart::emit_all(&store, &PlottersRenderer::new(), &options)?;

    info!(
        "Wrote {} bar charts to {}",
        written.len(),
        params.out_dir.display()
    );
    info!("Annotation plotting complete!");
    Ok(())
}
