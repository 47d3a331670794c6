/// Single-pass annotation file reader
use super::{classify_line, Classified, CoordinateFallback};
use crate::error::Error;
use crate::stats::IngestStats;
use crate::store::CategoryStore;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// GFF3 directive after which the file holds sequences, not features.
const FASTA_DIRECTIVE: &str = "##FASTA";

/// Open an annotation file (plain or gzip compressed, detected by extension).
///
/// Concatenated gzip members (bgzip output) are read through to the end.
pub fn open_annotation(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let path_str = path.to_string_lossy();
    let is_gzipped = path_str.ends_with(".gz") || path_str.ends_with(".gzip");

    let file = File::open(path).map_err(|e| Error::io(e, path))?;

    if is_gzipped {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read an annotation file into a [`CategoryStore`].
///
/// The file handle is dropped before this returns, whether or not ingestion
/// succeeded.
pub fn read_annotations(
    path: &Path,
    fallback: CoordinateFallback,
) -> Result<(CategoryStore, IngestStats), Error> {
    log::info!("Reading annotations from: {}", path.display());
    let reader = open_annotation(path)?;
    ingest(reader, fallback).map_err(|e| match e {
        Error::Io { source, .. } => Error::io(source, path),
        other => other,
    })
}

/// Classify every line of `reader`, appending retained records in file order.
///
/// Lines are decoded lossily: bytes that are not UTF-8 become U+FFFD, which
/// only matters if they land in a column that is parsed. Malformed lines are
/// logged and skipped. Read errors abort ingestion.
pub fn ingest<R: BufRead>(
    mut reader: R,
    fallback: CoordinateFallback,
) -> Result<(CategoryStore, IngestStats), Error> {
    let mut store = CategoryStore::new();
    let mut stats = IngestStats::new();
    let mut buf = Vec::new();
    let mut line_num = 0usize;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(|e| {
            Error::from(std::io::Error::new(
                e.kind(),
                format!("failed to read line {}: {}", line_num + 1, e),
            ))
        })?;
        if n == 0 {
            break;
        }
        line_num += 1;

        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim_end_matches(['\n', '\r']);

        if line.starts_with(FASTA_DIRECTIVE) {
            log::debug!("Reached {} at line {}, stopping", FASTA_DIRECTIVE, line_num);
            break;
        }

        stats.total_lines += 1;

        if line.trim().is_empty() || line.starts_with('#') {
            stats.comment_lines += 1;
            continue;
        }

        match classify_line(line, fallback) {
            Ok(Classified::Feature(record)) => {
                stats.record_feature(record.category);
                store.push(record);
            }
            Ok(Classified::Ignored) => stats.ignored += 1,
            Err(e) => {
                log::warn!("Skipping malformed annotation line {}: {}", line_num, e);
                stats.malformed += 1;
            }
        }
    }

    Ok((store, stats))
}
