/// Line classification for GFF-like annotation files
///
/// Columns consumed (0-based, tab-separated):
/// 2. feature type (mRNA, exon, CDS, protein, five_prime_UTR, three_prime_UTR)
/// 3. start
/// 4. end
/// 6. strand (+, -, anything else)
///
/// All other columns are carried through untouched and never inspected.
use super::{FeatureCategory, FeatureRecord, Strand};
use crate::error::Error;

/// Fewer tab-separated fields than this and the strand column is missing.
pub const MIN_FIELDS: usize = 7;

/// What to do with a feature line whose start or end is not an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateFallback {
    /// Reject the line (it is logged and skipped by the reader).
    #[default]
    Skip,
    /// Substitute 0 for the unparsable coordinate and keep the record.
    Zero,
}

impl std::str::FromStr for CoordinateFallback {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "zero" => Ok(Self::Zero),
            _ => Err(format!(
                "unknown coordinateFallback '{s}'; expected 'skip' or 'zero'"
            )),
        }
    }
}

impl std::fmt::Display for CoordinateFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Zero => write!(f, "zero"),
        }
    }
}

/// Outcome of classifying one well-formed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Feature(FeatureRecord),
    /// Feature type is not one of the six retained categories.
    Ignored,
}

/// Classify a single annotation line.
///
/// Returns `Err` for lines that are too short, whose `end - start` does not
/// fit in an `i64`, or, under [`CoordinateFallback::Skip`], have a
/// non-integer start/end on a retained feature. The caller decides whether
/// that is fatal; the reader skips them.
pub fn classify_line(line: &str, fallback: CoordinateFallback) -> Result<Classified, Error> {
    let fields: Vec<&str> = line.split('\t').collect();

    if fields.len() < MIN_FIELDS {
        return Err(Error::Annotation(format!(
            "line has {} fields, expected at least {}",
            fields.len(),
            MIN_FIELDS
        )));
    }

    let Some(category) = FeatureCategory::from_label(fields[2]) else {
        return Ok(Classified::Ignored);
    };

    let start = parse_coordinate(fields[3], "start", fallback)?;
    let end = parse_coordinate(fields[4], "end", fallback)?;
    if end.checked_sub(start).is_none() {
        return Err(Error::Annotation(format!(
            "length of interval {}..{} overflows",
            start, end
        )));
    }
    let strand = Strand::from_symbol(fields[6]);

    Ok(Classified::Feature(FeatureRecord {
        category,
        strand,
        start,
        end,
    }))
}

fn parse_coordinate(field: &str, name: &str, fallback: CoordinateFallback) -> Result<i64, Error> {
    match field.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(_) if fallback == CoordinateFallback::Zero => Ok(0),
        Err(e) => Err(Error::Annotation(format!(
            "invalid {} position '{}': {}",
            name, field, e
        ))),
    }
}
