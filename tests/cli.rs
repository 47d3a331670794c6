/// End-to-end tests for the gffbars binary
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

const CATEGORIES: [&str; 6] = [
    "mRNA",
    "Exon",
    "CDS",
    "Protein",
    "FivePrimeUTR",
    "ThreePrimeUTR",
];
const VIEWS: [&str; 3] = ["", "Plus", "Minus"];

/// Helper to write a small annotation with every category, both strands,
/// an unstranded record, an inverted interval and a malformed line.
fn create_test_annotation(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("genes.gff3");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "##gff-version 3").unwrap();
    writeln!(file, "chr1\tsrc\tgene\t100\t900\t.\t+\t.\tID=g1").unwrap();
    writeln!(file, "chr1\tsrc\tmRNA\t100\t500\t.\t+\t.\tID=x").unwrap();
    writeln!(file, "chr1\tsrc\tmRNA\t600\t900\t.\t-\t.\tID=x2").unwrap();
    writeln!(file, "chr1\tsrc\texon\t100\t200\t.\t+\t.\tParent=x").unwrap();
    writeln!(file, "chr1\tsrc\texon\t300\t310\t.\t.\t.\tParent=x").unwrap();
    writeln!(file, "chr1\tsrc\tCDS\t50\t20\t.\t-\t.\tID=y").unwrap();
    writeln!(file, "chr1\tsrc\tprotein\t120\t480\t.\t+\t.\tID=p").unwrap();
    writeln!(file, "chr1\tsrc\tfive_prime_UTR\t100\t119\t.\t+\t.\tParent=x").unwrap();
    writeln!(file, "chr1\tsrc\tthree_prime_UTR\t481\t500\t.\t-\t.\tParent=x").unwrap();
    writeln!(file, "chr1\tsrc\tmRNA\t1").unwrap();
    path
}

fn assert_all_charts_written(out_dir: &Path) {
    for category in CATEGORIES {
        for view in VIEWS {
            let path = out_dir.join(format!("bar{category}{view}.png"));
            let bytes = fs::read(&path)
                .unwrap_or_else(|e| panic!("missing {}: {}", path.display(), e));
            assert_eq!(&bytes[..8], &PNG_MAGIC, "{} is not a PNG", path.display());
        }
    }
}

#[test]
fn test_writes_eighteen_charts() {
    let tmpdir = TempDir::new().unwrap();
    let annotation = create_test_annotation(&tmpdir);
    let out_dir = tmpdir.path().join("plots");
    fs::create_dir(&out_dir).unwrap();

    Command::cargo_bin("gffbars")
        .unwrap()
        .arg("--annotationfile")
        .arg(&annotation)
        .arg("--outDir")
        .arg(&out_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Annotation plotting complete!"))
        .stderr(predicate::str::contains("Wrote 18 bar charts"))
        .stderr(predicate::str::contains("Skipping malformed annotation line 11"))
        .stderr(predicate::str::contains("Retained features: 8"));

    assert_all_charts_written(&out_dir);

    let pngs = fs::read_dir(&out_dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
        .count();
    assert_eq!(pngs, 18);
}

#[test]
fn test_empty_annotation_writes_empty_charts() {
    let tmpdir = TempDir::new().unwrap();
    let annotation = tmpdir.path().join("empty.gff");
    fs::write(&annotation, "##gff-version 3\n").unwrap();

    Command::cargo_bin("gffbars")
        .unwrap()
        .arg("-A")
        .arg(&annotation)
        .arg("--outDir")
        .arg(tmpdir.path())
        .arg("--runThreadN")
        .arg("4")
        .assert()
        .success()
        .stderr(predicate::str::contains("No retained features found"))
        .stderr(predicate::str::contains("Wrote 18 bar charts"));

    assert_all_charts_written(tmpdir.path());
}

#[test]
fn test_missing_annotation_fails_without_output() {
    let tmpdir = TempDir::new().unwrap();
    let out_dir = tmpdir.path().join("plots");
    fs::create_dir(&out_dir).unwrap();

    Command::cargo_bin("gffbars")
        .unwrap()
        .arg("-A")
        .arg(tmpdir.path().join("does_not_exist.gff"))
        .arg("--outDir")
        .arg(&out_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does_not_exist.gff"));

    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn test_missing_out_dir_is_rejected() {
    let tmpdir = TempDir::new().unwrap();
    let annotation = create_test_annotation(&tmpdir);

    Command::cargo_bin("gffbars")
        .unwrap()
        .arg("-A")
        .arg(&annotation)
        .arg("--outDir")
        .arg(tmpdir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("outDir"));
}

#[test]
fn test_annotation_flag_is_required() {
    Command::cargo_bin("gffbars")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--annotationfile"));
}

#[test]
fn test_engine_is_deterministic() {
    use gffbars::annotation::{read_annotations, CoordinateFallback, FeatureCategory};
    use gffbars::stratify::stratify;

    let tmpdir = TempDir::new().unwrap();
    let annotation = create_test_annotation(&tmpdir);

    let (first, _) = read_annotations(&annotation, CoordinateFallback::Skip).unwrap();
    let (second, _) = read_annotations(&annotation, CoordinateFallback::Skip).unwrap();
    assert_eq!(first, second);

    for category in FeatureCategory::ALL {
        assert_eq!(
            stratify(first.records(category)),
            stratify(second.records(category))
        );
    }

    let mrna = stratify(first.records(FeatureCategory::MRna));
    assert_eq!(mrna.all, vec![400, 300]);
    assert_eq!(mrna.plus, vec![400]);
    assert_eq!(mrna.minus, vec![300]);

    let exon = stratify(first.records(FeatureCategory::Exon));
    assert_eq!(exon.all, vec![100, 10]);
    assert_eq!(exon.plus, vec![100]);
    assert!(exon.minus.is_empty());

    let cds = stratify(first.records(FeatureCategory::Cds));
    assert_eq!(cds.all, vec![-30]);
    assert_eq!(cds.minus, vec![-30]);
}
