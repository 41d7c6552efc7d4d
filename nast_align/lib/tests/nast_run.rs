use std::fs;
use std::path::{Path, PathBuf};

use bio::io::fasta;
use nast_core::{run_nast, HitSource, NastConfig, NastError};
use tempfile::TempDir;

const TEMPLATE: &str = ">t1\nAAA-A.CC\n>t2\nGG--GGTT\n";
// c4 is the reverse complement of t2, c5 never hits
const CANDIDATES: &str = ">c1\nAAGAACC\n>c2\nggggtt\n>c3\nGGGGAAATT\n>c4\nAACCCC\n>c5\nTTTT\n";
const HITS: &str = "c1\tt1\t85.7\tMMDMMMM\t+\n\
                    c1\tt2\t80.0\tMMMMMM\t+\n\
                    c2\tt2\t100.0\tMMMMMM\t+\n\
                    c3\tt2\t66.7\tMMMMDDDMM\t+\n\
                    c4\tt2\t100.0\tMMMMMM\t-\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(template: &str, candidates: &str, hits: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("template.fasta"), template).unwrap();
        fs::write(dir.path().join("input.fasta"), candidates).unwrap();
        fs::write(dir.path().join("hits_in.tsv"), hits).unwrap();
        Fixture { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> NastConfig {
        NastConfig {
            input: self.path("input.fasta"),
            template: self.path("template.fasta"),
            output: self.path("msa.fasta"),
            notaligned: Some(self.path("notaligned.fasta")),
            hits: Some(self.path("hits.tsv")),
            hit_source: HitSource::Precomputed(self.path("hits_in.tsv")),
            threads: 1,
            notrim: false,
            nofilter: false,
        }
    }
}

fn read_fasta(path: &Path) -> Vec<(String, String)> {
    fasta::Reader::from_file(path)
        .unwrap()
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r.id().to_string(), String::from_utf8(r.seq().to_vec()).unwrap())
        })
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(id, seq)| (id.to_string(), seq.to_string()))
        .collect()
}

#[test]
fn places_candidates_and_routes_failures() {
    let fx = Fixture::new(TEMPLATE, CANDIDATES, HITS);
    let summary = run_nast(&fx.config()).unwrap();

    assert_eq!(summary.candidates, 5);
    assert_eq!(summary.aligned, 3);
    assert_eq!(summary.unalignable, 1);
    assert_eq!(summary.no_hit, 1);
    assert_eq!(summary.ncols, 8);
    assert_eq!(summary.kept_columns, 8);

    assert_eq!(
        read_fasta(&fx.path("msa.fasta")),
        pairs(&[("c1", "AAGAA-CC"), ("c2", "GG--GGTT"), ("c4", "GG--GGTT")])
    );
    assert_eq!(
        read_fasta(&fx.path("notaligned.fasta")),
        pairs(&[("c3", "GGGGAAATT"), ("c5", "TTTT")])
    );
    let hits = fs::read_to_string(fx.path("hits.tsv")).unwrap();
    assert_eq!(
        hits.lines().collect::<Vec<_>>(),
        vec!["c1\tt1\t85.7", "c2\tt2\t100.0", "c4\tt2\t100.0"]
    );
}

#[test]
fn unalignable_candidates_leave_coverage_alone() {
    // c2 is the reverse complement of ACTTGT, whose inserted Ts would fill the template gap
    let template = ">t1\nAC-GT\n";
    let candidates = ">c1\nACGT\n>c2\nACAAGT\n";
    let hits = "c1\tt1\t100.0\tMMMM\t+\n\
                c2\tt1\t66.7\tMMDDMM\t-\n";
    let fx = Fixture::new(template, candidates, hits);
    let summary = run_nast(&fx.config()).unwrap();

    assert_eq!(summary.aligned, 1);
    assert_eq!(summary.unalignable, 1);
    assert_eq!(summary.ncols, 5);
    assert_eq!(summary.kept_columns, 4);
    assert_eq!(read_fasta(&fx.path("msa.fasta")), pairs(&[("c1", "ACGT")]));
    assert_eq!(
        read_fasta(&fx.path("notaligned.fasta")),
        pairs(&[("c2", "ACTTGT")])
    );
}

#[test]
fn uncovered_columns_are_filtered() {
    let fx = Fixture::new(TEMPLATE, ">c1\nAAGAACC\n", "c1\tt1\t85.7\tMMDMMMM\t+\n");
    let summary = run_nast(&fx.config()).unwrap();
    assert_eq!(summary.kept_columns, 7);
    assert_eq!(read_fasta(&fx.path("msa.fasta")), pairs(&[("c1", "AAGAACC")]));
}

#[test]
fn nofilter_keeps_every_template_column() {
    let fx = Fixture::new(TEMPLATE, ">c1\nAAGAACC\n", "c1\tt1\t85.7\tMMDMMMM\t+\n");
    let config = NastConfig {
        nofilter: true,
        ..fx.config()
    };
    let summary = run_nast(&config).unwrap();
    assert_eq!(summary.kept_columns, 8);
    assert_eq!(read_fasta(&fx.path("msa.fasta")), pairs(&[("c1", "AAGAA-CC")]));
}

#[test]
fn notrim_forces_overhang_into_the_template() {
    // candidate overhangs t3 by one base on each side
    let template = ">t3\n-ACGT-\n";
    let hits = "c1\tt3\t100.0\tDMMMMD\t+\n";
    let fx = Fixture::new(template, ">c1\nGACGTC\n", hits);

    let trimmed = NastConfig {
        nofilter: true,
        ..fx.config()
    };
    run_nast(&trimmed).unwrap();
    assert_eq!(read_fasta(&fx.path("msa.fasta")), pairs(&[("c1", "-ACGT-")]));

    let untrimmed = NastConfig {
        notrim: true,
        ..trimmed
    };
    run_nast(&untrimmed).unwrap();
    assert_eq!(read_fasta(&fx.path("msa.fasta")), pairs(&[("c1", "GACGTC")]));
}

#[test]
fn output_is_independent_of_thread_count() {
    let fx = Fixture::new(TEMPLATE, CANDIDATES, HITS);
    run_nast(&fx.config()).unwrap();
    let single = fs::read(fx.path("msa.fasta")).unwrap();

    let config = NastConfig {
        threads: 4,
        output: fx.path("msa4.fasta"),
        ..fx.config()
    };
    run_nast(&config).unwrap();
    assert_eq!(fs::read(fx.path("msa4.fasta")).unwrap(), single);
}

#[test]
fn optional_outputs_are_not_written_when_unset() {
    let fx = Fixture::new(TEMPLATE, CANDIDATES, HITS);
    let config = NastConfig {
        notaligned: None,
        hits: None,
        ..fx.config()
    };
    run_nast(&config).unwrap();
    assert!(fx.path("msa.fasta").exists());
    assert!(!fx.path("notaligned.fasta").exists());
    assert!(!fx.path("hits.tsv").exists());
    let leftovers: Vec<_> = fs::read_dir(fx.dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".nast_"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupt_alignment_string_aborts_the_run() {
    let fx = Fixture::new(TEMPLATE, CANDIDATES, "c1\tt1\t85.7\tMMXMMMM\t+\n");
    let err = run_nast(&fx.config()).unwrap_err();
    match err {
        NastError::CandidateMismatch { candidate, template, .. } => {
            assert_eq!(candidate, "c1");
            assert_eq!(template, "t1");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fx.path("msa.fasta").exists());
}

#[test]
fn unknown_template_id_is_reported() {
    let fx = Fixture::new(TEMPLATE, CANDIDATES, "c1\tt9\t85.7\tMMDMMMM\t+\n");
    assert!(matches!(
        run_nast(&fx.config()),
        Err(NastError::MissingRecord { kind: "template", .. })
    ));
}

#[test]
fn ragged_template_is_a_format_error() {
    let fx = Fixture::new(">t1\nAC-GT\n>t2\nACG\n", CANDIDATES, HITS);
    assert!(matches!(run_nast(&fx.config()), Err(NastError::Format { .. })));
}
