use clap::{Parser, ValueEnum};
use nast_core::{HitSource, NastConfig, SearchStrand, VsearchParams};
use std::ops::RangeInclusive;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Candidate sequences in FASTA format
    #[arg(short='i', long="input", required = true)]
    pub input: PathBuf,
    /// Output MSA file in FASTA format
    #[arg(short='o', long="output", required = true)]
    pub output: PathBuf,
    /// Multiple sequence alignment template in FASTA format
    #[arg(short='t', long="template", required = true)]
    pub template: PathBuf,
    /// Write candidates that could not be aligned in FASTA format
    #[arg(long="notaligned")]
    pub notaligned: Option<PathBuf>,
    /// Write the candidate id, template id and identity of every placed candidate (TAB delimited)
    #[arg(long="hits")]
    pub hits: Option<PathBuf>,
    /// Read the aligner hit table (query, target, id, aln, qstrand) instead of running vsearch
    #[arg(long="hits-input")]
    pub hits_input: Option<PathBuf>,
    /// Sequence identity threshold to consider a candidate a match. Default: 0.75
    #[arg(long="id", value_parser=validate_fraction, default_value_t=0.75)]
    pub ident: f64,
    /// Reject candidates whose aligned fraction is lower than this. Default: 0.75
    #[arg(long="mincov", value_parser=validate_fraction, default_value_t=0.75)]
    pub mincov: f64,
    /// Number of threads, 1 to 256. Default: 1
    #[arg(short='n', long="threads", value_parser=validate_threads, default_value_t=1)]
    pub nproc: usize,
    /// Search both strands or the plus strand only. Default: both
    #[arg(long="strand", value_enum, default_value_t=Strand::Both)]
    pub strand: Strand,
    /// Do not remove columns which are gaps in every aligned candidate
    #[arg(long="nofilter")]
    pub nofilter: bool,
    /// Align the entire candidate instead of the span bound by the template
    #[arg(long="notrim")]
    pub notrim: bool,
    /// vsearch executable
    #[arg(long="vsearch", default_value = "vsearch")]
    pub vsearch: PathBuf,
}

const FRACTION: RangeInclusive<f64> = 0f64..=1f64;
const THREADS: RangeInclusive<usize> = 1..=256;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Strand {
    Both,
    Plus
}

impl From<Strand> for SearchStrand {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Both => SearchStrand::Both,
            Strand::Plus => SearchStrand::Plus,
        }
    }
}

impl Cli {
    pub fn nast_config(&self) -> NastConfig {
        let hit_source = match &self.hits_input {
            Some(path) => HitSource::Precomputed(path.clone()),
            None => HitSource::Vsearch(VsearchParams {
                program: self.vsearch.clone(),
                ident: self.ident,
                mincov: self.mincov,
                threads: self.nproc,
                strand: self.strand.into(),
            }),
        };
        NastConfig {
            input: self.input.clone(),
            template: self.template.clone(),
            output: self.output.clone(),
            notaligned: self.notaligned.clone(),
            hits: self.hits.clone(),
            hit_source,
            threads: self.nproc,
            notrim: self.notrim,
            nofilter: self.nofilter,
        }
    }
}

fn validate_fraction(input_str: &str) -> Result<f64, String> {
    let fraction: f64 = input_str
        .parse()
        .map_err(|e| format!("{input_str:?} is not a number: {e}"))?;
    if FRACTION.contains(&fraction) {
        Ok(fraction)
    } else {
        Err(
            format!("Value not in the range {} - {}", FRACTION.start(), FRACTION.end())
        )
    }
}

fn validate_threads(input_str: &str) -> Result<usize, String> {
    let nproc: usize = input_str
        .parse()
        .map_err(|e| format!("{input_str:?} is not a thread count: {e}"))?;
    if THREADS.contains(&nproc) {
        Ok(nproc)
    } else {
        Err(
            format!("Threads not in the range {} - {}", THREADS.start(), THREADS.end())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut all_args = vec!["nast_align", "-i", "in.fasta", "-o", "msa.fasta", "-t", "template.fasta"];
        all_args.extend_from_slice(args);
        Cli::try_parse_from(all_args)
    }

    #[test]
    fn default_values() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.ident, 0.75);
        assert_eq!(cli.mincov, 0.75);
        assert_eq!(cli.nproc, 1);
        assert_eq!(cli.strand, Strand::Both);
        assert!(!cli.nofilter);
        assert!(!cli.notrim);
        assert_eq!(cli.vsearch, PathBuf::from("vsearch"));
    }

    #[test]
    fn vsearch_is_the_default_hit_source() {
        let config = parse(&["--id", "0.97", "-n", "8", "--strand", "plus"]).unwrap().nast_config();
        match config.hit_source {
            HitSource::Vsearch(params) => {
                assert_eq!(params.ident, 0.97);
                assert_eq!(params.threads, 8);
                assert_eq!(params.strand, SearchStrand::Plus);
            }
            other => panic!("unexpected hit source {other:?}"),
        }
        assert_eq!(config.threads, 8);
    }

    #[test]
    fn hits_input_skips_the_aligner() {
        let config = parse(&["--hits-input", "hits.tsv", "--nofilter", "--notrim"]).unwrap().nast_config();
        assert_eq!(config.hit_source, HitSource::Precomputed(PathBuf::from("hits.tsv")));
        assert!(config.nofilter);
        assert!(config.notrim);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["--id", "1.5"]).is_err());
        assert!(parse(&["--mincov", "abc"]).is_err());
        assert!(parse(&["-n", "0"]).is_err());
        assert!(parse(&["-n", "257"]).is_err());
    }

    #[test]
    fn template_is_required() {
        assert!(Cli::try_parse_from(["nast_align", "-i", "in.fasta", "-o", "msa.fasta"]).is_err());
    }
}
