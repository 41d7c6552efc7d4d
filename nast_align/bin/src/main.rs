/*
Place candidate sequences into a template multiple sequence alignment (NAST)
    + search every candidate against the ungapped templates with vsearch
        + or read a hit table produced earlier
    + keep the best hit of every candidate
    + rebuild the pairwise alignment and fit it into the template columns
        + insertions are absorbed by the nearest template gap
        + candidates with no gap left are reported as not aligned
    + drop columns that are gaps in every placed candidate

Arguments
    input candidates, template alignment, output MSA
    optional not-aligned FASTA and hits table
    vsearch thresholds: identity, coverage, strand, threads
*/

mod bin_utils;
use anyhow::Context;
use clap::Parser;
use bin_utils::get_args::Cli;
use bin_utils::summary::report_summary;
use log::{debug, error};
use nast_core::run_nast;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    let config = cli.nast_config();
    debug!("{:?}", config);
    let summary = match run_nast(&config) {
        Ok(summary) => summary,
        Err(err) => {
            error!("Alignment failed: {}", err);
            return Err(err).with_context(|| format!("NAST alignment of {:?} failed", cli.input));
        }
    };
    report_summary(&summary, &cli);
    Ok(())
}
