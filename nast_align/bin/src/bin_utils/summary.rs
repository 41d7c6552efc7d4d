use log::{info, warn};
use nast_core::NastSummary;
use crate::bin_utils::get_args::Cli;

// log the outcome of a run
pub fn report_summary(summary: &NastSummary, cli: &Cli) {
    info!("Candidates read: {}", summary.candidates);
    info!("Aligned: {} -> {:?}", summary.aligned, cli.output);
    info!("Columns kept: {} of {}", summary.kept_columns, summary.ncols);
    let not_aligned = summary.unalignable + summary.no_hit;
    if not_aligned == 0 {
        return;
    }
    match &cli.notaligned {
        Some(path) => info!("Not aligned: {} ({} without hit, {} unalignable) -> {:?}",
                            not_aligned, summary.no_hit, summary.unalignable, path),
        None => warn!("{} candidates not aligned ({} without hit, {} unalignable), \
                       use --notaligned to keep them", not_aligned, summary.no_hit, summary.unalignable),
    }
}
