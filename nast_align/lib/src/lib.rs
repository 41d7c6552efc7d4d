/*
    Place candidate sequences into the columns of a template alignment (NAST)
        decode: aligner alignment string -> two gapped rows
        trim: bound the rows to the aligned template span
        reconcile: re-expand into template columns, absorb insertions in nearby gaps
        coverage: count covered columns, project rows onto them
        nast: drive one candidate at a time from hits to MSA rows

    Gaps are '-' or '.', both read as '-'.
*/

pub mod lib_utils;

pub use lib_utils::coverage::ColumnCoverage;
pub use lib_utils::decode::{aln_to_seqs, AlignOp};
pub use lib_utils::error::{NastError, Result};
pub use lib_utils::hits::{read_hits, read_hits_file, Hit, HitWriter, Strand};
pub use lib_utils::nast::{run_nast, HitSource, NastConfig, NastSummary};
pub use lib_utils::reconcile::{absorb_insertions, nast_core, reexpand, Expansion};
pub use lib_utils::template::{TemplateAlignment, TemplateRow};
pub use lib_utils::trim::trim_span;
pub use lib_utils::vsearch::{usearch_global, SearchStrand, VsearchParams};
