
// keep only the columns between the first and last template base

use super::error::{NastError, Result};
use super::is_gap;

pub fn trim_span<'a>(template_aln: &'a [u8], candidate_aln: &'a [u8]) -> Result<(&'a [u8], &'a [u8])> {
    if template_aln.len() != candidate_aln.len() {
        return Err(NastError::mismatch(format!(
            "template/candidate alignment lengths differ ({} vs {})",
            template_aln.len(),
            candidate_aln.len()
        )));
    }
    let start = template_aln.iter().position(|&b| !is_gap(b));
    let end = template_aln.iter().rposition(|&b| !is_gap(b));
    match (start, end) {
        (Some(start), Some(end)) => Ok((&template_aln[start..=end], &candidate_aln[start..=end])),
        _ => Err(NastError::mismatch("aligned template contains only gaps")),
    }
}
