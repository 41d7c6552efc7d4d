/*
    Rebuild the two gapped rows described by an aligner's alignment string
        M   candidate and template both consume one character
        I   template consumes, candidate gets a gap
        D   candidate consumes, template gets a gap
    Both ungapped sequences must be consumed exactly.
*/

use super::error::{NastError, Result};
use super::GAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOp {
    Match,
    Insert,
    Delete,
}

impl AlignOp {
    pub fn from_code(code: u8) -> Option<AlignOp> {
        match code {
            b'M' => Some(AlignOp::Match),
            b'I' => Some(AlignOp::Insert),
            b'D' => Some(AlignOp::Delete),
            _ => None,
        }
    }
}

/// Returns `(template_aligned, candidate_aligned)`, both as long as `aln`.
pub fn aln_to_seqs(aln: &[u8], template: &[u8], candidate: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut template_aln = Vec::with_capacity(aln.len());
    let mut candidate_aln = Vec::with_capacity(aln.len());
    let (mut i, mut j) = (0usize, 0usize);

    for (col, &code) in aln.iter().enumerate() {
        let op = AlignOp::from_code(code).ok_or_else(|| {
            NastError::mismatch(format!(
                "unknown alignment op {:?} at column {}",
                code as char, col
            ))
        })?;
        let (consume_candidate, consume_template) = match op {
            AlignOp::Match => (true, true),
            AlignOp::Insert => (false, true),
            AlignOp::Delete => (true, false),
        };
        if consume_template {
            let base = *template.get(j).ok_or_else(|| {
                NastError::mismatch(format!(
                    "alignment string runs past the template ({} bases) at column {}",
                    template.len(),
                    col
                ))
            })?;
            template_aln.push(base);
            j += 1;
        } else {
            template_aln.push(GAP);
        }
        if consume_candidate {
            let base = *candidate.get(i).ok_or_else(|| {
                NastError::mismatch(format!(
                    "alignment string runs past the candidate ({} bases) at column {}",
                    candidate.len(),
                    col
                ))
            })?;
            candidate_aln.push(base);
            i += 1;
        } else {
            candidate_aln.push(GAP);
        }
    }

    if j != template.len() || i != candidate.len() {
        return Err(NastError::mismatch(format!(
            "alignment string consumed {}/{} template and {}/{} candidate bases",
            j,
            template.len(),
            i,
            candidate.len()
        )));
    }
    Ok((template_aln, candidate_aln))
}
