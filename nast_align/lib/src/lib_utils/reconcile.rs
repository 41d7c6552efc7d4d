/*
    Nearest Alignment Space Termination
        Re-expand the aligned candidate into the gapped template's columns
            template base == aligned template base    copy candidate column
            template gap, aligned template gap        copy candidate column
            template gap, aligned template base       emit a gap
            template base, aligned template gap       copy candidate column, remember insertion
        For every insertion drop the nearest gap column, left side wins ties
        Fail when an insertion has no gap left to absorb it
*/

use log::trace;
use super::error::{NastError, Result};
use super::{is_gap, GAP};

/// Candidate columns laid out on the template, before insertions are absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub columns: Vec<u8>,
    /// Output positions holding a column the template does not have, in walk order.
    pub insertions: Vec<usize>,
}

pub fn reexpand(template: &[u8], template_aln: &[u8], candidate_aln: &[u8]) -> Result<Expansion> {
    if template_aln.len() != candidate_aln.len() {
        return Err(NastError::mismatch(format!(
            "template/candidate alignment lengths differ ({} vs {})",
            template_aln.len(),
            candidate_aln.len()
        )));
    }
    let mut columns = Vec::with_capacity(template.len() + template_aln.len());
    let mut insertions = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < template.len() && j < template_aln.len() {
        let (t, a) = (template[i], template_aln[j]);
        match (is_gap(t), is_gap(a)) {
            (false, false) if t == a => {
                columns.push(candidate_aln[j]);
                i += 1;
                j += 1;
            }
            (true, true) => {
                // the aligner's extra column lands on a column the template already leaves empty
                columns.push(candidate_aln[j]);
                i += 1;
                j += 1;
            }
            (true, false) => {
                columns.push(GAP);
                i += 1;
            }
            (false, true) => {
                insertions.push(columns.len());
                columns.push(candidate_aln[j]);
                j += 1;
            }
            _ => {
                return Err(NastError::mismatch(format!(
                    "template column {} ({}) cannot pair with aligned template column {} ({})",
                    i, t as char, j, a as char
                )))
            }
        }
    }

    columns.resize(columns.len() + (template.len() - i), GAP);
    for &b in &candidate_aln[j..] {
        insertions.push(columns.len());
        columns.push(b);
    }
    trace!("re-expanded to {} columns with {} insertion(s)", columns.len(), insertions.len());
    Ok(Expansion { columns, insertions })
}

/// Drops one gap column per insertion site, searching outward from the site.
pub fn absorb_insertions(columns: &[u8], insertions: &[usize]) -> Result<Vec<u8>> {
    let mut keep = vec![true; columns.len()];
    let free_gap = |keep: &[bool], k: usize| keep[k] && is_gap(columns[k]);

    for &site in insertions {
        if site >= columns.len() {
            return Err(NastError::mismatch(format!(
                "insertion at column {} past the {} re-expanded columns",
                site,
                columns.len()
            )));
        }
        let left = (0..site).rev().find(|&k| free_gap(&keep, k));
        let right = (site + 1..columns.len()).find(|&k| free_gap(&keep, k));
        let chosen = match (left, right) {
            (Some(l), Some(r)) if site - l <= r - site => l,
            (Some(_), Some(r)) => r,
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => return Err(NastError::Unalignable),
        };
        keep[chosen] = false;
    }

    Ok(columns
        .iter()
        .zip(&keep)
        .filter_map(|(&b, &k)| k.then_some(b))
        .collect())
}

/// Places one aligned candidate into the column space of its gapped template row.
/// The result is always exactly `template.len()` columns long.
pub fn nast_core(template: &[u8], template_aln: &[u8], candidate_aln: &[u8]) -> Result<Vec<u8>> {
    let expansion = reexpand(template, template_aln, candidate_aln)?;
    let row = absorb_insertions(&expansion.columns, &expansion.insertions)?;
    debug_assert_eq!(row.len(), template.len());
    Ok(row)
}
