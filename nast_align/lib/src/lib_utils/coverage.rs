/*
    Column coverage of the placed candidates
        count non-gap characters per column
        columns never covered can be projected away once every row is in
*/

use super::error::{NastError, Result};
use super::is_gap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCoverage {
    counts: Vec<u32>,
}

impl ColumnCoverage {
    pub fn new(ncols: usize) -> ColumnCoverage {
        ColumnCoverage { counts: vec![0; ncols] }
    }

    pub fn ncols(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn add(&mut self, row: &[u8]) -> Result<()> {
        if row.len() != self.counts.len() {
            return Err(NastError::mismatch(format!(
                "row of {} columns added to a {} column coverage",
                row.len(),
                self.counts.len()
            )));
        }
        self.counts
            .iter_mut()
            .zip(row)
            .filter(|(_, &b)| !is_gap(b))
            .for_each(|(count, _)| *count += 1);
        Ok(())
    }

    pub fn kept_columns(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }

    /// Keeps the covered columns of `row`, in their original order.
    pub fn project(&self, row: &[u8]) -> Vec<u8> {
        row.iter()
            .zip(&self.counts)
            .filter(|(_, &n)| n > 0)
            .map(|(&b, _)| b)
            .collect()
    }
}
