/*
    Load the template alignment
        every record upper-cased, '.' rewritten as '-'
        every row must share the length of the first one
        keep the ungapped view of each row for the aligner database
*/

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bio::io::fasta;
use log::{debug, info, warn};

use super::error::{NastError, Result};
use super::{is_gap, GAP};

const IUPAC_DNA_ALIGNMENT: &[u8] = b"ATGCUWSMKRYBDHVN-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRow {
    pub id: String,
    pub gapped: Vec<u8>,
    pub ungapped: Vec<u8>,
}

#[derive(Debug)]
pub struct TemplateAlignment {
    rows: Vec<TemplateRow>,
    index: HashMap<String, usize>,
    ncols: usize,
}

impl TemplateAlignment {
    pub fn from_fasta(path: &Path) -> Result<TemplateAlignment> {
        let file = File::open(path)?;
        info!("Template opened successfully - {:?}", path);
        TemplateAlignment::from_reader(file, path)
    }

    /// `source` only labels errors.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<TemplateAlignment> {
        let mut rows: Vec<TemplateRow> = Vec::new();
        let mut index = HashMap::new();
        let mut ncols = 0usize;

        for record in fasta::Reader::new(reader).records() {
            let record = record.map_err(|e| NastError::format(source, e.to_string()))?;
            let gapped: Vec<u8> = record
                .seq()
                .iter()
                .map(|b| match b.to_ascii_uppercase() {
                    b'.' => GAP,
                    other => other,
                })
                .collect();

            if rows.is_empty() {
                if gapped.is_empty() {
                    return Err(NastError::format(
                        source,
                        format!("first template {} is empty", record.id()),
                    ));
                }
                ncols = gapped.len();
                info!("Alignment length set as {}", ncols);
            } else if gapped.len() != ncols {
                return Err(NastError::format(
                    source,
                    format!(
                        "{} has {} columns, sequences in a template alignment must all be {} long",
                        record.id(),
                        gapped.len(),
                        ncols
                    ),
                ));
            }
            if let Some(pos) = gapped.iter().position(|b| !IUPAC_DNA_ALIGNMENT.contains(b)) {
                warn!(
                    "Position: {} in {} contains non-IUPAC character: {}",
                    pos + 1,
                    record.id(),
                    gapped[pos] as char
                );
            }

            if index.contains_key(record.id()) {
                warn!("Duplicate template {} ignored, first record kept", record.id());
                continue;
            }
            let ungapped = gapped.iter().copied().filter(|&b| !is_gap(b)).collect();
            debug!("{} matches alignment length of {}", record.id(), ncols);
            index.insert(record.id().to_string(), rows.len());
            rows.push(TemplateRow {
                id: record.id().to_string(),
                gapped,
                ungapped,
            });
        }

        if rows.is_empty() {
            return Err(NastError::format(source, "not a valid FASTA template file"));
        }
        Ok(TemplateAlignment { rows, index, ncols })
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TemplateRow] {
        &self.rows
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Writes the gap-free rows, the reference database handed to the aligner.
    pub fn write_ungapped<W: Write>(&self, writer: W) -> Result<()> {
        let mut fasta_writer = fasta::Writer::new(writer);
        for row in &self.rows {
            fasta_writer.write(&row.id, None, &row.ungapped)?;
        }
        fasta_writer.flush()?;
        Ok(())
    }
}
