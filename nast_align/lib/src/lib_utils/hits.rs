/*
    Hit table of the external aligner
        query  target  id  aln  qstrand     (tab separated, no header)
    The aligner reports hits best-first, so only the first row of a query counts.
*/

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use super::error::{NastError, Result};

const HIT_FIELDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    fn parse(field: &str) -> Option<Strand> {
        match field {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub candidate_id: String,
    pub template_id: String,
    /// Percent identity exactly as the aligner printed it.
    pub identity: String,
    pub aln: String,
    pub strand: Strand,
}

pub fn read_hits_file(path: &Path) -> Result<Vec<Hit>> {
    read_hits(File::open(path)?, path)
}

/// Parses a hit table, keeping only the first hit of every candidate.
pub fn read_hits<R: Read>(reader: R, source: &Path) -> Result<Vec<Hit>> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    for (line, record) in tsv.records().enumerate() {
        let record = record?;
        if record.len() != HIT_FIELDS {
            return Err(NastError::format(
                source,
                format!("line {}: expected {} fields, found {}", line + 1, HIT_FIELDS, record.len()),
            ));
        }
        let strand = Strand::parse(&record[4]).ok_or_else(|| {
            NastError::format(source, format!("line {}: unknown strand {:?}", line + 1, &record[4]))
        })?;
        if !seen.insert(record[0].to_string()) {
            debug!("Skipping secondary hit of {} on {}", &record[0], &record[1]);
            continue;
        }
        hits.push(Hit {
            candidate_id: record[0].to_string(),
            template_id: record[1].to_string(),
            identity: record[2].to_string(),
            aln: record[3].to_string(),
            strand,
        });
    }
    Ok(hits)
}

/// Writer for the `candidate  template  identity` table of placed candidates.
pub struct HitWriter<W: Write> {
    tsv: csv::Writer<W>,
}

impl<W: Write> HitWriter<W> {
    pub fn new(writer: W) -> HitWriter<W> {
        let tsv = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);
        HitWriter { tsv }
    }

    pub fn write(&mut self, hit: &Hit) -> Result<()> {
        self.tsv
            .write_record([&hit.candidate_id, &hit.template_id, &hit.identity])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.tsv.flush()?;
        Ok(())
    }
}
