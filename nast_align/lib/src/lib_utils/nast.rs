/*
    Template based multiple sequence alignment
        load and check the template alignment
        get the hits: run the aligner against the ungapped templates, or read a hit table
        for the first hit of every candidate
            rebuild the pairwise alignment, trim it to the template span
            place the candidate in the template columns
                placed      -> MSA, coverage, hits table
                unalignable -> not aligned
                mismatch    -> abort the run
        candidates without hits -> not aligned
        drop the columns no placed candidate covers, unless asked not to
*/

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use bio::alphabets::dna;
use bio::io::fasta;
use log::{debug, info, warn};
use threadpool::ThreadPool;

use super::coverage::ColumnCoverage;
use super::decode::aln_to_seqs;
use super::error::{NastError, Result};
use super::hits::{read_hits_file, Hit, Strand};
use super::reconcile::nast_core;
use super::struct_helper::{output_dir, OutputBufferHelper};
use super::template::TemplateAlignment;
use super::trim::trim_span;
use super::vsearch::{usearch_global, VsearchParams};

#[derive(Debug, Clone, PartialEq)]
pub enum HitSource {
    /// Hit table already produced by the aligner.
    Precomputed(PathBuf),
    Vsearch(VsearchParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NastConfig {
    pub input: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub notaligned: Option<PathBuf>,
    pub hits: Option<PathBuf>,
    pub hit_source: HitSource,
    pub threads: usize,
    pub notrim: bool,
    pub nofilter: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NastSummary {
    pub candidates: usize,
    pub aligned: usize,
    pub unalignable: usize,
    pub no_hit: usize,
    pub ncols: usize,
    pub kept_columns: usize,
}

struct Placement {
    hit: Hit,
    template_idx: usize,
    candidate: Vec<u8>,
}

pub fn run_nast(config: &NastConfig) -> Result<NastSummary> {
    let template = Arc::new(TemplateAlignment::from_fasta(&config.template)?);
    info!(
        "Template {:?}: {} sequences, {} columns",
        config.template,
        template.len(),
        template.ncols()
    );
    let hits = collect_hits(config, &template)?;
    let (candidates, candidate_index) = read_candidates(&config.input)?;
    info!("{} candidates, {} with a hit", candidates.len(), hits.len());

    let mut placements = Vec::with_capacity(hits.len());
    let mut with_hit = HashSet::new();
    for hit in hits {
        let cand_idx = *candidate_index.get(&hit.candidate_id).ok_or_else(|| NastError::MissingRecord {
            kind: "candidate",
            id: hit.candidate_id.clone(),
            path: config.input.clone(),
        })?;
        let template_idx = template.position(&hit.template_id).ok_or_else(|| NastError::MissingRecord {
            kind: "template",
            id: hit.template_id.clone(),
            path: config.template.clone(),
        })?;
        let seq = &candidates[cand_idx].1;
        let candidate = match hit.strand {
            Strand::Plus => seq.clone(),
            Strand::Minus => dna::revcomp(seq),
        };
        with_hit.insert(cand_idx);
        placements.push(Placement { hit, template_idx, candidate });
    }

    let mut summary = NastSummary {
        candidates: candidates.len(),
        ncols: template.ncols(),
        ..NastSummary::default()
    };
    let mut coverage = ColumnCoverage::new(template.ncols());

    let msa_raw = OutputBufferHelper::new(&config.output)?;
    let mut msa_writer = msa_raw.fasta_writer()?;
    let hits_out = config.hits.as_deref().map(OutputBufferHelper::new).transpose()?;
    let mut hit_writer = hits_out.as_ref().map(|h| h.hit_writer()).transpose()?;
    let notaligned_out = config.notaligned.as_deref().map(OutputBufferHelper::new).transpose()?;
    let mut notaligned_writer = notaligned_out.as_ref().map(|n| n.fasta_writer()).transpose()?;

    place_in_order(&template, placements, config.threads, config.notrim, |placement, outcome| {
        let hit = &placement.hit;
        match outcome {
            Ok(row) => {
                coverage.add(&row)?;
                msa_writer.write(&hit.candidate_id, None, &row)?;
                if let Some(writer) = hit_writer.as_mut() {
                    writer.write(hit)?;
                }
                summary.aligned += 1;
            }
            Err(NastError::Unalignable) => {
                debug!("{} cannot be placed on {}", hit.candidate_id, hit.template_id);
                if let Some(writer) = notaligned_writer.as_mut() {
                    writer.write(&hit.candidate_id, None, &placement.candidate)?;
                }
                summary.unalignable += 1;
            }
            Err(NastError::AlignmentMismatch(reason)) => {
                return Err(NastError::CandidateMismatch {
                    candidate: hit.candidate_id.clone(),
                    template: hit.template_id.clone(),
                    reason,
                })
            }
            Err(other) => return Err(other),
        }
        Ok(())
    })?;

    for (idx, (id, seq)) in candidates.iter().enumerate() {
        if with_hit.contains(&idx) {
            continue;
        }
        debug!("{} has no hit", id);
        if let Some(writer) = notaligned_writer.as_mut() {
            writer.write(id, None, seq)?;
        }
        summary.no_hit += 1;
    }

    msa_writer.flush()?;
    drop(msa_writer);
    if config.nofilter {
        summary.kept_columns = coverage.ncols();
        msa_raw.persist()?;
    } else {
        summary.kept_columns = coverage.kept_columns();
        info!(
            "Keeping {} of {} columns covered by the placed candidates",
            summary.kept_columns,
            template.ncols()
        );
        write_filtered(&msa_raw, &coverage, &config.output)?;
    }

    if let (Some(mut writer), Some(out)) = (hit_writer, hits_out) {
        writer.flush()?;
        drop(writer);
        out.persist()?;
    }
    if let (Some(mut writer), Some(out)) = (notaligned_writer, notaligned_out) {
        writer.flush()?;
        drop(writer);
        out.persist()?;
    }
    Ok(summary)
}

fn collect_hits(config: &NastConfig, template: &TemplateAlignment) -> Result<Vec<Hit>> {
    match &config.hit_source {
        HitSource::Precomputed(path) => {
            info!("Reading hits from {:?}", path);
            read_hits_file(path)
        }
        HitSource::Vsearch(params) => {
            let dir = output_dir(&config.output);
            let mut db = tempfile::Builder::new()
                .prefix(".nast_db_")
                .suffix(".fasta")
                .tempfile_in(dir)?;
            template.write_ungapped(db.as_file_mut())?;
            db.as_file_mut().flush()?;
            let userout = tempfile::Builder::new()
                .prefix(".nast_hits_")
                .suffix(".tsv")
                .tempfile_in(dir)?;
            usearch_global(params, &config.input, db.path(), userout.path())?;
            read_hits_file(userout.path())
        }
    }
}

type Candidates = (Vec<(String, Vec<u8>)>, HashMap<String, usize>);

fn read_candidates(path: &Path) -> Result<Candidates> {
    let mut candidates = Vec::new();
    let mut index = HashMap::new();
    for record in fasta::Reader::new(File::open(path)?).records() {
        let record = record?;
        if index.contains_key(record.id()) {
            warn!("Duplicate candidate {} ignored, first record kept", record.id());
            continue;
        }
        index.insert(record.id().to_string(), candidates.len());
        candidates.push((record.id().to_string(), record.seq().to_ascii_uppercase()));
    }
    Ok((candidates, index))
}

fn place_candidate(template: &TemplateAlignment, placement: &Placement, notrim: bool) -> Result<Vec<u8>> {
    let row = &template.rows()[placement.template_idx];
    let (template_aln, candidate_aln) =
        aln_to_seqs(placement.hit.aln.as_bytes(), &row.ungapped, &placement.candidate)?;
    if notrim {
        nast_core(&row.gapped, &template_aln, &candidate_aln)
    } else {
        let (template_span, candidate_span) = trim_span(&template_aln, &candidate_aln)?;
        nast_core(&row.gapped, template_span, candidate_span)
    }
}

/// Places every candidate on the pool and hands the outcomes to `sink` in input order.
fn place_in_order<F>(
    template: &Arc<TemplateAlignment>,
    placements: Vec<Placement>,
    nproc: usize,
    notrim: bool,
    mut sink: F,
) -> Result<()>
where
    F: FnMut(Placement, Result<Vec<u8>>) -> Result<()>,
{
    let total = placements.len();
    let pool = ThreadPool::new(nproc.max(1));
    let abort = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    for (idx, placement) in placements.into_iter().enumerate() {
        let tx = tx.clone();
        let template = Arc::clone(template);
        let abort = Arc::clone(&abort);
        pool.execute(move || {
            if abort.load(Ordering::Relaxed) {
                return;
            }
            let outcome = place_candidate(&template, &placement, notrim);
            let _ = tx.send((idx, placement, outcome));
        });
    }
    drop(tx);

    let mut pending = BTreeMap::new();
    let mut next = 0usize;
    for (idx, placement, outcome) in rx.iter() {
        pending.insert(idx, (placement, outcome));
        while let Some((placement, outcome)) = pending.remove(&next) {
            if let Err(err) = sink(placement, outcome) {
                abort.store(true, Ordering::Relaxed);
                pool.join();
                debug!("Stopped after candidate {} of {}", next + 1, total);
                return Err(err);
            }
            next += 1;
        }
    }
    pool.join();
    info!("Threadpool jobs complete");
    if next != total {
        return Err(NastError::WorkerPanic(pool.panic_count().max(1)));
    }
    Ok(())
}

fn write_filtered(msa_raw: &OutputBufferHelper, coverage: &ColumnCoverage, output: &Path) -> Result<()> {
    let filtered = OutputBufferHelper::new(output)?;
    let mut writer = filtered.fasta_writer()?;
    for record in fasta::Reader::new(File::open(msa_raw.staged_path())?).records() {
        let record = record?;
        writer.write(record.id(), None, &coverage.project(record.seq()))?;
    }
    writer.flush()?;
    drop(writer);
    filtered.persist()
}
