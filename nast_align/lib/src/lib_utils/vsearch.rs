
// global search of the candidates against the ungapped template database

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use super::error::{NastError, Result};

const MAXACCEPTS: u32 = 8;
const MAXREJECTS: u32 = 32;
const USERFIELDS: &str = "query+target+id+aln+qstrand";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrand {
    Both,
    Plus,
}

impl SearchStrand {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStrand::Both => "both",
            SearchStrand::Plus => "plus",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VsearchParams {
    pub program: PathBuf,
    /// Minimum identity, 0.0 - 1.0.
    pub ident: f64,
    /// Minimum fraction of the candidate covered by the alignment.
    pub mincov: f64,
    pub threads: usize,
    pub strand: SearchStrand,
}

impl Default for VsearchParams {
    fn default() -> Self {
        VsearchParams {
            program: PathBuf::from("vsearch"),
            ident: 0.75,
            mincov: 0.75,
            threads: 1,
            strand: SearchStrand::Both,
        }
    }
}

impl VsearchParams {
    pub fn command(&self, input: &Path, db: &Path, userout: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--usearch_global")
            .arg(input)
            .arg("--db")
            .arg(db)
            .arg("--userout")
            .arg(userout)
            .args(["--userfields", USERFIELDS])
            .args(["--id", self.ident.to_string().as_str()])
            .args(["--threads", self.threads.to_string().as_str()])
            .args(["--query_cov", self.mincov.to_string().as_str()])
            .args(["--maxaccepts", MAXACCEPTS.to_string().as_str()])
            .args(["--maxrejects", MAXREJECTS.to_string().as_str()])
            .arg("--top_hits_only")
            .args(["--strand", self.strand.as_str()])
            .args(["--dbmask", "none", "--qmask", "none"]);
        cmd
    }
}

/// Runs the search and leaves the hit table in `userout`.
pub fn usearch_global(params: &VsearchParams, input: &Path, db: &Path, userout: &Path) -> Result<()> {
    let mut cmd = params.command(input, db, userout);
    info!("Searching {:?} against the template database", input);
    debug!("{:?}", cmd);
    let program = params.program.display().to_string();
    let output = cmd.output().map_err(|e| NastError::Aligner {
        program: program.clone(),
        status: "not started".to_string(),
        stderr: e.to_string(),
    })?;
    if !output.status.success() {
        return Err(NastError::Aligner {
            program,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
