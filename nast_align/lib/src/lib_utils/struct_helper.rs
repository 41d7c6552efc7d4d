
// struct to handle output files staged next to their destination

use std::fs::File;
use std::path::{Path, PathBuf};

use bio::io::fasta;
use log::debug;
use tempfile::NamedTempFile;

use super::error::Result;
use super::hits::HitWriter;

/// Output written to a temporary file in the destination directory and moved
/// into place by `persist`. Dropped without `persist`, nothing is left behind.
pub struct OutputBufferHelper {
    pub path: PathBuf,
    staged: NamedTempFile,
}

impl OutputBufferHelper {
    pub fn new(path: &Path) -> Result<OutputBufferHelper> {
        let dir = output_dir(path);
        let staged = tempfile::Builder::new()
            .prefix(".nast_")
            .tempfile_in(dir)?;
        debug!("OutputHelper created for: {:?} at {:?}", path, staged.path());
        Ok(Self {
            path: path.to_path_buf(),
            staged,
        })
    }

    pub fn staged_path(&self) -> &Path {
        self.staged.path()
    }

    pub fn fasta_writer(&self) -> Result<fasta::Writer<File>> {
        Ok(fasta::Writer::new(self.staged.reopen()?))
    }

    pub fn hit_writer(&self) -> Result<HitWriter<File>> {
        Ok(HitWriter::new(self.staged.reopen()?))
    }

    pub fn persist(self) -> Result<()> {
        self.staged.persist(&self.path).map_err(|e| e.error)?;
        debug!("Output moved to {:?}", self.path);
        Ok(())
    }
}

/// Directory holding `path`, `.` for a bare file name.
pub fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
