
// error taxonomy shared by the library and both binaries

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NastError {
    /// Template alignment or hit table is malformed. Fatal before any candidate is placed.
    #[error("invalid input {path:?}: {reason}")]
    Format { path: PathBuf, reason: String },

    /// The alignment string does not describe the template and candidate it claims to align.
    #[error("alignment mismatch: {0}")]
    AlignmentMismatch(String),

    /// No gap column is left to absorb an insertion made by the aligner.
    #[error("too few spaces to remove in the aligned candidate sequence")]
    Unalignable,

    #[error("candidate {candidate} on template {template}: {reason}")]
    CandidateMismatch {
        candidate: String,
        template: String,
        reason: String,
    },

    #[error("{kind} {id:?} not found in {path:?}")]
    MissingRecord {
        kind: &'static str,
        id: String,
        path: PathBuf,
    },

    #[error("aligner {program} failed ({status}): {stderr}")]
    Aligner {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{0} reconciliation worker(s) panicked")]
    WorkerPanic(usize),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NastError>;

impl NastError {
    pub(crate) fn mismatch(reason: impl Into<String>) -> Self {
        NastError::AlignmentMismatch(reason.into())
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        NastError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
