//! Typed failures of a migration chain

use std::fmt;
use std::path::PathBuf;

/// Errors that stop a whole target chain
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The target root does not exist or is not a directory.
    #[error("target is not a directory: {}", root.display())]
    InvalidRoot { root: PathBuf },

    /// Walking the directory tree failed (e.g. permission denied).
    #[error("failed to walk {}: {source}", root.display())]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A worker thread panicked.
    #[error("{stage} worker panicked")]
    WorkerPanic { stage: Stage },
}

/// Pipeline stage, used for error and log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Apply,
    Sink,
    Chain,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovery",
            Stage::Apply => "rule",
            Stage::Sink => "sink",
            Stage::Chain => "chain",
        };
        f.write_str(name)
    }
}

/// Which side of the pipeline a per-file failure happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    Read,
    Write,
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::Read => f.write_str("read"),
            FileErrorKind::Write => f.write_str("write"),
        }
    }
}

/// A failure recorded against a single file. Sibling files keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub path: PathBuf,
    pub kind: FileErrorKind,
    pub message: String,
}

impl FileError {
    pub fn read(path: PathBuf, error: &std::io::Error) -> Self {
        Self {
            path,
            kind: FileErrorKind::Read,
            message: error.to_string(),
        }
    }

    pub fn write(path: PathBuf, error: &std::io::Error) -> Self {
        Self {
            path,
            kind: FileErrorKind::Write,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed for {}: {}", self.kind, self.path.display(), self.message)
    }
}
