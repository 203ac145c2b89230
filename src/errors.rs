//! Error type shared by the sampler, the loaders and the command line tools.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Opening, creating or persisting a file failed.
    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: io::Error,
    },
    /// Reading an already opened input stream failed.
    #[error("read error: {0}")]
    Read(#[source] io::Error),
    /// Writing an already opened output stream failed.
    #[error("write error: {0}")]
    Write(#[source] io::Error),
    /// A line does not follow the `<label> <second> <idx>:<val> ...` grammar.
    #[error("malformed record at line {line}: {reason} (token {token:?})")]
    MalformedRecord {
        line: usize,
        token: String,
        reason: &'static str,
    },
    /// The declared feature count is too small for the data.
    #[error("feature index {index} at line {line} is out of range for feature size {feature_size}")]
    FeatureIndexOutOfRange {
        line: usize,
        index: usize,
        feature_size: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Usage(String),
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, op: &'static str, source: io::Error) -> ToolError {
        ToolError::Io {
            path: path.into(),
            op,
            source,
        }
    }

    pub fn malformed(line: usize, token: &str, reason: &'static str) -> ToolError {
        ToolError::MalformedRecord {
            line,
            token: token.to_string(),
            reason,
        }
    }

    /// Attach file names to errors raised on anonymous streams.
    pub(crate) fn with_paths(self, input: &Path, output: Option<&Path>) -> ToolError {
        match (self, output) {
            (ToolError::Read(e), _) => ToolError::io(input, "read", e),
            (ToolError::Write(e), Some(output)) => ToolError::io(output, "write", e),
            (err, _) => err,
        }
    }

    /// Whether the error describes bad input data rather than a failing device or bad arguments.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ToolError::MalformedRecord { .. })
    }
}

impl From<&str> for ToolError {
    fn from(err: &str) -> ToolError {
        ToolError::InvalidConfig(err.to_string())
    }
}
