//! Error types for a download-and-mux run.

use std::path::PathBuf;

use crate::download::segment::StreamKind;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operator gave an empty or whitespace-only base URL.
    #[error("base URL for {kind} must not be empty")]
    BlankInput { kind: StreamKind },

    #[error("invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Non-404 HTTP status, transport failure or unreadable body.
    #[error("error downloading {url}: {cause}")]
    Fetch { url: String, cause: String },

    /// A segment file is already present where a fresh one should be written.
    #[error("segment file already exists: {}", path.display())]
    SegmentExists { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("console error: {0}")]
    Console(#[from] std::io::Error),

    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Audio conversion or final multiplexing failed.
    #[error("{step} failed: {message}")]
    Assembly { step: &'static str, message: String },
}

impl Error {
    pub fn fetch(url: impl ToString, cause: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn assembly(step: &'static str, message: impl Into<String>) -> Self {
        Self::Assembly {
            step,
            message: message.into(),
        }
    }
}
