use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The user backed out of a prompt.
    #[error("selection cancelled")]
    Cancelled,

    /// The source could not describe or open the stream.
    #[error("{context}: {source}")]
    Resolve {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("{context} '{}': {source}", .path.display())]
    Filesystem {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading stream after {transferred} bytes: {source}")]
    Read {
        transferred: u64,
        #[source]
        source: io::Error,
    },

    #[error("error writing to file after {transferred} bytes: {source}")]
    Write {
        transferred: u64,
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    pub fn resolve(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DownloadError::Resolve {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn filesystem(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        DownloadError::Filesystem {
            context,
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DownloadError::Cancelled)
    }
}
