use crate::sources::FormatOption;
use az_core::RateEstimator;
use std::path::PathBuf;

/// A fully decided download: what to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub title: String,
    pub format: FormatOption,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub estimator: RateEstimator,
}

/// Status updates sent from the core logic to the CLI or any other front end.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadStatus {
    Starting,
    /// The source is being asked for the stream.
    Resolving,
    Saving {
        path: PathBuf,
        total: u64,
    },
    Downloading {
        current: u64,
        total: u64,
        rate: f64, // bytes per second
    },
    Finished(PathBuf),
    Error(String),
}

/// Values taken from the command line. Anything left `None` is asked for.
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub quality: Option<String>,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub estimator: RateEstimator,
}
