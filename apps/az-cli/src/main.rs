use az_core::RateEstimator;
use az_factory::config::{
    CHUNK_SIZE, DEFAULT_CHUNK_SIZE_KIB, DEFAULT_OUTPUT_DIR, MAX_CHUNK_SIZE, OUTPUT_DIR_ENV,
};
use az_factory::downloader;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use env_logger::Env;
use std::path::PathBuf;

const BANNER: &str = r"
    _    _____  _   _ _  _____
   / \  |__  / | | | | |/ /_ _|
  / _ \   / /  | | | | ' / | |
 / ___ \ / /_  | |_| | . \ | |
/_/   \_/____|  \___/|_|\_\___|
";

#[derive(Parser)]
#[command(name = "azuki")]
#[command(version)]
#[command(about = "Pick a source, pick a quality, download with live progress")]
struct Cli {
    /// Log what the downloader is doing (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    // 1. Download
    /// Download one stream (the default when no command is given)
    Download {
        /// "Direct URL" / "url" or "Media Manifest" / "manifest"
        #[arg(short, long)]
        platform: Option<String>,

        /// Media URL, or manifest path/URL
        #[arg(short, long)]
        url: Option<String>,

        /// Quality to pick without prompting, e.g. 720p
        #[arg(short, long)]
        quality: Option<String>,

        #[arg(short, long, env = OUTPUT_DIR_ENV, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Read buffer size in KiB (1 to 65536); stored in bytes
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE_KIB, value_parser = parse_chunk_kib)]
        chunk_size: usize,

        #[arg(long, value_enum, default_value_t = RateMode::LastChunk)]
        rate_mode: RateMode,
    },

    // 2. Info
    /// Show the title and available formats without downloading
    Info {
        #[arg(short, long)]
        platform: Option<String>,

        #[arg(short, long)]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RateMode {
    /// Last chunk over the sampling window
    LastChunk,
    /// All bytes in the sampling window
    Window,
    /// Smoothed average of window samples
    Ewma,
}

impl From<RateMode> for RateEstimator {
    fn from(mode: RateMode) -> Self {
        match mode {
            RateMode::LastChunk => RateEstimator::LastChunk,
            RateMode::Window => RateEstimator::Window,
            RateMode::Ewma => RateEstimator::Ewma {
                alpha: RateEstimator::DEFAULT_EWMA_ALPHA,
            },
        }
    }
}

/// Parses a size in KiB and returns it in bytes.
fn parse_chunk_kib(s: &str) -> Result<usize, String> {
    let kib = s.trim().parse::<usize>().map_err(|e| e.to_string())?;
    match kib.checked_mul(1024) {
        Some(0) => Err("chunk size must be at least 1 KiB".to_string()),
        Some(bytes) if bytes <= MAX_CHUNK_SIZE => Ok(bytes),
        _ => Err(format!(
            "chunk size must be at most {} KiB",
            MAX_CHUNK_SIZE / 1024
        )),
    }
}

fn default_download() -> Commands {
    Commands::Download {
        platform: None,
        url: None,
        quality: None,
        output: std::env::var_os(OUTPUT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        chunk_size: CHUNK_SIZE,
        rate_mode: RateMode::LastChunk,
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    println!("{}", BANNER.cyan());

    match cli.command.unwrap_or_else(default_download) {
        // [1] DOWNLOAD
        Commands::Download {
            platform,
            url,
            quality,
            output,
            chunk_size,
            rate_mode,
        } => {
            let args = downloader::DownloadArgs {
                platform,
                url,
                quality,
                output_dir: output,
                chunk_size,
                estimator: rate_mode.into(),
            };
            if let Err(e) = downloader::run_cli(args) {
                downloader::report_error("Download", &e);
            }
        }

        // [2] INFO
        Commands::Info { platform, url } => {
            if let Err(e) = downloader::run_info(platform, url) {
                downloader::report_error("Info", &e);
            }
        }
    }
}
