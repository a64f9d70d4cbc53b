use super::core::process_download;
use super::error::DownloadError;
use super::types::{DownloadArgs, DownloadJob, DownloadStatus};
use super::utils::{input_text, select_index, spinner};
use crate::sources::{FormatOption, MediaInfo, Platform, StreamSource};
use crate::term::TermSurface;
use anyhow::{bail, Context, Result};
use az_core::format_size;
use colored::Colorize;
use log::info;

fn resolve_platform(name: Option<&str>) -> Result<Platform> {
    match name {
        Some(name) => {
            Platform::from_name(name).with_context(|| format!("Unknown platform '{}'", name))
        }
        None => {
            let labels: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
            Ok(Platform::ALL[select_index("Select Platform", &labels)?])
        }
    }
}

fn resolve_media(
    platform: Option<&str>,
    url: Option<String>,
) -> Result<(Box<dyn StreamSource + Send>, MediaInfo)> {
    let platform = resolve_platform(platform)?;
    let input = match url {
        Some(u) => u,
        None => input_text(platform.input_prompt())?,
    };
    let source = platform.build_source(&input)?;

    let pb = spinner(format!("Fetching media info ({})...", platform));
    let info = source.describe();
    pb.finish_and_clear();
    Ok((source, info?))
}

/// Prints what a source offers without downloading anything.
pub fn run_info(platform: Option<String>, url: Option<String>) -> Result<()> {
    let (source, info) = resolve_media(platform.as_deref(), url)?;

    println!("{}", format!("\nVideo Title: {}\n", info.title).green());
    println!("Source: {}", source.name());
    for format in info.selectable_formats() {
        let size = if format.content_length > 0 {
            format_size(format.content_length)
        } else {
            "?".to_string()
        };
        println!("  {} {}", format.label(), format!("({})", size).blue());
    }
    Ok(())
}

pub fn run_cli(args: DownloadArgs) -> Result<()> {
    // 1. Select Platform & Resolve Source
    let (source, info) = resolve_media(args.platform.as_deref(), args.url)?;
    println!("{}", format!("\nVideo Title: {}\n", info.title).green());

    // 2. Select Quality
    let formats = info.selectable_formats();
    if formats.is_empty() {
        bail!("No downloadable formats found for '{}'", info.title);
    }
    let format: FormatOption = match args.quality.as_deref() {
        Some(q) => formats
            .iter()
            .find(|f| f.quality.eq_ignore_ascii_case(q.trim()))
            .map(|f| (*f).clone())
            .with_context(|| {
                let known: Vec<&str> = formats.iter().map(|f| f.quality.as_str()).collect();
                format!("Quality '{}' not available (have: {})", q, known.join(", "))
            })?,
        None => {
            let labels: Vec<String> = formats.iter().map(|f| f.label()).collect();
            formats[select_index("Select Quality", &labels)?].clone()
        }
    };

    let job = DownloadJob {
        title: info.title,
        format,
        output_dir: args.output_dir,
        chunk_size: args.chunk_size,
        estimator: args.estimator,
    };

    println!("{}", "Initiating download...\n".yellow());

    // 3. Download
    let path = process_download(&job, source.as_ref(), TermSurface::stdout(), |status| {
        if let DownloadStatus::Saving { path, total } = status {
            info!("writing {} ({} bytes declared)", path.display(), total);
        }
    })?;

    println!(
        "{}",
        format!("\n✔ Download completed: {}", path.display()).green()
    );
    Ok(())
}

/// Prints a failed command the same way everywhere. Cancelling a prompt is
/// not worth a red line.
pub fn report_error(command: &str, err: &anyhow::Error) {
    match err.downcast_ref::<DownloadError>() {
        Some(DownloadError::Cancelled) => eprintln!("{}", "Cancelled.".yellow()),
        _ => eprintln!("{}", format!("❌ {} Error: {}", command, err).red()),
    }
}
