use super::error::DownloadError;
use crate::config::{FALLBACK_EXTENSION, UNTITLED};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turns a human readable title into a single path segment.
pub fn sanitize_filename(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect();
    let name = stripped.trim().replace(' ', "_");
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

/// `video/mp4; codecs="avc1"` -> `mp4`
///
/// Only the subtype segment is kept, reduced to `[A-Za-z0-9+._-]`; the result
/// is always a single path segment.
pub fn extension_from_mime(mime: &str) -> String {
    let subtype = match mime.split_once('/') {
        Some((_, rest)) => rest,
        None => return FALLBACK_EXTENSION.to_string(),
    };
    let raw = subtype.split(['/', ';']).next().unwrap_or_default();
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_' | '.'))
        .collect();
    let ext = cleaned.trim_matches('.');
    if ext.is_empty() {
        FALLBACK_EXTENSION.to_string()
    } else {
        ext.to_string()
    }
}

pub fn destination_path(output_dir: &Path, title: &str, mime: &str) -> PathBuf {
    output_dir.join(format!(
        "{}.{}",
        sanitize_filename(title),
        extension_from_mime(mime)
    ))
}

pub fn select_index<T: ToString>(prompt: &str, items: &[T]) -> Result<usize, DownloadError> {
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt();

    match selection {
        Ok(Some(idx)) => Ok(idx),
        Ok(None) => Err(DownloadError::Cancelled),
        Err(e) => {
            debug!("prompt '{}' aborted: {}", prompt, e);
            Err(DownloadError::Cancelled)
        }
    }
}

pub fn input_text(prompt: &str) -> Result<String, DownloadError> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            debug!("prompt '{}' aborted: {}", prompt, e);
            DownloadError::Cancelled
        })
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
