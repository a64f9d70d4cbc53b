//! Where bytes come from. A platform turns user input into a [`StreamSource`],
//! which lists the formats it can deliver and opens one of them as a stream.

pub mod http;
pub mod manifest;

pub use http::HttpSource;
pub use manifest::ManifestSource;

use crate::config::{CONNECT_TIMEOUT, USER_AGENT};
use crate::downloader::DownloadError;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fmt;
use std::io::Read;

/// One downloadable rendition of a piece of media.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormatOption {
    #[serde(default)]
    pub quality: String,
    pub mime_type: String,
    /// Declared size in bytes, `0` when unknown.
    #[serde(default)]
    pub content_length: u64,
    /// Where the bytes live. Interpreted by the source that produced it.
    pub url: String,
}

impl FormatOption {
    pub fn label(&self) -> String {
        format!("Quality: {} | Format: {}", self.quality, self.mime_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub title: String,
    pub formats: Vec<FormatOption>,
}

impl MediaInfo {
    /// Formats worth offering to the user: those that name a quality.
    pub fn selectable_formats(&self) -> Vec<&FormatOption> {
        self.formats
            .iter()
            .filter(|f| !f.quality.trim().is_empty())
            .collect()
    }
}

/// An open byte stream and the length its source declared for it.
pub struct MediaStream {
    pub reader: Box<dyn Read + Send>,
    pub total: u64,
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

pub trait StreamSource {
    fn name(&self) -> &'static str;

    fn describe(&self) -> Result<MediaInfo, DownloadError>;

    fn open(&self, format: &FormatOption) -> Result<MediaStream, DownloadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    DirectUrl,
    Manifest,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::DirectUrl, Platform::Manifest];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::DirectUrl => "Direct URL",
            Platform::Manifest => "Media Manifest",
        }
    }

    pub fn input_prompt(&self) -> &'static str {
        match self {
            Platform::DirectUrl => "Enter media URL",
            Platform::Manifest => "Enter manifest path or URL",
        }
    }

    /// Accepts either the menu label or a short alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|p| {
            p.label().eq_ignore_ascii_case(name)
                || p.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Platform::DirectUrl => &["url", "http", "direct"],
            Platform::Manifest => &["manifest", "json"],
        }
    }

    pub fn build_source(&self, input: &str) -> Result<Box<dyn StreamSource + Send>, DownloadError> {
        Ok(match self {
            Platform::DirectUrl => Box::new(HttpSource::new(input)?),
            Platform::Manifest => Box::new(ManifestSource::new(input)?),
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn is_http_url(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub(crate) fn http_client() -> Result<Client, DownloadError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(None)
        .build()
        .map_err(|e| DownloadError::resolve("Failed to build HTTP client", e))
}

/// `GET`s `url` and hands back the body as a stream. `fallback_len` is used
/// when the response carries no length.
pub(crate) fn open_url(
    client: &Client,
    url: &str,
    fallback_len: u64,
) -> Result<MediaStream, DownloadError> {
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| DownloadError::resolve("Failed to get stream", e))?;

    let total = response.content_length().unwrap_or(fallback_len);
    debug!("GET {} -> {} ({} bytes)", url, response.status(), total);
    Ok(MediaStream {
        reader: Box::new(response),
        total,
    })
}
