//! JSON manifests listing several renditions of one title.
//!
//! ```json
//! {
//!   "title": "Big Buck Bunny",
//!   "formats": [
//!     {
//!       "quality": "1080p",
//!       "mime_type": "video/mp4",
//!       "content_length": 276134947,
//!       "url": "https://cdn.example.com/bbb_1080.mp4"
//!     },
//!     { "quality": "480p", "mime_type": "video/webm; codecs=\"vp9\"", "url": "bbb_480.webm" }
//!   ]
//! }
//! ```
//!
//! Relative format URLs are resolved against the manifest's own location.

use super::{http_client, is_http_url, open_url, FormatOption, MediaInfo, MediaStream, StreamSource};
use crate::downloader::DownloadError;
use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct Manifest {
    title: String,
    #[serde(default)]
    formats: Vec<FormatOption>,
}

#[derive(Debug, Clone)]
enum Location {
    Remote(Url),
    Local(PathBuf),
}

pub struct ManifestSource {
    location: Location,
    client: Client,
}

impl ManifestSource {
    pub fn new(location: &str) -> Result<Self, DownloadError> {
        let location = location.trim();
        let location = if is_http_url(location) {
            Url::parse(location)
                .map(Location::Remote)
                .map_err(|e| {
                    DownloadError::resolve(format!("Invalid manifest URL '{}'", location), e)
                })?
        } else {
            Location::Local(PathBuf::from(location))
        };

        Ok(Self {
            location,
            client: http_client()?,
        })
    }

    fn read_manifest(&self) -> Result<String, DownloadError> {
        match &self.location {
            Location::Remote(url) => self
                .client
                .get(url.clone())
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .map_err(|e| DownloadError::resolve("Failed to fetch manifest", e)),
            Location::Local(path) => fs::read_to_string(path).map_err(|e| {
                DownloadError::resolve(format!("Failed to read manifest '{}'", path.display()), e)
            }),
        }
    }

    /// Where a format's bytes live, with relative entries anchored at the manifest.
    fn resolve_entry(&self, entry: &str) -> Result<Target, DownloadError> {
        if is_http_url(entry) {
            return Ok(Target::Remote(entry.trim().to_string()));
        }
        match &self.location {
            Location::Remote(base) => base
                .join(entry)
                .map(|u| Target::Remote(u.to_string()))
                .map_err(|e| DownloadError::resolve(format!("Invalid format URL '{}'", entry), e)),
            Location::Local(manifest) => {
                let entry = Path::new(entry);
                let path = match manifest.parent() {
                    Some(dir) if entry.is_relative() => dir.join(entry),
                    _ => entry.to_path_buf(),
                };
                Ok(Target::Local(path))
            }
        }
    }
}

enum Target {
    Remote(String),
    Local(PathBuf),
}

impl StreamSource for ManifestSource {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn describe(&self) -> Result<MediaInfo, DownloadError> {
        let text = self.read_manifest()?;
        let manifest: Manifest = serde_json::from_str(&text)
            .map_err(|e| DownloadError::resolve("Failed to parse manifest", e))?;
        debug!(
            "manifest '{}' lists {} formats",
            manifest.title,
            manifest.formats.len()
        );

        Ok(MediaInfo {
            title: manifest.title,
            formats: manifest.formats,
        })
    }

    fn open(&self, format: &FormatOption) -> Result<MediaStream, DownloadError> {
        match self.resolve_entry(&format.url)? {
            Target::Remote(url) => open_url(&self.client, &url, format.content_length),
            Target::Local(path) => {
                let file = File::open(&path).map_err(|e| {
                    DownloadError::resolve(format!("Failed to open '{}'", path.display()), e)
                })?;
                let total = file
                    .metadata()
                    .map(|m| m.len())
                    .unwrap_or(format.content_length);
                Ok(MediaStream {
                    reader: Box::new(file),
                    total,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const MANIFEST: &str = r#"{
        "title": "Big Buck Bunny",
        "formats": [
            { "quality": "1080p", "mime_type": "video/mp4", "content_length": 11, "url": "media/bbb.mp4" },
            { "mime_type": "audio/mp4", "url": "https://cdn.example.com/bbb.m4a" }
        ]
    }"#;

    #[test]
    fn reads_local_manifest_and_opens_relative_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("media")).unwrap();
        fs::write(dir.path().join("media/bbb.mp4"), b"hello bunny").unwrap();
        let manifest_path = dir.path().join("bbb.json");
        fs::write(&manifest_path, MANIFEST).unwrap();

        let source = ManifestSource::new(manifest_path.to_str().unwrap()).unwrap();
        let info = source.describe().unwrap();
        assert_eq!(info.title, "Big Buck Bunny");
        assert_eq!(info.formats.len(), 2);
        assert_eq!(info.formats[1].quality, "");
        assert_eq!(info.selectable_formats().len(), 1);

        let mut stream = source.open(&info.formats[0]).unwrap();
        assert_eq!(stream.total, 11);
        let mut body = String::new();
        stream.reader.read_to_string(&mut body).unwrap();
        assert_eq!(body, "hello bunny");
    }

    #[test]
    fn remote_manifest_resolves_relative_entries() {
        let source =
            ManifestSource::new("https://cdn.example.com/shows/bbb/manifest.json").unwrap();
        match source.resolve_entry("480/bbb.webm").unwrap() {
            Target::Remote(url) => {
                assert_eq!(url, "https://cdn.example.com/shows/bbb/480/bbb.webm")
            }
            Target::Local(p) => panic!("expected remote target, got {}", p.display()),
        }
    }

    #[test]
    fn broken_manifest_is_a_resolve_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ManifestSource::new(path.to_str().unwrap())
            .unwrap()
            .describe()
            .unwrap_err();
        assert!(matches!(err, DownloadError::Resolve { .. }));
        assert!(err.to_string().starts_with("Failed to parse manifest"));
    }

    #[test]
    fn missing_local_entry_is_a_resolve_error() {
        let source = ManifestSource::new("/nonexistent/dir/m.json").unwrap();
        let format = FormatOption {
            quality: "720p".into(),
            mime_type: "video/mp4".into(),
            content_length: 0,
            url: "missing.mp4".into(),
        };
        assert!(matches!(source.open(&format), Err(DownloadError::Resolve { .. })));
    }
}
