use super::{http_client, open_url, FormatOption, MediaInfo, MediaStream, StreamSource};
use crate::config::FALLBACK_MIME;
use crate::downloader::DownloadError;
use log::debug;
use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Url;
use std::path::Path;

/// A single media file behind a plain URL.
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, DownloadError> {
        let url = Url::parse(url.trim())
            .map_err(|e| DownloadError::resolve(format!("Invalid URL '{}'", url.trim()), e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DownloadError::resolve(
                "Unsupported URL",
                format!("scheme '{}' is not http(s)", url.scheme()),
            ));
        }
        Ok(Self {
            client: http_client()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl StreamSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn describe(&self) -> Result<MediaInfo, DownloadError> {
        let response = self
            .client
            .head(self.url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| DownloadError::resolve("Failed to get media info", e))?;

        let headers = response.headers();
        let format = FormatOption {
            quality: "original".to_string(),
            mime_type: mime_from_headers(headers),
            content_length: length_from_headers(headers),
            url: self.url.to_string(),
        };
        debug!("HEAD {} -> {:?}", self.url, format);

        Ok(MediaInfo {
            title: title_from_url(&self.url),
            formats: vec![format],
        })
    }

    fn open(&self, format: &FormatOption) -> Result<MediaStream, DownloadError> {
        open_url(&self.client, &format.url, format.content_length)
    }
}

fn mime_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

// Read straight from the header: a HEAD response has no body to size.
fn length_from_headers(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Last path segment, percent-decoded and without its extension, or the host when the path
/// is bare.
pub fn title_from_url(url: &Url) -> String {
    let from_path = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .and_then(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            Path::new(decoded.as_ref())
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|s| !s.is_empty());

    from_path
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "download".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn title_is_file_stem() {
        let url = Url::parse("https://cdn.example.com/videos/cat%20clip.mp4?sig=1").unwrap();
        assert_eq!(title_from_url(&url), "cat clip");

        let url = Url::parse("https://cdn.example.com/%E7%8C%AB%E3%81%AE.webm").unwrap();
        assert_eq!(title_from_url(&url), "猫の");

        let url = Url::parse("https://cdn.example.com/videos/trailer/").unwrap();
        assert_eq!(title_from_url(&url), "trailer");

        let url = Url::parse("https://cdn.example.com/").unwrap();
        assert_eq!(title_from_url(&url), "cdn.example.com");
    }

    #[test]
    fn headers_fill_in_format() {
        let mut headers = HeaderMap::new();
        assert_eq!(mime_from_headers(&headers), "application/octet-stream");
        assert_eq!(length_from_headers(&headers), 0);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("video/webm; codecs=vp9"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("52428800"));
        assert_eq!(mime_from_headers(&headers), "video/webm; codecs=vp9");
        assert_eq!(length_from_headers(&headers), 52_428_800);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(HttpSource::new("ftp://example.com/a.mp4").is_err());
        assert!(HttpSource::new("not a url").is_err());
        assert!(HttpSource::new(" https://example.com/a.mp4 ").is_ok());
    }
}
