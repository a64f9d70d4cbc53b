use std::time::Duration;

/// Directory downloads land in unless overridden.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";
pub const OUTPUT_DIR_ENV: &str = "AZUKI_OUTPUT_DIR";

pub const CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB read buffer
pub const DEFAULT_CHUNK_SIZE_KIB: usize = CHUNK_SIZE / 1024;
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const USER_AGENT: &str = concat!("azuki/", env!("CARGO_PKG_VERSION"));

pub const UNTITLED: &str = "untitled";
pub const FALLBACK_EXTENSION: &str = "bin";
pub const FALLBACK_MIME: &str = "application/octet-stream";
