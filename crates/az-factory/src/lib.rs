pub mod config;
pub mod downloader;
pub mod sources;
pub mod term;
