//! Downloading backup dumps.

pub mod download;
pub mod progress;
pub mod progress_stream;

pub use download::Downloader;
