//! Streaming download of a dump to local disk.

use super::progress_stream::{ProgressCallback, ProgressStream};
use crate::utils::Result;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Result of a finished download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub bytes: u64,
    /// Size announced by the server, if any
    pub total: Option<u64>,
}

/// Streams a URL into the dump file
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    dump_path: PathBuf,
}

impl Downloader {
    pub fn new(client: reqwest::Client, dump_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dump_path: dump_path.into(),
        }
    }

    pub fn dump_path(&self) -> &Path {
        &self.dump_path
    }

    /// Create (or truncate) the dump file, then copy the response body into it.
    ///
    /// `on_progress` gets the running byte count and the announced total.
    /// The file is left behind when the transfer fails.
    pub async fn download<F>(&self, url: &str, on_progress: F) -> Result<DownloadOutcome>
    where
        F: Fn(u64, Option<u64>) + Send + Sync + 'static,
    {
        let mut file = File::create(&self.dump_path).await?;
        debug!("Created dump file {}", self.dump_path.display());

        let response = self.client.get(url).send().await?.error_for_status()?;
        let total = response.content_length();
        info!(
            "Downloading backup to {} ({} bytes announced)",
            self.dump_path.display(),
            total.map_or_else(|| "no size".to_string(), |t| t.to_string())
        );

        let callback: ProgressCallback = Arc::new(move |bytes| on_progress(bytes, total));
        let mut body = ProgressStream::new(Box::pin(response.bytes_stream()), callback);

        while let Some(chunk) = body.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        Ok(DownloadOutcome {
            path: self.dump_path.clone(),
            bytes: body.bytes_transferred(),
            total,
        })
    }
}
