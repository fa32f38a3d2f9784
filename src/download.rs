//! Fetches remote resources and unpacks the downloaded archives.

use std::{
    fs::{self, File},
    io::{copy, BufWriter, Write},
    path::Path,
    time::Duration,
};

use anyhow::{anyhow, Context, Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::{
    cli::{create_progress_bar, create_spinner},
    config::{Config, Measurement},
    error::RetrievalError,
};

/// A fetched HTML page together with its HTTP status.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub body: String,
}

/// Access to the upstream server.
#[async_trait]
pub trait Source: Send + Sync {
    /// GET a page with a timeout, returning it whatever its status.
    async fn get_page(&self, url: &Url, timeout: Duration) -> Result<Page>;

    /// Raw bytes of a resource; fails on a non-success status.
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>>;

    /// Stream a resource into `file_path`, replacing any existing file.
    async fn download(&self, url: &Url, file_path: &Path) -> Result<()>;
}

/// [`Source`] backed by `reqwest`. `file://` URLs are read from disk.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn get_page(&self, url: &Url, timeout: Duration) -> Result<Page> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        let body = response.text().await?;

        Ok(Page { status, body })
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| anyhow!("Not a local file: {}", url))?;
            return fs::read(&path).with_context(|| format!("Failed to read {}", path.display()));
        }

        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: response.status(),
            }
            .into());
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn download(&self, url: &Url, file_path: &Path) -> Result<()> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::msg(format!("Failed to download file: {}", e)))?;

        if !response.status().is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: response.status(),
            }
            .into());
        }

        let message = format!("Downloading {}", url);
        let progress_bar = match response.content_length() {
            Some(total_size) if total_size > 0 => create_progress_bar(total_size, message),
            _ => create_spinner(message),
        };

        let mut file = File::create(file_path)
            .with_context(|| format!("Failed to create {}", file_path.display()))?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| Error::msg(format!("Error reading chunk: {}", e)))?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            progress_bar.set_position(downloaded);
        }

        progress_bar.finish_and_clear();

        Ok(())
    }
}

/// Downloads each archive of a station and unpacks it into the measurement's directory.
///
/// Returns the number of archives processed. The first failure aborts; an
/// archive that failed to extract stays in the zip directory.
pub async fn retrieve_archives(
    config: &Config,
    source: &dyn Source,
    measurement: Measurement,
    station_id: &str,
    links: &[String],
) -> Result<usize> {
    let index_url = config.index_url(measurement)?;
    let extract_to = config.data_dir(measurement);

    for link in links {
        let file_url = index_url
            .join(link)
            .with_context(|| format!("Invalid archive link: {}", link))?;
        let file_name = archive_file_name(link);
        let zip_path = config.zip_dir().join(file_name);

        source.download(&file_url, &zip_path).await?;
        unpack_and_remove_zip(&zip_path, &extract_to)?;

        info!(
            "Retrieved and extracted data for station {} from {} into {}",
            station_id,
            file_name,
            extract_to.display()
        );
    }

    Ok(links.len())
}

/// Extracts the archive at `zip_path` into `extract_to`, then deletes the archive.
pub fn unpack_and_remove_zip(zip_path: &Path, extract_to: &Path) -> Result<usize> {
    let count = extract_zip(zip_path, extract_to)?;
    fs::remove_file(zip_path)
        .with_context(|| format!("Failed to remove {}", zip_path.display()))?;

    Ok(count)
}

/// Extracts every entry of a zip archive, keeping its internal paths.
pub fn extract_zip(zip_path: &Path, extract_to: &Path) -> Result<usize> {
    let file =
        File::open(zip_path).with_context(|| format!("Failed to open {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read archive {}", zip_path.display()))?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // Root and `..` components are dropped, keeping every entry inside `extract_to`
        let dest_path = extract_to.join(entry.mangled_name());

        if entry.is_dir() {
            fs::create_dir_all(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&dest_path)?);
        copy(&mut entry, &mut writer)?;
        writer.flush()?;
        count += 1;
    }

    Ok(count)
}

/// File name of an archive link, i.e. its last path segment.
fn archive_file_name(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

// -- Tests -------------------------------------------------------------------
