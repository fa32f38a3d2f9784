//! Fixtures shared by the unit tests.

use std::{
    collections::HashMap,
    fs,
    io::{Cursor, Write},
    path::Path,
    sync::Mutex,
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use zip::{write::FileOptions, ZipWriter};

use crate::{
    config::Config,
    download::{Page, Source},
};

/// In-memory [`Source`] that records every request.
#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<String, Page>,
    bytes: HashMap<String, Vec<u8>>,
    page_requests: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, status: StatusCode, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn with_bytes(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.bytes.insert(url.to_string(), bytes);
        self
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for FakeSource {
    async fn get_page(&self, url: &Url, _timeout: Duration) -> Result<Page> {
        self.page_requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("No page for {}", url))
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        self.bytes
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("No resource for {}", url))
    }

    async fn download(&self, url: &Url, file_path: &Path) -> Result<()> {
        self.downloads.lock().unwrap().push(url.to_string());
        let bytes = self.get_bytes(url).await?;
        fs::write(file_path, bytes)?;
        Ok(())
    }
}

/// Configuration rooted in `base_dir` with a fake upstream and no delay.
pub fn test_config(base_dir: &Path) -> Config {
    let mut config = Config::new(base_dir.to_path_buf()).unwrap();
    config.base_url = Url::parse("http://cdc.test/climate/").unwrap();
    config.delay = Duration::ZERO;
    config
}

/// Zip archive holding the given `(name, content)` entries.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// One line of a station description file, laid out at the published columns.
pub fn station_line(id: &str, name: &str, region: &str) -> String {
    format!(
        "{:<6}{:<9}{:<9}{:>15} {:>9} {:>9} {:<40}{:<30}{:<10}",
        id, "19930101", "20231231", "26", "54.5275", "9.5487", name, region, "Frei"
    )
}

/// Encodes `text` the way the station descriptions are published.
pub fn latin1(text: &str) -> Vec<u8> {
    encoding_rs::mem::encode_latin1_lossy(text).into_owned()
}

/// Station description file with header and separator line.
pub fn station_file(lines: &[String]) -> String {
    let mut text = String::from(
        "Stations_id von_datum bis_datum Stationshoehe geoBreite geoLaenge Stationsname Bundesland Abgabe\n",
    );
    text.push_str("----------- --------- --------- ------------- --------- --------- ----------------------------------------- ---------- ------\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
