//! Locates the archives of a station on a directory listing.

use anyhow::Result;
use regex::Regex;
use reqwest::StatusCode;
use tracing::debug;

use crate::{
    config::{Config, Measurement},
    download::Source,
    error::RetrievalError,
};

/// Pulls archive links out of a directory listing page.
pub trait ListingParser {
    fn archive_links(&self, body: &str) -> Vec<String>;
}

/// Scans the raw HTML for `href="....zip"` attributes.
pub struct HrefZipParser {
    pattern: Regex,
}

impl HrefZipParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#"href="([^"]+\.zip)""#).unwrap(),
        }
    }
}

impl Default for HrefZipParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingParser for HrefZipParser {
    fn archive_links(&self, body: &str) -> Vec<String> {
        self.pattern
            .captures_iter(body)
            .map(|cap| cap[1].to_string())
            .collect()
    }
}

/// Archive links of the measurement listing that carry `_{station_id}_`.
///
/// Fails with [`RetrievalError::Connection`] unless the listing answers 200.
pub async fn find_filenames_for_station(
    config: &Config,
    source: &dyn Source,
    parser: &dyn ListingParser,
    measurement: Measurement,
    station_id: &str,
) -> Result<Vec<String>> {
    let url = config.index_url(measurement)?;
    let page = source.get_page(&url, config.index_timeout).await?;

    if page.status != StatusCode::OK {
        return Err(RetrievalError::Connection {
            url: url.to_string(),
        }
        .into());
    }

    let links = station_links(parser.archive_links(&page.body), station_id);
    debug!("Found {} archives for station {}", links.len(), station_id);

    Ok(links)
}

/// Plain substring test; a station id is not matched against a filename schema.
fn station_links(links: Vec<String>, station_id: &str) -> Vec<String> {
    let token = format!("_{}_", station_id);
    links.into_iter().filter(|l| l.contains(&token)).collect()
}

// -- Tests -------------------------------------------------------------------
