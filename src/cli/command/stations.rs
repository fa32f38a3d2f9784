//! Download station metadata and save to disk.
//!
//! The station descriptions are fixed-width, ISO-8859-1 encoded text files
//! published next to the archives of each measurement.

use anyhow::Result;
use encoding_rs::mem::decode_latin1;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    cli::create_spinner,
    config::{Config, Measurement},
    download::Source,
    folders::create_data_folders,
    json,
};

/// Column character ranges of the station description files.
const COLUMNS: [(usize, usize); 9] = [
    (0, 6),
    (6, 15),
    (15, 24),
    (24, 40),
    (40, 50),
    (50, 60),
    (60, 100),
    (100, 130),
    (130, 140),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub validity_start_date: String,
    pub validity_end_date: String,
    pub station_elevation: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub station_name: String,
    pub region_name: String,
    pub data_release_status: String,
}

impl Station {
    /// Misaligned lines give wrong values, never an error.
    fn from_line(line: &str) -> Self {
        let chars: Vec<char> = line.chars().collect();
        let field = |i: usize| column(&chars, COLUMNS[i]);

        Station {
            station_id: field(0),
            validity_start_date: field(1),
            validity_end_date: field(2),
            station_elevation: field(3).parse().ok(),
            latitude: field(4).parse().ok(),
            longitude: field(5).parse().ok(),
            station_name: field(6),
            region_name: field(7),
            data_release_status: field(8),
        }
    }
}

/// `provision -> fetch -> persist` for every measurement, without archives.
pub async fn stations(config: &Config, source: &dyn Source) -> Result<String> {
    create_data_folders(config)?;

    for measurement in Measurement::ALL {
        let stations = fetch_station_metadata(config, source, measurement).await?;
        json::save_stations(&stations, &config.metadata_json(measurement))?;
        info!(
            "Saved {} {} stations in {}",
            stations.len(),
            measurement,
            config.region
        );
    }

    Ok(config.raw_dir().to_string_lossy().to_string())
}

/// Downloads the station description of a measurement and keeps the configured region.
pub async fn fetch_station_metadata(
    config: &Config,
    source: &dyn Source,
    measurement: Measurement,
) -> Result<Vec<Station>> {
    let url = config.metadata_url(measurement)?;

    let bar = create_spinner(format!("Downloading {} station metadata...", measurement));
    let bytes = source.get_bytes(&url).await?;
    bar.finish_with_message(format!("{} station metadata downloaded", measurement));

    Ok(filter_region(extract_stations(&bytes), &config.region))
}

/// Parses a Latin-1 station description: header, separator line, then one station per line.
pub fn extract_stations(bytes: &[u8]) -> Vec<Station> {
    let text = decode_latin1(bytes);

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .skip(2)
        .map(Station::from_line)
        .collect()
}

/// Keeps stations whose region equals `region` exactly.
pub fn filter_region(stations: Vec<Station>, region: &str) -> Vec<Station> {
    stations
        .into_iter()
        .filter(|s| s.region_name == region)
        .collect()
}

/// Station ids left-padded with zeros to five characters, in station order.
pub fn station_ids(stations: &[Station]) -> Vec<String> {
    stations
        .iter()
        .map(|s| format!("{:0>5}", s.station_id))
        .collect()
}

fn column(chars: &[char], (start, end): (usize, usize)) -> String {
    let end = end.min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect::<String>().trim().to_string()
}

// -- Tests -------------------------------------------------------------------
