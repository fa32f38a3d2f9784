//! Run configuration and the measurement types it covers.

use std::{fmt, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use reqwest::Url;

const BASE_URL: &str =
    "https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/";
const REGION: &str = "Schleswig-Holstein";
const DELAY_SECONDS: u64 = 5;
const INDEX_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The observed quantities published as 10-minute archives.
pub enum Measurement {
    Temperature,
    Wind,
    Solar,
}

impl Measurement {
    /// Processing order of a run.
    pub const ALL: [Measurement; 3] = [
        Measurement::Temperature,
        Measurement::Wind,
        Measurement::Solar,
    ];

    /// Label used in file names and log messages.
    pub fn label(&self) -> &'static str {
        match self {
            Measurement::Temperature => "temperature",
            Measurement::Wind => "wind",
            Measurement::Solar => "solar",
        }
    }

    fn index_path(&self) -> &'static str {
        match self {
            Measurement::Temperature => "10_minutes/air_temperature/historical/",
            Measurement::Wind => "10_minutes/wind/historical/",
            Measurement::Solar => "10_minutes/solar/historical/",
        }
    }

    fn metadata_file(&self) -> &'static str {
        match self {
            Measurement::Temperature => "zehn_min_tu_Beschreibung_Stationen.txt",
            Measurement::Wind => "zehn_min_ff_Beschreibung_Stationen.txt",
            Measurement::Solar => "zehn_min_sd_Beschreibung_Stationen.txt",
        }
    }

    fn directory(&self) -> &'static str {
        match self {
            Measurement::Temperature => "air_temperature",
            Measurement::Wind => "wind",
            Measurement::Solar => "solar",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone)]
/// Everything a run needs, built once in `main` and handed to each step.
pub struct Config {
    pub base_dir: PathBuf,
    pub base_url: Url,
    pub region: String,
    /// Pause after every station.
    pub delay: Duration,
    /// Timeout of the directory listing request.
    pub index_timeout: Duration,
    /// When false the `retrieve` command does nothing.
    pub retrieve: bool,
}

impl Config {
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        let base_url = Url::parse(BASE_URL).context("Invalid base URL")?;

        Ok(Config {
            base_dir,
            base_url,
            region: REGION.to_string(),
            delay: Duration::from_secs(DELAY_SECONDS),
            index_timeout: Duration::from_secs(INDEX_TIMEOUT_SECONDS),
            retrieve: true,
        })
    }

    /// Configuration rooted at `./data` in the working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Config::new(cwd.join("data"))
    }

    /// Directory listing that enumerates the archives of a measurement.
    pub fn index_url(&self, measurement: Measurement) -> Result<Url> {
        self.base_url
            .join(measurement.index_path())
            .with_context(|| format!("Failed to build index URL for {}", measurement))
    }

    /// Fixed-width station description published next to the archives.
    pub fn metadata_url(&self, measurement: Measurement) -> Result<Url> {
        self.index_url(measurement)?
            .join(measurement.metadata_file())
            .with_context(|| format!("Failed to build metadata URL for {}", measurement))
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.base_dir.join("cdc").join("raw")
    }

    pub fn data_dir(&self, measurement: Measurement) -> PathBuf {
        self.raw_dir().join(measurement.directory())
    }

    /// Scratch directory for archives awaiting extraction.
    pub fn zip_dir(&self) -> PathBuf {
        self.raw_dir().join("zip")
    }

    pub fn metadata_json(&self, measurement: Measurement) -> PathBuf {
        self.raw_dir()
            .join(format!("station_metadata_{}.json", measurement.label()))
    }

    /// The directories a run writes into, in creation order.
    pub fn data_directories(&self) -> Vec<PathBuf> {
        vec![
            self.data_dir(Measurement::Temperature),
            self.data_dir(Measurement::Solar),
            self.data_dir(Measurement::Wind),
            self.zip_dir(),
        ]
    }
}

// -- Tests -------------------------------------------------------------------
