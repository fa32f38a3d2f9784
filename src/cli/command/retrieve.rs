//! Retrieve the archives of every station in the configured region.

use anyhow::Result;
use tracing::info;

use crate::{
    config::{Config, Measurement},
    download::{retrieve_archives, Source},
    folders::create_data_folders,
    json,
    listing::{find_filenames_for_station, ListingParser},
};

use super::stations::{fetch_station_metadata, station_ids};

/// Runs the whole pipeline, returning the number of archives extracted.
///
/// Stations are processed one after another with `config.delay` after each
/// of them. Any error stops the run. Does nothing unless `config.retrieve` is set.
pub async fn retrieve(
    config: &Config,
    source: &dyn Source,
    parser: &dyn ListingParser,
) -> Result<usize> {
    if !config.retrieve {
        info!("Retrieval is disabled");
        return Ok(0);
    }

    create_data_folders(config)?;

    let mut archives = 0;
    for measurement in Measurement::ALL {
        archives += retrieve_measurement(config, source, parser, measurement).await?;
    }

    Ok(archives)
}

async fn retrieve_measurement(
    config: &Config,
    source: &dyn Source,
    parser: &dyn ListingParser,
    measurement: Measurement,
) -> Result<usize> {
    let stations = fetch_station_metadata(config, source, measurement).await?;
    json::save_stations(&stations, &config.metadata_json(measurement))?;

    let ids = station_ids(&stations);
    info!(
        "Retrieving {} data for {} stations in {}",
        measurement,
        ids.len(),
        config.region
    );

    let mut archives = 0;
    for station_id in &ids {
        let links =
            find_filenames_for_station(config, source, parser, measurement, station_id).await?;
        archives += retrieve_archives(config, source, measurement, station_id, &links).await?;

        tokio::time::sleep(config.delay).await;
    }

    Ok(archives)
}

// -- Tests -------------------------------------------------------------------
