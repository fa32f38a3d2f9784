//! Save the filtered station metadata to a JSON file.

use std::{fs::File, io::BufWriter, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer};

use crate::cli::command::stations::Station;

/// Writes `stations` as a pretty-printed JSON array, replacing any existing file.
pub fn save_stations(stations: &[Station], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    stations.serialize(&mut serializer)?;

    writer.flush()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
