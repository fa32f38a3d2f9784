//! Creates the output directory tree.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;

/// Creates every data directory that does not exist yet.
pub fn create_data_folders(config: &Config) -> Result<()> {
    for directory in config.data_directories() {
        if !directory.exists() {
            fs::create_dir_all(&directory)
                .with_context(|| format!("Failed to create {}", directory.display()))?;
            info!("Created data directory: {}", directory.display());
        }
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------
