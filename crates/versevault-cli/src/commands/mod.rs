use std::path::PathBuf;

use anyhow::Result;

use versevault_store::config::{load_config_from, VaultConfig};

pub mod future;
pub mod init;
pub mod manage;
pub mod quiz;
pub mod status;
pub mod vault;

/// Load the config file and apply the `--database` override.
pub fn resolve_config(config: Option<PathBuf>, database: Option<PathBuf>) -> Result<VaultConfig> {
    let mut config = load_config_from(config.as_deref())?;
    if let Some(database) = database {
        config.database_path = database;
    }
    Ok(config)
}
