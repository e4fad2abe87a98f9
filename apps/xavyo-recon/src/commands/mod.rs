//! CLI command implementations

pub mod columns;
pub mod run;

use std::path::Path;

use xavyo_access_recon::ReconConfig;

use crate::error::CliResult;

/// Load the config file if one was given, otherwise the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> CliResult<ReconConfig> {
    let config = match path {
        Some(path) => ReconConfig::from_yaml_path(path)?,
        None => ReconConfig::default(),
    };
    Ok(config)
}
