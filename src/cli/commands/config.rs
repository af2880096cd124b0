//! `config` command handlers

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ConfigCommands;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Merged configuration, printed as YAML or JSON.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput(pub Config);

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.0).unwrap_or_default()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.0).unwrap_or_default()
    }
}

pub async fn execute(command: ConfigCommands, json: bool) -> Result<()> {
    match command {
        ConfigCommands::Show { config } => show(config, json),
    }
}

fn show(path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = ConfigLoader::load_with(path.as_deref())?;
    output(&ConfigOutput(config), json);
    Ok(())
}
