//! Read and change `config.json`. Keys outside [`CONFIG_KEYS`] are reported
//! as errors without touching the file.

use std::path::Path;

use crate::commands::{CmdMessage, CmdResult, GridFilterPaths};
use crate::config::{GridFilterConfig, CONFIG_KEYS};
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &GridFilterPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = paths.data_dir.as_path();
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(GridFilterConfig::load(dir)?)),
        ConfigAction::ShowKey(key) => show_key(dir, &key),
        ConfigAction::Set(key, value) => set_key(dir, &key, &value),
    }
}

fn known_key(key: &str) -> Option<CmdResult> {
    if CONFIG_KEYS.contains(&key) {
        return None;
    }
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::error(format!(
        "Unknown config key: {} (expected one of {})",
        key,
        CONFIG_KEYS.join(", ")
    )));
    Some(result)
}

fn show_key(dir: &Path, key: &str) -> Result<CmdResult> {
    if let Some(unknown) = known_key(key) {
        return Ok(unknown);
    }
    let config = GridFilterConfig::load(dir)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(config.get(key).unwrap_or_default()));
    Ok(result)
}

fn set_key(dir: &Path, key: &str, value: &str) -> Result<CmdResult> {
    if let Some(unknown) = known_key(key) {
        return Ok(unknown);
    }
    let mut config = GridFilterConfig::load(dir)?;
    let previous = config.get(key);

    let mut result = CmdResult::default();
    if let Err(e) = config.set(key, value) {
        result.add_message(CmdMessage::error(e));
        return Ok(result);
    }

    let current = config.get(key).unwrap_or_default();
    if previous.as_deref() == Some(current.as_str()) {
        result.add_message(CmdMessage::info(format!("{} is already {}", key, current)));
        return Ok(result.with_config(config));
    }

    config.save(dir)?;
    result.add_message(CmdMessage::success(format!("{} set to {}", key, current)));
    Ok(result.with_config(config))
}
