use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use posted::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(|p| p.to_path_buf())) {
        if exe_dir.join(CFG_FILE_NAME).exists() {
            return Some(exe_dir.join(CFG_FILE_NAME));
        }
    }

    if let Ok(cur_dir) = env::current_dir() {
        if cur_dir.join(CFG_FILE_NAME).exists() {
            return Some(cur_dir.join(CFG_FILE_NAME));
        }
    }

    if let Some(cfg_dir) = dirs::config_dir() {
        let cfg_path = cfg_dir.join("posted").join(CFG_FILE_NAME);
        if cfg_path.exists() {
            return Some(cfg_path);
        }
    }

    None
}

/// Explicit path first, then the usual locations. No file at all means defaults.
pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => return Ok(Config::default()),
    };

    let config = read_config(&config_path)
        .with_context(|| format!("Could not load configuration {}", config_path.display()))?;

    Ok(config)
}
