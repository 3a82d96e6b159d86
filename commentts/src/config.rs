//! Configuration file lookup: `--config`, else `.comment-ts.toml` next to
//! the input, else in the current directory, else defaults.

use anyhow::{Context, Result};
use commentts_syntax::Config;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".comment-ts.toml";

pub fn load(explicit: Option<&Path>, input: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(input),
    };
    match path {
        Some(path) => read(&path),
        None => Ok(Config::default()),
    }
}

fn discover(input: &Path) -> Option<PathBuf> {
    let beside = input.parent().map(|dir| dir.join(CONFIG_FILE));
    beside
        .into_iter()
        .chain(std::iter::once(PathBuf::from(CONFIG_FILE)))
        .find(|candidate| candidate.is_file())
}

fn read(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}
