use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::FixtureConfig;
use crate::errors::{FixtureError, Result};

pub const CONFIG_FILE_NAME: &str = ".lock-fixture.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate a config from TOML text.
///
/// `path` is only used to annotate errors.
pub fn parse_config(contents: &str, path: Option<&Path>) -> Result<FixtureConfig> {
    let config = toml::from_str::<FixtureConfig>(contents).map_err(|e| FixtureError::Config {
        path: path.map(Path::to_path_buf),
        message: e.message().to_string(),
    })?;

    config.validate().map_err(|e| match (e, path) {
        (FixtureError::Config { message, .. }, Some(path)) => FixtureError::config_at(path, message),
        (other, _) => other,
    })?;

    Ok(config)
}

/// Load a config file the user named explicitly. A missing file is an error.
pub fn load_config_from(path: &Path) -> Result<FixtureConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| FixtureError::config_at(path, format!("failed to read: {e}")))?;
    let config = parse_config(&contents, Some(path))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(path: &Path) -> Option<FixtureConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read config file {}: {}", path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents, Some(path)) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Yield `start` and its parents, at most `max_depth` directories in total.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file, falling back to defaults.
pub fn load_config_from_dir(start: PathBuf) -> FixtureConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            FixtureConfig::default()
        })
}

pub fn load_config() -> FixtureConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(dir),
        Err(e) => {
            warn!("Failed to get current directory: {}. Using default config.", e);
            FixtureConfig::default()
        }
    }
}
