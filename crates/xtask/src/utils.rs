//! Utility functions for xtask commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use conquest_content::ContentFactory;
use conquest_core::{GameState, OracleSnapshot};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a content directory that replaces the
/// embedded scenario.
pub const CONTENT_DIR_VAR: &str = "CONQUEST_CONTENT_DIR";

/// Resolves the content directory: explicit flag first, then
/// `CONQUEST_CONTENT_DIR`. `None` means the embedded scenario.
pub fn content_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| std::env::var_os(CONTENT_DIR_VAR).map(PathBuf::from))
}

/// Log filter from `RUST_LOG` directives. Unset or unparsable directives
/// fall back to `info`; valid ones are used as given, narrower or not.
pub fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs and returns the shared content catalog.
pub fn load_content(flag: Option<PathBuf>) -> Result<&'static OracleSnapshot> {
    match content_dir(flag) {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading content");
            conquest_content::init_catalog(dir)
        }
        None => conquest_content::catalog(),
    }
}

/// Loads content without touching the shared catalog.
pub fn load_snapshot(dir: Option<&Path>) -> Result<OracleSnapshot> {
    match dir {
        Some(dir) => ContentFactory::new(dir).load_snapshot(),
        None => ContentFactory::load_embedded(),
    }
}

pub fn read_state(path: &Path) -> Result<GameState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize state file: {}", path.display()))
}

/// Writes `state` as pretty JSON to `path`, or to stdout when `path` is
/// `None`.
pub fn write_state(state: &GameState, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to serialize state to JSON")?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write state file: {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

pub fn state_hash(state: &GameState) -> Result<String> {
    let hash = state.state_hash().context("Failed to hash state")?;
    Ok(hex::encode(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_wins() {
        let dir = content_dir(Some(PathBuf::from("/tmp/custom")));
        assert_eq!(dir, Some(PathBuf::from("/tmp/custom")));
    }

    #[test]
    fn rust_log_is_not_widened_to_info() {
        assert_eq!(log_filter(Some("warn".to_string())).to_string(), "warn");
        assert_eq!(log_filter(None).to_string(), "info");
    }

    #[test]
    fn states_survive_a_json_file() {
        let content = load_snapshot(None).unwrap();
        let state = GameState::new_game(&content.pcg_env()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        write_state(&state, Some(&path)).unwrap();
        let loaded = read_state(&path).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(state_hash(&loaded).unwrap(), state_hash(&state).unwrap());
    }
}
