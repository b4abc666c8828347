use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use gc_core::WorldConfig;

use crate::error::{Result, StoreError};

pub const CONFIG_FILE: &str = "config.toml";

/// Read `<dir>/config.toml`. A missing file means defaults; a file that
/// does not parse or fails validation is an error.
pub fn load_config(dir: &Path) -> Result<WorldConfig> {
    let path = dir.join(CONFIG_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(WorldConfig::default());
        }
        Err(e) => {
            return Err(StoreError::Config(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config: WorldConfig = toml::from_str(&content)?;
    config.validate().map_err(StoreError::Config)?;
    tracing::info!(path = %path.display(), "loaded world config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_core::LatLng;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()).unwrap(), WorldConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "spawn_probability = 0.5\n\n[start]\nlat = 0.0\nlng = 0.0\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.spawn_probability, 0.5);
        assert_eq!(config.start, LatLng::new(0.0, 0.0));
        assert_eq!(config.neighborhood_radius, WorldConfig::default().neighborhood_radius);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "tile_degrees = -1.0\n").unwrap();
        assert!(matches!(load_config(dir.path()), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_unparseable_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "neighborhood_radius = \"wide\"\n").unwrap();
        assert!(matches!(load_config(dir.path()), Err(StoreError::Config(_))));
    }
}
