use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use paramsync_types::{ConfigError, SyncConfig};

pub const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "paramsync";

/// `<config dir>/paramsync/config.json`; relative to the working directory
/// when the platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR).join(CONFIG_FILE)
}

/// Load the sync configuration.
///
/// A missing file yields the defaults. The result is not validated; the
/// engine validates it when it is built.
pub fn load_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(SyncConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::NotFound {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    if content.trim().is_empty() {
        return Ok(SyncConfig::default());
    }

    let config: SyncConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save the sync configuration.
pub fn save_config(path: &Path, config: &SyncConfig) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::WriteError { message: e.to_string() })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::from_io_error(&e))?;
    }

    // Atomic write
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp_path = PathBuf::from(temp);
    fs::write(&temp_path, content).map_err(|e| ConfigError::from_io_error(&e))?;
    fs::rename(&temp_path, path).map_err(|e| ConfigError::from_io_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = SyncConfig {
            deny_list: vec!["/private/*".to_string()],
            tick_rate: 5.0,
            max_lifetime: 30.0,
            store_path: Some(dir.path().join("params.json")),
            ..SyncConfig::default()
        };

        save_config(&path, &config).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_legacy_parameter_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{"whitelist": ["/a"], "blacklist": ["*"], "debug": true, "rate": 10.0, "death_timer": 3}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.allow_list, vec!["/a".to_string()]);
        assert_eq!(config.deny_list, vec!["*".to_string()]);
        assert!(config.verbose);
        assert_eq!(config.tick_rate, 10.0);
        assert_eq!(config.max_lifetime, 3.0);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ \"tick_rate\": ").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with(Path::new(APP_DIR).join(CONFIG_FILE)));
    }
}
