// Configuration loading and parsing (config/courtside.toml).

use courtside_core::Gender;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "courtside.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// courtside.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataSection,
    #[serde(default)]
    display: DisplayConfig,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    dir: String,
    #[serde(default = "default_gender")]
    gender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Hide records with fewer possessions than the category has games.
    #[serde(default = "default_filter_possessions")]
    pub filter_possessions: bool,
    /// Row cap for the lineups table.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            filter_possessions: default_filter_possessions(),
            max_rows: default_max_rows(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    #[serde(default = "default_log_dir")]
    dir: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            dir: default_log_dir(),
        }
    }
}

fn default_gender() -> String {
    "men".into()
}

fn default_filter_possessions() -> bool {
    true
}

fn default_max_rows() -> usize {
    25
}

fn default_log_dir() -> String {
    "logs".into()
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub gender: Gender,
    pub display: DisplayConfig,
    pub log_dir: PathBuf,
}

impl Config {
    /// Directory holding one gender's season files.
    pub fn season_dir(&self, gender: Gender) -> PathBuf {
        self.data_dir.join(gender.as_str())
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/courtside.toml` relative to `base_dir`.
///
/// Relative data and log directories are resolved against `base_dir`.
/// Does not copy defaults; see `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    if file.data.dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.dir".into(),
            message: "must not be empty".into(),
        });
    }
    let gender = file
        .data
        .gender
        .parse::<Gender>()
        .map_err(|message| ConfigError::ValidationError {
            field: "data.gender".into(),
            message,
        })?;

    let config = Config {
        data_dir: base_dir.join(&file.data.dir),
        gender,
        display: file.display,
        log_dir: base_dir.join(&file.logging.dir),
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/courtside.toml` exists by copying it from `defaults/`.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let source = defaults_dir.join(CONFIG_FILE);
    let target = config_dir.join(CONFIG_FILE);
    if !source.is_file() || target.exists() {
        return Ok(vec![]);
    }

    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;

    Ok(vec![target])
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures the default config file is copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.display.max_rows == 0 {
        return Err(ConfigError::ValidationError {
            field: "display.max_rows".into(),
            message: "must be greater than 0".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: a scratch directory holding `config/courtside.toml` with the
    /// given contents.
    fn scratch_with_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    #[test]
    fn load_full_config() {
        let tmp = scratch_with_config(
            "courtside_config_full",
            r#"
[data]
dir = "data"
gender = "women"

[display]
filter_possessions = false
max_rows = 40

[logging]
dir = "var/log"
"#,
        );

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.data_dir, tmp.join("data"));
        assert_eq!(config.gender, Gender::Women);
        assert!(!config.display.filter_possessions);
        assert_eq!(config.display.max_rows, 40);
        assert_eq!(config.log_dir, tmp.join("var/log"));
        assert_eq!(config.season_dir(Gender::Men), tmp.join("data").join("men"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_use_defaults() {
        let tmp = scratch_with_config("courtside_config_defaults", "[data]\ndir = \"data\"\n");

        let config = load_config_from(&tmp).expect("should load minimal config");
        assert_eq!(config.gender, Gender::Men);
        assert!(config.display.filter_possessions);
        assert_eq!(config.display.max_rows, 25);
        assert_eq!(config.log_dir, tmp.join("logs"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_gender() {
        let tmp = scratch_with_config(
            "courtside_config_bad_gender",
            "[data]\ndir = \"data\"\ngender = \"mixed\"\n",
        );

        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "data.gender"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_rows() {
        let tmp = scratch_with_config(
            "courtside_config_zero_rows",
            "[data]\ndir = \"data\"\n[display]\nmax_rows = 0\n",
        );

        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "display.max_rows"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_dir() {
        let tmp = scratch_with_config("courtside_config_empty_dir", "[data]\ndir = \"  \"\n");

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = scratch_with_config("courtside_config_malformed", "[data\ndir = ");

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = std::env::temp_dir().join("courtside_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_copies_defaults_once() {
        let tmp = std::env::temp_dir().join("courtside_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(
            tmp.join("defaults").join(CONFIG_FILE),
            "[data]\ndir = \"data\"\n",
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config").join(CONFIG_FILE)]);
        // Second call leaves the existing file alone.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert!(load_config_from(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_without_any_directory_fails() {
        let tmp = std::env::temp_dir().join("courtside_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn shipped_defaults_parse() {
        let text = include_str!("../defaults/courtside.toml");
        let tmp = scratch_with_config("courtside_config_shipped", text);
        assert!(load_config_from(&tmp).is_ok());
        let _ = fs::remove_dir_all(&tmp);
    }
}
