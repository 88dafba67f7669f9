// Season files on disk: `<data_dir>/<gender>/<season>.json` plus the
// optional `years.json` holding per-season totals.

use std::path::{Path, PathBuf};

use courtside_core::season::{self, latest_year, sort_seasons_desc, YEARLY};
use courtside_core::{Season, SeasonError};
use thiserror::Error;
use tracing::{debug, info};

/// File name of the multi-season totals file.
pub const YEARS_FILE: &str = "years.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read season directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no season files found in {path}")]
    NoSeasons { path: PathBuf },

    #[error(transparent)]
    Season(#[from] SeasonError),
}

/// One gender's season directory.
#[derive(Debug, Clone)]
pub struct SeasonStore {
    dir: PathBuf,
}

impl SeasonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SeasonStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn years_path(&self) -> PathBuf {
        self.dir.join(YEARS_FILE)
    }

    /// Season keys found in the directory, newest first.
    pub fn season_keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| StoreError::ReadDir {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::ReadDir {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if path.file_name().and_then(|n| n.to_str()) == Some(YEARS_FILE) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        sort_seasons_desc(&mut keys);
        debug!("found {} season files in {}", keys.len(), self.dir.display());
        Ok(keys)
    }

    /// Season keys newest first, followed by `Yearly` when a yearly file
    /// is present.
    pub fn available(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = self.season_keys()?;
        if self.years_path().is_file() {
            keys.push(YEARLY.to_string());
        }
        Ok(keys)
    }

    /// Load a season by key; `None` picks the latest season and `Yearly`
    /// builds the multi-season view.
    pub fn load(&self, key: Option<&str>) -> Result<Season, StoreError> {
        let key = match key {
            Some(k) => k.to_string(),
            None => {
                let keys = self.season_keys()?;
                let latest = latest_year(&keys).map(str::to_string);
                latest.ok_or_else(|| StoreError::NoSeasons {
                    path: self.dir.clone(),
                })?
            }
        };

        if key.eq_ignore_ascii_case(YEARLY) {
            info!("loading yearly totals from {}", self.years_path().display());
            return Ok(season::load_yearly(&self.years_path())?.view());
        }

        let path = self.dir.join(format!("{key}.json"));
        info!("loading season {key} from {}", path.display());
        Ok(season::load_season(&path)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
