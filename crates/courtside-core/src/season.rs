// Season data: raw per-category tables as delivered by the loader, the
// normalized category tables the engine works on, and the yearly view.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::lineup::LineupRecord;

/// Season key used for the multi-season view.
pub const YEARLY: &str = "Yearly";

// ---------------------------------------------------------------------------
// Selection enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "men" | "m" => Ok(Gender::Men),
            "women" | "w" => Ok(Gender::Women),
            other => Err(format!("unknown gender '{other}', expected 'men' or 'women'")),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which table of a category to read: five-man lineups or single players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    #[default]
    Lineups,
    Players,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Lineups => "lineups",
            Group::Players => "players",
        }
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lineups" => Ok(Group::Lineups),
            "players" => Ok(Group::Players),
            other => Err(format!("unknown group '{other}', expected 'lineups' or 'players'")),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub wake: i64,
    pub opp: i64,
}

/// One category (a game, or a grouping of games) ready for the engine.
#[derive(Debug, Clone, Default)]
pub struct CategoryData {
    pub score: Score,
    pub order: u32,
    /// Display label, e.g. `"Season Totals"`.
    pub game: String,
    /// Sorted by playing time, longest first.
    pub lineups: Vec<LineupRecord>,
    /// Sorted by playing time, longest first.
    pub players: Vec<LineupRecord>,
    pub game_count: u32,
}

impl CategoryData {
    pub fn records(&self, group: Group) -> &[LineupRecord] {
        match group {
            Group::Lineups => &self.lineups,
            Group::Players => &self.players,
        }
    }

    /// Records to display. With `filter` on, only records that played at
    /// least one possession per game of the category are kept.
    pub fn qualified(&self, group: Group, filter: bool) -> Vec<&LineupRecord> {
        let min = f64::from(self.game_count);
        self.records(group)
            .iter()
            .filter(|r| !filter || r.possessions() >= min)
            .collect()
    }

    /// Names available for a player report, in table order.
    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.players.as_str()).collect()
    }
}

/// Every category of one season, indexed by category order.
#[derive(Debug, Clone, Default)]
pub struct Season {
    pub year: String,
    pub categories: Vec<CategoryData>,
}

impl Season {
    pub fn category(&self, index: usize) -> Option<&CategoryData> {
        self.categories.get(index)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SeasonError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw serde structs
// ---------------------------------------------------------------------------

/// One category as stored upstream. Either table may be missing when no
/// game of the category was played (e.g. neutral-site games).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub lineups: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub players: Option<HashMap<String, serde_json::Value>>,
    pub game: String,
    #[serde(default)]
    pub game_count: u32,
}

/// Entry of the yearly file: one season's totals for one category.
#[derive(Debug, Clone, Deserialize)]
struct RawYearlyEntry {
    #[serde(default)]
    category: String,
    lineup: LineupRecord,
    #[serde(default)]
    order: u32,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn sort_by_time(records: &mut [LineupRecord]) {
    records.sort_by(|a, b| {
        b.time
            .total_cmp(&a.time)
            .then_with(|| a.players.cmp(&b.players))
    });
}

/// Decode a table of raw counts, skipping entries that do not parse.
fn parse_table(
    game: &str,
    table: Option<HashMap<String, serde_json::Value>>,
) -> Vec<LineupRecord> {
    let Some(table) = table else {
        return Vec::new();
    };
    let mut records = Vec::with_capacity(table.len());
    for (key, value) in table {
        match serde_json::from_value::<LineupRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping malformed entry '{}' in '{}': {}", key, game, e),
        }
    }
    sort_by_time(&mut records);
    records
}

impl From<RawCategory> for CategoryData {
    fn from(raw: RawCategory) -> Self {
        let game = raw.game.replacen('_', " ", 1);
        let lineups = parse_table(&game, raw.lineups);
        let players = parse_table(&game, raw.players);
        CategoryData {
            score: raw.score,
            order: raw.order,
            game,
            lineups,
            players,
            game_count: raw.game_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse a season: a JSON array of categories in display order.
pub fn load_season_from_reader<R: Read>(year: &str, rdr: R) -> Result<Season, SeasonError> {
    let raw: Vec<RawCategory> =
        serde_json::from_reader(rdr).map_err(|e| SeasonError::Json {
            path: year.to_string(),
            source: e,
        })?;
    if raw.is_empty() {
        return Err(SeasonError::Validation(format!(
            "season {year} has no categories"
        )));
    }
    let categories: Vec<CategoryData> = raw.into_iter().map(CategoryData::from).collect();
    debug!(
        "season {}: {} categories, {} lineups in first category",
        year,
        categories.len(),
        categories[0].lineups.len()
    );
    Ok(Season {
        year: year.to_string(),
        categories,
    })
}

/// Load a season file; the season key is the file stem (`2023-24.json`).
pub fn load_season(path: &Path) -> Result<Season, SeasonError> {
    let year = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SeasonError::Validation(format!("bad season file name {}", path.display())))?
        .to_string();
    let file = std::fs::File::open(path).map_err(|e| SeasonError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_season_from_reader(&year, std::io::BufReader::new(file)).map_err(|e| match e {
        SeasonError::Json { source, .. } => SeasonError::Json {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

/// Each season's per-category totals, as stored in the yearly file.
#[derive(Debug, Clone, Default)]
pub struct YearlyTotals {
    /// Category labels indexed by category order.
    pub labels: Vec<String>,
    /// `(season, totals)` pairs; totals are keyed by category order.
    pub seasons: Vec<(String, BTreeMap<u32, LineupRecord>)>,
}

impl YearlyTotals {
    /// The multi-season view of these totals.
    pub fn view(&self) -> Season {
        let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        yearly_view(&self.seasons, &labels)
    }
}

/// Parse the yearly file: season key to that season's per-category totals.
///
/// Entries that do not decode are skipped with a warning; the rest of the
/// season and the other seasons still load.
pub fn load_yearly_from_reader<R: Read>(rdr: R) -> Result<YearlyTotals, SeasonError> {
    let raw: BTreeMap<String, Vec<serde_json::Value>> =
        serde_json::from_reader(rdr).map_err(|e| SeasonError::Json {
            path: YEARLY.to_string(),
            source: e,
        })?;
    let mut yearly = YearlyTotals::default();
    for (season, entries) in raw {
        let mut totals = BTreeMap::new();
        for (i, value) in entries.into_iter().enumerate() {
            let entry = match serde_json::from_value::<RawYearlyEntry>(value) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping malformed yearly entry {} of '{}': {}", i, season, e);
                    continue;
                }
            };
            let slot = entry.order as usize;
            if yearly.labels.len() <= slot {
                yearly.labels.resize(slot + 1, String::new());
            }
            if yearly.labels[slot].is_empty() {
                yearly.labels[slot] = entry.category.replacen('_', " ", 1);
            }
            totals.insert(entry.order, entry.lineup);
        }
        yearly.seasons.push((season, totals));
    }
    Ok(yearly)
}

/// Load the yearly file from disk.
pub fn load_yearly(path: &Path) -> Result<YearlyTotals, SeasonError> {
    let file = std::fs::File::open(path).map_err(|e| SeasonError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_yearly_from_reader(std::io::BufReader::new(file)).map_err(|e| match e {
        SeasonError::Json { source, .. } => SeasonError::Json {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Season helpers
// ---------------------------------------------------------------------------

/// Leading four-digit year of a season key (`"2023-24"` -> 2023).
fn season_start(key: &str) -> Option<u32> {
    key.get(..4).and_then(|y| y.parse().ok())
}

/// The season key with the most recent starting year. Keys without a
/// leading year sort last.
pub fn latest_year<S: AsRef<str>>(keys: &[S]) -> Option<&str> {
    keys.iter()
        .map(|k| k.as_ref())
        .max_by_key(|k| season_start(k))
}

/// Order season keys newest first.
pub fn sort_seasons_desc(keys: &mut [String]) {
    keys.sort_by(|a, b| season_start(b).cmp(&season_start(a)));
}

/// Build the multi-season view: category `c` lists each season's
/// category-`c` totals as one row named after the season, newest first.
pub fn yearly_view(seasons: &[(String, BTreeMap<u32, LineupRecord>)], labels: &[&str]) -> Season {
    let width = seasons
        .iter()
        .filter_map(|(_, t)| t.keys().next_back())
        .map(|&order| order as usize + 1)
        .max()
        .unwrap_or(0)
        .max(labels.len());
    let mut categories: Vec<CategoryData> = (0..width)
        .map(|i| CategoryData {
            order: i as u32,
            game: labels.get(i).map(|l| l.to_string()).unwrap_or_default(),
            ..Default::default()
        })
        .collect();

    for (season, totals) in seasons {
        for (&order, record) in totals {
            categories[order as usize]
                .lineups
                .push(LineupRecord::from_counts(season.clone(), record));
        }
    }
    for category in &mut categories {
        category
            .lineups
            .sort_by(|a, b| season_start(&b.players).cmp(&season_start(&a.players)));
    }

    Season {
        year: YEARLY.to_string(),
        categories,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
