// Aggregation and query engine over collections of lineup records:
// on/off splits, lineup finder, and season totals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lineup::LineupRecord;

/// Separators used between player names in a lineup key.
pub const PLAYER_DELIMITERS: [char; 2] = ['|', '\\'];

/// Number of finder slots, one per player in a five-man lineup.
pub const FINDER_SLOTS: usize = 5;

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Split a lineup key into its player names.
pub fn player_names(players: &str) -> impl Iterator<Item = &str> {
    players
        .split(&PLAYER_DELIMITERS[..])
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Whether `players` names `player` as one of its members. Matches whole
/// names only, so `"Smith"` does not match `"Smithson|Jones"`.
pub fn has_player(players: &str, player: &str) -> bool {
    let player = player.trim();
    player_names(players).any(|name| name == player)
}

// ---------------------------------------------------------------------------
// On/off splits
// ---------------------------------------------------------------------------

/// Which side of the split a synthetic record covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Lineups the player was part of.
    On,
    /// Lineups without the player.
    Off,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::On => "on",
            Side::Off => "off",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Combine every lineup that contains (`Side::On`) or excludes (`Side::Off`)
/// `player` into one record labelled `"on"` / `"off"`.
///
/// With no matching lineup the result keeps all-zero counts.
pub fn combine_lineups_for_player(
    records: &[LineupRecord],
    player: &str,
    side: Side,
) -> LineupRecord {
    let mut res = LineupRecord::new(side.label());
    let wanted = side == Side::On;
    for lineup in records {
        if has_player(&lineup.players, player) == wanted {
            res.combine(lineup);
        }
    }
    res
}

/// Combine a whole collection into a single `"total"` record.
pub fn total<'a, I>(records: I) -> LineupRecord
where
    I: IntoIterator<Item = &'a LineupRecord>,
{
    let mut res = LineupRecord::new("total");
    for record in records {
        res.combine(record);
    }
    res
}

// ---------------------------------------------------------------------------
// Lineup finder
// ---------------------------------------------------------------------------

/// Lineups containing every name in `include` and none of the names in
/// `omit`, in input order.
pub fn find_lineups<'a, S: AsRef<str>>(
    records: &'a [LineupRecord],
    include: &[S],
    omit: &[S],
) -> Vec<&'a LineupRecord> {
    records
        .iter()
        .filter(|lineup| {
            include
                .iter()
                .all(|name| has_player(&lineup.players, name.as_ref()))
        })
        .filter(|lineup| {
            omit.iter()
                .all(|name| !has_player(&lineup.players, name.as_ref()))
        })
        .collect()
}

/// Whether a finder slot requires or forbids its player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinderKind {
    #[default]
    Include,
    Omit,
}

/// One slot of a finder query. A blank name leaves the slot unused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderPlayer {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FinderKind,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FinderError {
    #[error("a finder query holds at most {max} players, got {got}")]
    TooManyPlayers { max: usize, got: usize },
}

/// A lineup finder query of up to [`FINDER_SLOTS`] named players.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderQuery {
    slots: Vec<FinderPlayer>,
}

impl FinderQuery {
    pub fn new(slots: Vec<FinderPlayer>) -> Result<Self, FinderError> {
        let used = slots.iter().filter(|s| !s.name.trim().is_empty()).count();
        if used > FINDER_SLOTS {
            return Err(FinderError::TooManyPlayers {
                max: FINDER_SLOTS,
                got: used,
            });
        }
        Ok(FinderQuery { slots })
    }

    /// Build a query from separate include and omit lists.
    pub fn from_lists(include: &[String], omit: &[String]) -> Result<Self, FinderError> {
        let slots = include
            .iter()
            .map(|name| FinderPlayer {
                name: name.clone(),
                kind: FinderKind::Include,
            })
            .chain(omit.iter().map(|name| FinderPlayer {
                name: name.clone(),
                kind: FinderKind::Omit,
            }))
            .collect();
        FinderQuery::new(slots)
    }

    /// The non-blank names, split into `(include, omit)`.
    pub fn split(&self) -> (Vec<&str>, Vec<&str>) {
        let mut include = Vec::new();
        let mut omit = Vec::new();
        for slot in &self.slots {
            let name = slot.name.trim();
            if name.is_empty() {
                continue;
            }
            match slot.kind {
                FinderKind::Include => include.push(name),
                FinderKind::Omit => omit.push(name),
            }
        }
        (include, omit)
    }

    /// Whether no slot names a player.
    pub fn is_empty(&self) -> bool {
        let (include, omit) = self.split();
        include.is_empty() && omit.is_empty()
    }

    pub fn run<'a>(&self, records: &'a [LineupRecord]) -> Vec<&'a LineupRecord> {
        let (include, omit) = self.split();
        find_lineups(records, &include, &omit)
    }
}

// ---------------------------------------------------------------------------
// Season totals
// ---------------------------------------------------------------------------

/// Sum per-category rows across every game of a season.
///
/// `games[g][c]` is game `g`'s record for category `c`. The output holds one
/// cumulative record per category index, named after the first record seen
/// for that category.
///
/// Rows are matched by position, so each game's rows must be dense and in
/// category order. A game may stop early (trailing categories it never
/// played add nothing), but a category missing in the middle must be filled
/// with an all-zero record or the later categories shift into its slot.
pub fn aggregate_season_totals(games: &[Vec<LineupRecord>]) -> Vec<LineupRecord> {
    let mut totals: Vec<LineupRecord> = Vec::new();
    for game in games {
        for (category, record) in game.iter().enumerate() {
            match totals.get_mut(category) {
                Some(acc) => acc.combine(record),
                None => totals.push(LineupRecord::from_counts(
                    record.players.clone(),
                    record,
                )),
            }
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
