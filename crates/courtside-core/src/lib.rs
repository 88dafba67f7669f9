// Lineup statistics engine: box-score counts, derived basketball metrics,
// and on/off and finder queries over a season's lineup tables.

pub mod finder;
pub mod lineup;
pub mod report;
pub mod season;

pub use finder::{
    aggregate_season_totals, combine_lineups_for_player, find_lineups, has_player, total,
    FinderKind, FinderPlayer, FinderQuery, Side,
};
pub use lineup::{LineupRecord, TotalShots};
pub use report::{PlayerReport, ReportRow, ReportStat};
pub use season::{CategoryData, Gender, Group, Season, SeasonError, YearlyTotals};
