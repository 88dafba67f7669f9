// On/off player report: team performance with a player on the court versus
// on the bench for one category.

use crate::finder::{combine_lineups_for_player, Side};
use crate::lineup::LineupRecord;
use crate::season::CategoryData;

/// Stats shown in a player report, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStat {
    ORating,
    DRating,
    EffectiveFg,
    ReboundPercent,
    AssistPercent,
    NetPoints,
    Possessions,
}

impl ReportStat {
    pub const ALL: [ReportStat; 7] = [
        ReportStat::ORating,
        ReportStat::DRating,
        ReportStat::EffectiveFg,
        ReportStat::ReboundPercent,
        ReportStat::AssistPercent,
        ReportStat::NetPoints,
        ReportStat::Possessions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportStat::ORating => "O Rtg",
            ReportStat::DRating => "D Rtg",
            ReportStat::EffectiveFg => "eFG%",
            ReportStat::ReboundPercent => "Reb%",
            ReportStat::AssistPercent => "AST %",
            ReportStat::NetPoints => "Net +/-",
            ReportStat::Possessions => "Poss",
        }
    }

    /// Whether a lower value is the better one.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, ReportStat::DRating)
    }

    /// Percentages are reported on a 0-100 scale.
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            ReportStat::EffectiveFg | ReportStat::ReboundPercent | ReportStat::AssistPercent
        )
    }

    /// Read this stat from a record.
    ///
    /// AST% is assisted field goals over made field goals and, unlike
    /// `assist_per_fg`, is not zero-guarded.
    pub fn value(&self, record: &LineupRecord) -> f64 {
        match self {
            ReportStat::ORating => record.o_rating(),
            ReportStat::DRating => record.d_rating(),
            ReportStat::EffectiveFg => record.efg_for() * 100.0,
            ReportStat::ReboundPercent => record.total_reb_percent() * 100.0,
            ReportStat::AssistPercent => {
                record.assists_for as f64 * 100.0 / record.total_shots().made_for as f64
            }
            ReportStat::NetPoints => record.net_points() as f64,
            ReportStat::Possessions => record.possessions(),
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow {
    pub stat: ReportStat,
    pub on: f64,
    pub off: f64,
    pub diff: f64,
    /// `Some(true)` when the on-court value is the better one; `None` when
    /// either side is zero or not a number.
    pub favorable: Option<bool>,
}

/// On/off comparison for one player in one category.
#[derive(Debug, Clone)]
pub struct PlayerReport {
    pub player: String,
    pub category: String,
    pub on: LineupRecord,
    pub off: LineupRecord,
}

fn is_set(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

impl PlayerReport {
    pub fn build(category: &CategoryData, player: &str) -> Self {
        PlayerReport {
            player: player.to_string(),
            category: category.game.clone(),
            on: combine_lineups_for_player(&category.lineups, player, Side::On),
            off: combine_lineups_for_player(&category.lineups, player, Side::Off),
        }
    }

    pub fn row(&self, stat: ReportStat) -> ReportRow {
        let on = stat.value(&self.on);
        let off = stat.value(&self.off);
        let favorable = if is_set(on) && is_set(off) {
            Some(if stat.lower_is_better() { off > on } else { on > off })
        } else {
            None
        };
        ReportRow {
            stat,
            on,
            off,
            diff: on - off,
            favorable,
        }
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        ReportStat::ALL.iter().map(|&stat| self.row(stat)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
