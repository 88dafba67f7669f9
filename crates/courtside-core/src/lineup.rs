// Lineup box-score counts and the advanced metrics derived from them.

use serde::{Deserialize, Serialize};

/// Weight applied to free-throw attempts in the possession estimate.
pub const FTA_POSSESSION_WEIGHT: f64 = 0.44;

/// Number of integer counting stats carried by a `LineupRecord`.
pub const COUNT_FIELDS: usize = 24;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Accumulated box-score counts for a group of players sharing the court.
///
/// A record is either one lineup's totals for a game category, one player's
/// totals, or a synthetic aggregate built with [`LineupRecord::combine`]
/// (on-court, off-court, season totals). Every metric is recomputed from the
/// current counts on each call.
///
/// Keys in the raw data are camelCase (`pointsFor`, `dRebFor`, `ftaAgainst`);
/// any missing key reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineupRecord {
    /// Delimited player combination (`A|B|C` or `A\B\C`) or a single name.
    pub players: String,
    /// Playing time in seconds.
    pub time: f64,

    pub points_for: i64,
    pub points_against: i64,
    pub d_reb_for: i64,
    pub d_reb_against: i64,
    pub o_reb_for: i64,
    pub o_reb_against: i64,
    pub made_twos_for: i64,
    pub attempted_twos_for: i64,
    pub made_twos_against: i64,
    pub attempted_twos_against: i64,
    pub made_threes_for: i64,
    pub attempted_threes_for: i64,
    pub made_threes_against: i64,
    pub attempted_threes_against: i64,
    pub paint_for: i64,
    pub paint_against: i64,
    pub second_for: i64,
    pub second_against: i64,
    pub turnovers_for: i64,
    pub turnovers_against: i64,
    pub assists_for: i64,
    pub assists_against: i64,
    pub fta_for: i64,
    pub fta_against: i64,
}

/// Field-goal totals (twos plus threes) for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalShots {
    pub attempted_for: i64,
    pub attempted_against: i64,
    pub made_for: i64,
    pub made_against: i64,
}

impl TotalShots {
    /// Missed field goals by the team.
    pub fn missed_for(&self) -> i64 {
        self.attempted_for - self.made_for
    }

    /// Missed field goals by the opponent.
    pub fn missed_against(&self) -> i64 {
        self.attempted_against - self.made_against
    }
}

// ---------------------------------------------------------------------------
// Construction and merging
// ---------------------------------------------------------------------------

impl LineupRecord {
    /// An all-zero record with the given identity (`"on"`, `"off"`, a season
    /// key, ...).
    pub fn new(players: impl Into<String>) -> Self {
        LineupRecord {
            players: players.into(),
            ..Default::default()
        }
    }

    /// Copy the counts of `counts` under a new identity. Counts are taken
    /// as-is: negative values and `attempted < made` are not rejected.
    pub fn from_counts(players: impl Into<String>, counts: &LineupRecord) -> Self {
        LineupRecord {
            players: players.into(),
            ..counts.clone()
        }
    }

    /// Add every numeric field of `other` into `self`.
    ///
    /// `players` is left untouched; `other` is only read.
    pub fn combine(&mut self, other: &LineupRecord) {
        self.time += other.time;
        self.points_for += other.points_for;
        self.points_against += other.points_against;
        self.d_reb_for += other.d_reb_for;
        self.d_reb_against += other.d_reb_against;
        self.o_reb_for += other.o_reb_for;
        self.o_reb_against += other.o_reb_against;
        self.made_twos_for += other.made_twos_for;
        self.attempted_twos_for += other.attempted_twos_for;
        self.made_twos_against += other.made_twos_against;
        self.attempted_twos_against += other.attempted_twos_against;
        self.made_threes_for += other.made_threes_for;
        self.attempted_threes_for += other.attempted_threes_for;
        self.made_threes_against += other.made_threes_against;
        self.attempted_threes_against += other.attempted_threes_against;
        self.paint_for += other.paint_for;
        self.paint_against += other.paint_against;
        self.second_for += other.second_for;
        self.second_against += other.second_against;
        self.turnovers_for += other.turnovers_for;
        self.turnovers_against += other.turnovers_against;
        self.assists_for += other.assists_for;
        self.assists_against += other.assists_against;
        self.fta_for += other.fta_for;
        self.fta_against += other.fta_against;
    }

    /// Every integer count, in declaration order. `time` is not included.
    pub fn counts(&self) -> [i64; COUNT_FIELDS] {
        [
            self.points_for,
            self.points_against,
            self.d_reb_for,
            self.d_reb_against,
            self.o_reb_for,
            self.o_reb_against,
            self.made_twos_for,
            self.attempted_twos_for,
            self.made_twos_against,
            self.attempted_twos_against,
            self.made_threes_for,
            self.attempted_threes_for,
            self.made_threes_against,
            self.attempted_threes_against,
            self.paint_for,
            self.paint_against,
            self.second_for,
            self.second_against,
            self.turnovers_for,
            self.turnovers_against,
            self.assists_for,
            self.assists_against,
            self.fta_for,
            self.fta_against,
        ]
    }
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

fn ratio(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator
}

/// Ratio that reads as 0 when there was no opportunity at all.
fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn net(for_: i64, against: i64) -> i64 {
    for_ - against
}

impl LineupRecord {
    pub fn total_shots(&self) -> TotalShots {
        TotalShots {
            attempted_for: self.attempted_threes_for + self.attempted_twos_for,
            attempted_against: self.attempted_threes_against + self.attempted_twos_against,
            made_for: self.made_twos_for + self.made_threes_for,
            made_against: self.made_twos_against + self.made_threes_against,
        }
    }

    pub fn fg_percent_for(&self) -> f64 {
        let shots = self.total_shots();
        ratio(shots.made_for as f64, shots.attempted_for as f64)
    }

    pub fn fg_percent_against(&self) -> f64 {
        let shots = self.total_shots();
        ratio(shots.made_against as f64, shots.attempted_against as f64)
    }

    pub fn two_percent_for(&self) -> f64 {
        ratio(self.made_twos_for as f64, self.attempted_twos_for as f64)
    }

    pub fn two_percent_against(&self) -> f64 {
        ratio(
            self.made_twos_against as f64,
            self.attempted_twos_against as f64,
        )
    }

    pub fn three_percent_for(&self) -> f64 {
        ratio(
            self.made_threes_for as f64,
            self.attempted_threes_for as f64,
        )
    }

    pub fn three_percent_against(&self) -> f64 {
        ratio(
            self.made_threes_against as f64,
            self.attempted_threes_against as f64,
        )
    }

    // -- For minus Against --

    pub fn net_points(&self) -> i64 {
        net(self.points_for, self.points_against)
    }

    pub fn net_o_rebounds(&self) -> i64 {
        net(self.o_reb_for, self.o_reb_against)
    }

    pub fn net_d_rebounds(&self) -> i64 {
        net(self.d_reb_for, self.d_reb_against)
    }

    pub fn net_paint(&self) -> i64 {
        net(self.paint_for, self.paint_against)
    }

    pub fn net_second(&self) -> i64 {
        net(self.second_for, self.second_against)
    }

    pub fn net_assists(&self) -> i64 {
        net(self.assists_for, self.assists_against)
    }

    pub fn net_turnovers(&self) -> i64 {
        net(self.turnovers_for, self.turnovers_against)
    }

    pub fn net_attempted_twos(&self) -> i64 {
        net(self.attempted_twos_for, self.attempted_twos_against)
    }

    pub fn net_made_twos(&self) -> i64 {
        net(self.made_twos_for, self.made_twos_against)
    }

    pub fn net_attempted_threes(&self) -> i64 {
        net(self.attempted_threes_for, self.attempted_threes_against)
    }

    pub fn net_made_threes(&self) -> i64 {
        net(self.made_threes_for, self.made_threes_against)
    }

    /// Possessions estimated as `FGA - OREB + TO + 0.44 * FTA` for each side,
    /// averaged because a lineup can change between the two halves of a
    /// trip down the floor.
    pub fn possessions(&self) -> f64 {
        let shots = self.total_shots();
        let poss_for = shots.attempted_for as f64 - self.o_reb_for as f64
            + self.turnovers_for as f64
            + FTA_POSSESSION_WEIGHT * self.fta_for as f64;
        let poss_against = shots.attempted_against as f64 - self.o_reb_against as f64
            + self.turnovers_against as f64
            + FTA_POSSESSION_WEIGHT * self.fta_against as f64;
        (poss_for + poss_against) / 2.0
    }

    /// Points scored per 100 possessions.
    pub fn o_rating(&self) -> f64 {
        ratio(self.points_for as f64, self.possessions()) * 100.0
    }

    /// Points allowed per 100 possessions.
    pub fn d_rating(&self) -> f64 {
        ratio(self.points_against as f64, self.possessions()) * 100.0
    }

    pub fn net_rating(&self) -> f64 {
        self.o_rating() - self.d_rating()
    }

    /// Share of the team's field-goal attempts taken from three.
    pub fn three_ar_for(&self) -> f64 {
        let shots = self.total_shots();
        ratio(
            self.attempted_threes_for as f64,
            shots.attempted_for as f64,
        )
    }

    /// Share of the opponent's field-goal attempts taken from three.
    pub fn three_ar_against(&self) -> f64 {
        let shots = self.total_shots();
        ratio(
            self.attempted_threes_against as f64,
            shots.attempted_against as f64,
        )
    }

    pub fn assists_per_poss(&self) -> f64 {
        ratio(self.assists_for as f64, self.possessions())
    }

    pub fn turnovers_per_poss(&self) -> f64 {
        ratio(self.turnovers_for as f64, self.possessions())
    }

    /// Effective field-goal percentage; made threes count 1.5 times.
    pub fn efg_for(&self) -> f64 {
        let shots = self.total_shots();
        ratio(
            shots.made_for as f64 + 0.5 * self.made_threes_for as f64,
            shots.attempted_for as f64,
        )
    }

    pub fn efg_against(&self) -> f64 {
        let shots = self.total_shots();
        ratio(
            shots.made_against as f64 + 0.5 * self.made_threes_against as f64,
            shots.attempted_against as f64,
        )
    }

    /// Share of the team's missed shots it rebounded.
    pub fn o_reb_percent(&self) -> f64 {
        let missed = self.total_shots().missed_for();
        guarded_ratio(self.o_reb_for as f64, missed as f64)
    }

    /// Team defensive rebounds over the opponent's missed shots.
    pub fn d_reb_percent(&self) -> f64 {
        let missed = self.total_shots().missed_against();
        guarded_ratio(self.d_reb_for as f64, missed as f64)
    }

    /// Team rebounds over every missed shot on the floor.
    pub fn total_reb_percent(&self) -> f64 {
        let shots = self.total_shots();
        let possible = shots.missed_against() + shots.missed_for();
        let rebounds = self.o_reb_for as f64 + self.d_reb_for as f64;
        guarded_ratio(rebounds, possible as f64)
    }

    pub fn assist_per_fg(&self) -> f64 {
        guarded_ratio(
            self.assists_for as f64,
            self.total_shots().made_for as f64,
        )
    }

    pub fn assist_turnover_ratio(&self) -> f64 {
        guarded_ratio(self.assists_for as f64, self.turnovers_for as f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn sample() -> LineupRecord {
        LineupRecord {
            players: "A|B|C|D|E".into(),
            time: 600.0,
            points_for: 30,
            points_against: 24,
            d_reb_for: 9,
            d_reb_against: 7,
            o_reb_for: 4,
            o_reb_against: 3,
            made_twos_for: 9,
            attempted_twos_for: 16,
            made_twos_against: 7,
            attempted_twos_against: 15,
            made_threes_for: 3,
            attempted_threes_for: 8,
            made_threes_against: 2,
            attempted_threes_against: 9,
            paint_for: 12,
            paint_against: 10,
            second_for: 5,
            second_against: 2,
            turnovers_for: 3,
            turnovers_against: 5,
            assists_for: 8,
            assists_against: 6,
            fta_for: 5,
            fta_against: 6,
        }
    }

    // -- Shot totals and shooting percentages --

    #[test]
    fn total_shots_sums_twos_and_threes() {
        let shots = sample().total_shots();
        assert_eq!(shots.attempted_for, 24);
        assert_eq!(shots.made_for, 12);
        assert_eq!(shots.attempted_against, 24);
        assert_eq!(shots.made_against, 9);
        assert_eq!(shots.missed_for(), 12);
        assert_eq!(shots.missed_against(), 15);
    }

    #[test]
    fn shooting_percentages() {
        let r = sample();
        assert!(approx_eq(r.fg_percent_for(), 0.5, 1e-12));
        assert!(approx_eq(r.fg_percent_against(), 9.0 / 24.0, 1e-12));
        assert!(approx_eq(r.two_percent_for(), 9.0 / 16.0, 1e-12));
        assert!(approx_eq(r.three_percent_against(), 2.0 / 9.0, 1e-12));
        // (12 + 0.5 * 3) / 24
        assert!(approx_eq(r.efg_for(), 13.5 / 24.0, 1e-12));
        // (9 + 0.5 * 2) / 24
        assert!(approx_eq(r.efg_against(), 10.0 / 24.0, 1e-12));
    }

    #[test]
    fn three_attempt_rates_use_own_side() {
        let r = sample();
        assert!(approx_eq(r.three_ar_for(), 8.0 / 24.0, 1e-12));
        assert!(approx_eq(r.three_ar_against(), 9.0 / 24.0, 1e-12));
    }

    // -- Net values may go negative --

    #[test]
    fn net_values_are_signed() {
        let r = sample();
        assert_eq!(r.net_points(), 6);
        assert_eq!(r.net_turnovers(), -2);
        assert_eq!(r.net_o_rebounds(), 1);
        assert_eq!(r.net_d_rebounds(), 2);
        assert_eq!(r.net_paint(), 2);
        assert_eq!(r.net_second(), 3);
        assert_eq!(r.net_assists(), 2);
        assert_eq!(r.net_made_twos(), 2);
        assert_eq!(r.net_attempted_twos(), 1);
        assert_eq!(r.net_made_threes(), 1);
        assert_eq!(r.net_attempted_threes(), -1);
    }

    // -- Possessions and ratings --

    #[test]
    fn possessions_average_both_estimates() {
        let r = LineupRecord {
            attempted_twos_for: 50,
            attempted_threes_for: 20,
            o_reb_for: 10,
            turnovers_for: 12,
            fta_for: 20,
            attempted_twos_against: 45,
            attempted_threes_against: 20,
            o_reb_against: 8,
            turnovers_against: 10,
            fta_against: 15,
            ..LineupRecord::new("test")
        };
        // for: 70 - 10 + 12 + 8.8 = 80.8, against: 65 - 8 + 10 + 6.6 = 73.6
        assert!(approx_eq(r.possessions(), 77.2, 1e-9));
    }

    #[test]
    fn ratings_per_hundred_possessions() {
        let r = sample();
        // for: 24 - 4 + 3 + 2.2 = 25.2, against: 24 - 3 + 5 + 2.64 = 28.64
        let poss = (25.2 + 28.64) / 2.0;
        assert!(approx_eq(r.possessions(), poss, 1e-9));
        assert!(approx_eq(r.o_rating(), 30.0 / poss * 100.0, 1e-9));
        assert!(approx_eq(r.d_rating(), 24.0 / poss * 100.0, 1e-9));
        assert!(approx_eq(r.net_rating(), 6.0 / poss * 100.0, 1e-9));
        assert!(approx_eq(r.assists_per_poss(), 8.0 / poss, 1e-9));
        assert!(approx_eq(r.turnovers_per_poss(), 3.0 / poss, 1e-9));
    }

    #[test]
    fn ratings_are_nan_without_possessions() {
        let r = LineupRecord::new("empty");
        assert_eq!(r.possessions(), 0.0);
        assert!(r.o_rating().is_nan());
        assert!(r.d_rating().is_nan());
        assert!(r.net_rating().is_nan());
        assert!(r.fg_percent_for().is_nan());
        assert!(r.efg_for().is_nan());
        assert!(r.assists_per_poss().is_nan());
    }

    // -- Zero-guarded percentages --

    #[test]
    fn guarded_metrics_are_zero_without_opportunities() {
        let r = LineupRecord {
            o_reb_for: 2,
            d_reb_for: 3,
            assists_for: 4,
            ..LineupRecord::new("no shots")
        };
        assert_eq!(r.o_reb_percent(), 0.0);
        assert_eq!(r.d_reb_percent(), 0.0);
        assert_eq!(r.total_reb_percent(), 0.0);
        assert_eq!(r.assist_per_fg(), 0.0);
        assert_eq!(r.assist_turnover_ratio(), 0.0);
    }

    #[test]
    fn rebound_percentages() {
        let r = sample();
        assert!(approx_eq(r.o_reb_percent(), 4.0 / 12.0, 1e-12));
        // Team defensive rebounds over opponent misses.
        assert!(approx_eq(r.d_reb_percent(), 9.0 / 15.0, 1e-12));
        assert!(approx_eq(r.total_reb_percent(), 13.0 / 27.0, 1e-12));
    }

    #[test]
    fn assist_ratios() {
        let r = sample();
        assert!(approx_eq(r.assist_per_fg(), 8.0 / 12.0, 1e-12));
        assert!(approx_eq(r.assist_turnover_ratio(), 8.0 / 3.0, 1e-12));
    }

    // -- Combine --

    #[test]
    fn combine_adds_every_count_and_keeps_identity() {
        let mut acc = LineupRecord::new("on");
        let a = sample();
        acc.combine(&a);
        acc.combine(&a);

        assert_eq!(acc.players, "on");
        assert!(approx_eq(acc.time, 1200.0, 1e-9));
        for (got, want) in acc.counts().iter().zip(a.counts().iter()) {
            assert_eq!(*got, want * 2);
        }
        // Contributor untouched.
        assert_eq!(a, sample());
    }

    #[test]
    fn metrics_follow_counts_after_combine() {
        let mut acc = LineupRecord::new("on");
        assert!(acc.o_rating().is_nan());
        acc.combine(&sample());
        assert!(acc.o_rating().is_finite());
        assert!(approx_eq(acc.o_rating(), sample().o_rating(), 1e-9));
    }

    #[test]
    fn from_counts_overrides_identity() {
        let r = LineupRecord::from_counts("2023-24", &sample());
        assert_eq!(r.players, "2023-24");
        assert_eq!(r.counts(), sample().counts());
    }

    // -- Deserialization from raw counts --

    #[test]
    fn deserializes_camel_case_counts_with_defaults() {
        let json = r#"{
            "players": "A|B",
            "time": 95.5,
            "pointsFor": 10,
            "dRebFor": 3,
            "oRebAgainst": 2,
            "madeTwosFor": 4,
            "attemptedTwosFor": 8,
            "ftaAgainst": 5
        }"#;
        let r: LineupRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.players, "A|B");
        assert!(approx_eq(r.time, 95.5, 1e-12));
        assert_eq!(r.points_for, 10);
        assert_eq!(r.d_reb_for, 3);
        assert_eq!(r.o_reb_against, 2);
        assert_eq!(r.made_twos_for, 4);
        assert_eq!(r.attempted_twos_for, 8);
        assert_eq!(r.fta_against, 5);
        assert_eq!(r.points_against, 0);
        assert_eq!(r.assists_for, 0);
    }

    #[test]
    fn negative_counts_are_kept_and_combined() {
        let json = r#"{"players": "A|C", "time": 50, "pointsFor": 4, "turnoversFor": -1}"#;
        let r: LineupRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.turnovers_for, -1);

        let mut acc = LineupRecord {
            turnovers_for: 3,
            ..LineupRecord::new("on")
        };
        acc.combine(&r);
        assert_eq!(acc.turnovers_for, 2);
        assert_eq!(acc.points_for, 4);
        assert_eq!(acc.net_turnovers(), 2);
    }

    #[test]
    fn combine_does_not_overflow_large_counts() {
        let big = LineupRecord {
            points_for: i64::from(u32::MAX),
            attempted_twos_for: i64::from(u32::MAX),
            attempted_threes_for: i64::from(u32::MAX),
            ..LineupRecord::new("big")
        };
        let mut acc = big.clone();
        acc.combine(&big);
        assert_eq!(acc.points_for, 2 * i64::from(u32::MAX));
        assert_eq!(acc.total_shots().attempted_for, 4 * i64::from(u32::MAX));
    }
}
