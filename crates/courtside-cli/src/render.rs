// Plain-text rendering of lineup tables and player reports.

use courtside_core::finder::player_names;
use courtside_core::{total, LineupRecord, PlayerReport, ReportStat};

/// Column set for the lineups table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatView {
    #[default]
    Total,
    Net,
    Advanced,
    Shooting,
}

type Cell = fn(&LineupRecord) -> String;

fn col(name: &'static str, cell: Cell) -> (&'static str, Cell) {
    (name, cell)
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Playing time as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "-".into();
    }
    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Signed value with at most one decimal (`+3.5`, `-2`, `+0`).
pub fn format_signed(value: f64) -> String {
    if !value.is_finite() {
        return "-".into();
    }
    let rounded = (value * 10.0).round() / 10.0;
    let sign = if rounded < 0.0 { "-" } else { "+" };
    let magnitude = rounded.abs();
    if magnitude.fract() == 0.0 {
        format!("{sign}{magnitude:.0}")
    } else {
        format!("{sign}{magnitude:.1}")
    }
}

/// Value with one fixed decimal; `-` when not a number.
pub fn format_fixed(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}")
    } else {
        "-".into()
    }
}

/// A 0-1 ratio as a percentage with one decimal.
pub fn format_percent(ratio: f64) -> String {
    format_fixed(ratio * 100.0)
}

fn format_ratio(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "-".into()
    }
}

/// Lineup key for display: names separated by commas.
pub fn display_players(players: &str) -> String {
    player_names(players).collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// Lineup tables
// ---------------------------------------------------------------------------

fn columns(view: StatView) -> Vec<(&'static str, Cell)> {
    let time = col("Time", |r| format_time(r.time));
    match view {
        StatView::Total => vec![
            time,
            col("Pts", |r| r.points_for.to_string()),
            col("Opp", |r| r.points_against.to_string()),
            col("DRb", |r| r.d_reb_for.to_string()),
            col("ORb", |r| r.o_reb_for.to_string()),
            col("FGM", |r| r.total_shots().made_for.to_string()),
            col("FGA", |r| r.total_shots().attempted_for.to_string()),
            col("3PM", |r| r.made_threes_for.to_string()),
            col("3PA", |r| r.attempted_threes_for.to_string()),
            col("Pnt", |r| r.paint_for.to_string()),
            col("2nd", |r| r.second_for.to_string()),
            col("Ast", |r| r.assists_for.to_string()),
            col("TO", |r| r.turnovers_for.to_string()),
        ],
        StatView::Net => vec![
            time,
            col("Pts", |r| format_signed(r.net_points() as f64)),
            col("DRb", |r| format_signed(r.net_d_rebounds() as f64)),
            col("ORb", |r| format_signed(r.net_o_rebounds() as f64)),
            col("2PM", |r| format_signed(r.net_made_twos() as f64)),
            col("2PA", |r| format_signed(r.net_attempted_twos() as f64)),
            col("3PM", |r| format_signed(r.net_made_threes() as f64)),
            col("3PA", |r| format_signed(r.net_attempted_threes() as f64)),
            col("Pnt", |r| format_signed(r.net_paint() as f64)),
            col("2nd", |r| format_signed(r.net_second() as f64)),
            col("Ast", |r| format_signed(r.net_assists() as f64)),
            col("TO", |r| format_signed(r.net_turnovers() as f64)),
        ],
        StatView::Advanced => vec![
            time,
            col("Poss", |r| format!("{:.0}", r.possessions())),
            col("ORtg", |r| format_fixed(r.o_rating())),
            col("DRtg", |r| format_fixed(r.d_rating())),
            col("Net", |r| format_signed(r.net_rating())),
            col("ORb%", |r| format_percent(r.o_reb_percent())),
            col("DRb%", |r| format_percent(r.d_reb_percent())),
            col("Reb%", |r| format_percent(r.total_reb_percent())),
            col("Ast/FG", |r| format_percent(r.assist_per_fg())),
            col("A/TO", |r| format_ratio(r.assist_turnover_ratio())),
            col("Ast/Poss", |r| format_ratio(r.assists_per_poss())),
            col("TO/Poss", |r| format_ratio(r.turnovers_per_poss())),
        ],
        StatView::Shooting => vec![
            time,
            col("FG%", |r| format_percent(r.fg_percent_for())),
            col("2P%", |r| format_percent(r.two_percent_for())),
            col("3P%", |r| format_percent(r.three_percent_for())),
            col("eFG%", |r| format_percent(r.efg_for())),
            col("3PAr", |r| format_percent(r.three_ar_for())),
            col("oFG%", |r| format_percent(r.fg_percent_against())),
            col("o2P%", |r| format_percent(r.two_percent_against())),
            col("o3P%", |r| format_percent(r.three_percent_against())),
            col("oeFG%", |r| format_percent(r.efg_against())),
            col("o3PAr", |r| format_percent(r.three_ar_against())),
        ],
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i == 0 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Render records as a table with a totals footer over every record passed
/// in, including rows beyond `max_rows`.
pub fn render_table(records: &[&LineupRecord], view: StatView, max_rows: usize) -> String {
    let cols = columns(view);
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut header = vec!["Lineup".to_string()];
    header.extend(cols.iter().map(|(name, _)| name.to_string()));
    rows.push(header);

    for record in records.iter().take(max_rows) {
        let mut row = vec![display_players(&record.players)];
        row.extend(cols.iter().map(|(_, cell)| cell(record)));
        rows.push(row);
    }

    let totals = total(records.iter().copied());
    let mut footer = vec![format!("Total ({} lineups)", records.len())];
    footer.extend(cols.iter().map(|(_, cell)| cell(&totals)));
    rows.push(footer);

    let mut widths = vec![0usize; cols.len() + 1];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if records.len() > max_rows {
        out.push_str(&format!("({} more not shown)\n", records.len() - max_rows));
    }
    out
}

// ---------------------------------------------------------------------------
// Player report
// ---------------------------------------------------------------------------

fn report_cells(stat: ReportStat, on: f64, off: f64, diff: f64) -> [String; 3] {
    match stat {
        ReportStat::ORating
        | ReportStat::DRating
        | ReportStat::EffectiveFg
        | ReportStat::ReboundPercent
        | ReportStat::AssistPercent => [format_fixed(on), format_fixed(off), format_signed(diff)],
        ReportStat::NetPoints => [format_signed(on), format_signed(off), format_signed(diff)],
        ReportStat::Possessions => [
            format!("{:.0}", on.round()),
            format!("{:.0}", off.round()),
            format_signed(diff.round()),
        ],
    }
}

/// Render the on/off table: `Stat  Court  Bench  Diff`, with `▲` / `▼`
/// marking whether the player's side is the better one.
pub fn render_report(report: &PlayerReport) -> String {
    let mut out = format!("Player Report: {} ({})\n", report.player, report.category);
    let widths = [8, 8, 8, 8];
    push_row(
        &mut out,
        &[
            "Stat".to_string(),
            "Court".to_string(),
            "Bench".to_string(),
            "Diff".to_string(),
        ],
        &widths,
    );
    for row in report.rows() {
        let [on, off, diff] = report_cells(row.stat, row.on, row.off, row.diff);
        let marker = match row.favorable {
            Some(true) => " ▲",
            Some(false) => " ▼",
            None => "",
        };
        let diff = format!("{diff}{marker}");
        push_row(&mut out, &[row.stat.label().to_string(), on, off, diff], &widths);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::CategoryData;

    #[test]
    fn time_as_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(59.6), "1:00");
        assert_eq!(format_time(1860.0), "31:00");
        assert_eq!(format_time(f64::NAN), "-");
    }

    #[test]
    fn signed_values_always_carry_a_sign() {
        assert_eq!(format_signed(3.46), "+3.5");
        assert_eq!(format_signed(-2.0), "-2");
        assert_eq!(format_signed(0.0), "+0");
        assert_eq!(format_signed(-0.04), "+0");
        assert_eq!(format_signed(f64::NAN), "-");
    }

    #[test]
    fn percent_and_fixed() {
        assert_eq!(format_percent(0.5), "50.0");
        assert_eq!(format_percent(f64::NAN), "-");
        assert_eq!(format_fixed(104.26), "104.3");
    }

    #[test]
    fn players_displayed_with_commas() {
        assert_eq!(display_players("A|B|C"), "A, B, C");
        assert_eq!(display_players("A\\B"), "A, B");
    }

    #[test]
    fn table_has_header_rows_and_totals() {
        let a = LineupRecord {
            time: 120.0,
            points_for: 10,
            ..LineupRecord::new("A|B")
        };
        let b = LineupRecord {
            time: 60.0,
            points_for: 4,
            ..LineupRecord::new("C|D")
        };
        let records = vec![&a, &b];

        let out = render_table(&records, StatView::Total, 1);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Lineup"));
        assert!(lines[1].starts_with("A, B"));
        assert!(lines[2].starts_with("Total (2 lineups)"));
        // Footer totals cover rows past the cap.
        assert!(lines[2].contains("3:00"));
        assert!(lines[2].contains("14"));
        assert_eq!(lines[3], "(1 more not shown)");
    }

    #[test]
    fn empty_table_still_renders_totals() {
        let out = render_table(&[], StatView::Advanced, 10);
        assert!(out.contains("Total (0 lineups)"));
        assert!(out.contains("ORtg"));
    }

    #[test]
    fn report_lists_every_stat() {
        let category = CategoryData {
            game: "Season Totals".into(),
            lineups: vec![
                LineupRecord {
                    points_for: 10,
                    points_against: 4,
                    attempted_twos_for: 10,
                    made_twos_for: 5,
                    attempted_twos_against: 10,
                    ..LineupRecord::new("A|B")
                },
                LineupRecord {
                    points_for: 2,
                    points_against: 6,
                    attempted_twos_for: 8,
                    made_twos_for: 1,
                    attempted_twos_against: 8,
                    ..LineupRecord::new("C|D")
                },
            ],
            ..Default::default()
        };
        let out = render_report(&PlayerReport::build(&category, "A"));
        assert!(out.starts_with("Player Report: A (Season Totals)"));
        for label in ["O Rtg", "D Rtg", "eFG%", "Reb%", "AST %", "Net +/-", "Poss"] {
            assert!(out.contains(label), "missing {label}");
        }
        assert!(out.contains("▲"));
    }
}
