// Team batting compared against the league for one season.
//
// Works from raw batting rows rather than the joined population, so players
// without a salary still count toward their team's line.

use crate::data::records::{BattingRow, YearKeyed};
use serde::Serialize;

/// Totals of the counting stats that feed OBP and slugging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BattingTotals {
    pub ab: u64,
    pub h: u64,
    pub bb: u64,
    pub hbp: u64,
    pub sf: u64,
    /// `H - 2B - 3B - HR` summed per row; negative when a row's extra-base
    /// hits exceed its hits.
    pub singles: i64,
    pub doubles: u64,
    pub triples: u64,
    pub hr: u64,
}

impl BattingTotals {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a BattingRow>) -> Self {
        let mut totals = BattingTotals::default();
        for row in rows {
            totals.ab += u64::from(row.ab);
            totals.h += u64::from(row.h);
            totals.bb += u64::from(row.bb);
            totals.hbp += u64::from(row.hbp);
            totals.sf += u64::from(row.sf);
            totals.singles += i64::from(row.h)
                - i64::from(row.double)
                - i64::from(row.triple)
                - i64::from(row.hr);
            totals.doubles += u64::from(row.double);
            totals.triples += u64::from(row.triple);
            totals.hr += u64::from(row.hr);
        }
        totals
    }

    /// `(H + BB + HBP) / (AB + BB + HBP + SF)`, 0 with no plate appearances.
    pub fn on_base_percentage(&self) -> f64 {
        let denominator = self.ab + self.bb + self.hbp + self.sf;
        if denominator == 0 {
            return 0.0;
        }
        (self.h + self.bb + self.hbp) as f64 / denominator as f64
    }

    /// `(1B + 2*2B + 3*3B + 4*HR) / AB`, 0 with no at-bats.
    pub fn slugging(&self) -> f64 {
        if self.ab == 0 {
            return 0.0;
        }
        let total_bases = self.singles as f64
            + 2.0 * self.doubles as f64
            + 3.0 * self.triples as f64
            + 4.0 * self.hr as f64;
        total_bases / self.ab as f64
    }
}

/// OBP and slugging over a set of rows. `games` is the number of batting
/// rows summed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingLine {
    pub obp: f64,
    pub slg: f64,
    pub games: usize,
}

impl BattingLine {
    fn from_rows(rows: &[&BattingRow]) -> Self {
        let totals = BattingTotals::from_rows(rows.iter().copied());
        BattingLine {
            obp: totals.on_base_percentage(),
            slg: totals.slugging(),
            games: rows.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamBattingComparison {
    pub team_id: String,
    pub year: i32,
    pub team: BattingLine,
    pub league: BattingLine,
}

/// The team's batting line next to the whole league's for `year`.
///
/// `None` when the team has no batting rows that year (which also covers a
/// year the league has no rows for).
pub fn compare_team_batting(
    batting: &[BattingRow],
    team_id: &str,
    year: i32,
) -> Option<TeamBattingComparison> {
    let league_rows: Vec<&BattingRow> = batting.iter().filter(|r| r.in_year(year)).collect();
    let team_rows: Vec<&BattingRow> = league_rows
        .iter()
        .copied()
        .filter(|r| r.team_id == team_id)
        .collect();
    if team_rows.is_empty() {
        return None;
    }

    Some(TeamBattingComparison {
        team_id: team_id.to_string(),
        year,
        team: BattingLine::from_rows(&team_rows),
        league: BattingLine::from_rows(&league_rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn line(team: &str, year: i32, ab: u32, h: u32, double: u32, hr: u32, bb: u32) -> BattingRow {
        BattingRow {
            ab,
            bb,
            hr,
            ..BattingRow::new("p", team, year, h, double)
        }
    }

    #[test]
    fn obp_and_slugging_formulas() {
        let mut row = line("OAK", 2004, 545, 150, 30, 32, 64);
        row.triple = 1;
        row.hbp = 3;
        row.sf = 5;
        let totals = BattingTotals::from_rows([&row]);
        assert_eq!(totals.singles, 87);
        assert!(approx_eq(totals.on_base_percentage(), 217.0 / 617.0, 1e-12));
        // 87 + 60 + 3 + 128 = 278 total bases
        assert!(approx_eq(totals.slugging(), 278.0 / 545.0, 1e-12));
    }

    #[test]
    fn zero_denominators_give_zero() {
        let totals = BattingTotals::default();
        assert_eq!(totals.on_base_percentage(), 0.0);
        assert_eq!(totals.slugging(), 0.0);
    }

    #[test]
    fn team_against_league() {
        let batting = vec![
            line("OAK", 2004, 100, 30, 5, 5, 10),
            line("OAK", 2004, 100, 20, 0, 0, 0),
            line("NYA", 2004, 200, 60, 10, 10, 20),
            line("OAK", 2003, 500, 500, 0, 0, 0),
        ];
        let cmp = compare_team_batting(&batting, "OAK", 2004).unwrap();
        assert_eq!(cmp.team_id, "OAK");
        assert_eq!(cmp.team.games, 2);
        assert_eq!(cmp.league.games, 3);
        assert!(approx_eq(cmp.team.obp, 60.0 / 210.0, 1e-12));
        assert!(approx_eq(cmp.league.obp, 140.0 / 430.0, 1e-12));
        // team: singles 20 + 20, doubles 5, hr 5 -> 40 + 10 + 20 = 70 over 200
        assert!(approx_eq(cmp.team.slg, 70.0 / 200.0, 1e-12));
    }

    #[test]
    fn unknown_team_or_year_is_none() {
        let batting = vec![line("OAK", 2004, 100, 30, 5, 5, 10)];
        assert!(compare_team_batting(&batting, "NYA", 2004).is_none());
        assert!(compare_team_batting(&batting, "OAK", 2099).is_none());
    }
}
