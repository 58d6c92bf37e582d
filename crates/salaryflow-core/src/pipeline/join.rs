// Year filter and batting/salary inner join.
//
// A player enters a year's population only with both a batting line and a
// salary for that year. Everything downstream (percentiles included) sees
// the joined population only.

use crate::config::{PerformanceConfig, SalaryBands};
use crate::data::records::{BattingRow, SalaryRow, YearKeyed};
use crate::pipeline::classify::{categorize_performance, PerformanceCategory, SalaryCategory};
use crate::pipeline::directory::TeamDirectory;
use crate::pipeline::scoring::{weighted_score, PerformanceThresholds};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Joined records
// ---------------------------------------------------------------------------

/// A batting line that found a salary, before the year's thresholds exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedPlayer {
    pub player_id: String,
    pub year: i32,
    pub team_id: String,
    pub team_name: String,
    pub hits: u32,
    pub doubles: u32,
    pub performance_score: f64,
    pub salary: f64,
    pub salary_category: SalaryCategory,
}

impl JoinedPlayer {
    /// Attach a performance category from the year's thresholds.
    pub fn classify(self, thresholds: &PerformanceThresholds) -> PlayerRecord {
        let performance_category = categorize_performance(self.performance_score, thresholds);
        PlayerRecord {
            player_id: self.player_id,
            year: self.year,
            team_id: self.team_id,
            team_name: self.team_name,
            hits: self.hits,
            doubles: self.doubles,
            performance_score: self.performance_score,
            salary: self.salary,
            salary_category: self.salary_category,
            performance_category,
        }
    }
}

/// A fully categorized member of one year's joined population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub year: i32,
    pub team_id: String,
    pub team_name: String,
    pub hits: u32,
    pub doubles: u32,
    pub performance_score: f64,
    pub salary: f64,
    pub salary_category: SalaryCategory,
    pub performance_category: PerformanceCategory,
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Join one year's batting lines to that year's salaries by player id.
///
/// Output order follows the batting rows. When a player has several salary
/// rows in the year (a mid-season trade, for instance), the last one read is
/// used for every batting line of that player.
pub fn join_year(
    batting: &[BattingRow],
    salaries: &[SalaryRow],
    year: i32,
    directory: &TeamDirectory,
    bands: &SalaryBands,
    weights: &PerformanceConfig,
) -> Vec<JoinedPlayer> {
    let mut salary_by_player: HashMap<&str, f64> = HashMap::new();
    for row in salaries.iter().filter(|r| r.in_year(year)) {
        if let Some(previous) = salary_by_player.insert(row.player_id.as_str(), row.salary) {
            debug!(
                "duplicate {} salary for '{}' ({} replaced by {})",
                year, row.player_id, previous, row.salary
            );
        }
    }

    let year_batting = batting.iter().filter(|r| r.in_year(year));
    let mut joined = Vec::new();
    let mut batting_rows = 0usize;
    for row in year_batting {
        batting_rows += 1;
        let Some(&salary) = salary_by_player.get(row.player_id.as_str()) else {
            continue;
        };
        joined.push(JoinedPlayer {
            player_id: row.player_id.clone(),
            year,
            team_id: row.team_id.clone(),
            team_name: directory.name_for(&row.team_id).to_string(),
            hits: row.h,
            doubles: row.double,
            performance_score: weighted_score(row.h, row.double, weights),
            salary,
            salary_category: bands.categorize(salary),
        });
    }

    debug!(
        "{}: {} batting rows, {} salaried players, {} joined",
        year,
        batting_rows,
        salary_by_player.len(),
        joined.len()
    );

    joined
}

/// Categorize every joined player against the year's thresholds.
pub fn classify_players(
    joined: Vec<JoinedPlayer>,
    thresholds: &PerformanceThresholds,
) -> Vec<PlayerRecord> {
    joined.into_iter().map(|p| p.classify(thresholds)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::TeamRow;

    fn join(batting: &[BattingRow], salaries: &[SalaryRow], year: i32) -> Vec<JoinedPlayer> {
        let directory = TeamDirectory::from_rows(&[TeamRow::named("OAK", "Oakland Athletics")]);
        join_year(
            batting,
            salaries,
            year,
            &directory,
            &SalaryBands::default(),
            &PerformanceConfig::default(),
        )
    }

    #[test]
    fn single_player_join() {
        let joined = join(
            &[BattingRow::new("p1", "OAK", 2004, 150, 30)],
            &[SalaryRow::new("p1", "OAK", 2004, 300_000.0)],
            2004,
        );
        assert_eq!(joined.len(), 1);
        let p = &joined[0];
        assert_eq!(p.player_id, "p1");
        assert_eq!(p.team_name, "Oakland Athletics");
        assert_eq!(p.hits, 150);
        assert_eq!(p.doubles, 30);
        assert_eq!(p.performance_score, 105.0);
        assert_eq!(p.salary, 300_000.0);
        assert_eq!(p.salary_category, SalaryCategory::Low);
    }

    #[test]
    fn players_without_salary_are_excluded() {
        let joined = join(
            &[
                BattingRow::new("p1", "OAK", 2004, 150, 30),
                BattingRow::new("p2", "OAK", 2004, 200, 40),
            ],
            &[SalaryRow::new("p1", "OAK", 2004, 300_000.0)],
            2004,
        );
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].player_id, "p1");
    }

    #[test]
    fn salary_from_another_year_does_not_join() {
        let joined = join(
            &[BattingRow::new("p1", "OAK", 2004, 150, 30)],
            &[SalaryRow::new("p1", "OAK", 2003, 300_000.0)],
            2004,
        );
        assert!(joined.is_empty());
    }

    #[test]
    fn output_follows_batting_order() {
        let joined = join(
            &[
                BattingRow::new("c", "OAK", 2004, 1, 0),
                BattingRow::new("a", "NYA", 2004, 1, 0),
                BattingRow::new("b", "OAK", 2004, 1, 0),
            ],
            &[
                SalaryRow::new("a", "NYA", 2004, 1.0),
                SalaryRow::new("b", "OAK", 2004, 1.0),
                SalaryRow::new("c", "OAK", 2004, 1.0),
            ],
            2004,
        );
        let ids: Vec<&str> = joined.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(joined[1].team_name, "NYA");
    }

    #[test]
    fn duplicate_salary_rows_last_one_wins() {
        let joined = join(
            &[
                BattingRow::new("p1", "OAK", 2004, 10, 1),
                BattingRow::new("p1", "NYA", 2004, 20, 2),
            ],
            &[
                SalaryRow::new("p1", "OAK", 2004, 1_000_000.0),
                SalaryRow::new("p1", "NYA", 2004, 7_000_000.0),
            ],
            2004,
        );
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|p| p.salary == 7_000_000.0));
        assert!(joined.iter().all(|p| p.salary_category == SalaryCategory::High));
    }

    #[test]
    fn rows_without_year_never_join() {
        let mut row = BattingRow::new("p1", "OAK", 2004, 150, 30);
        row.year = None;
        let joined = join(&[row], &[SalaryRow::new("p1", "OAK", 2004, 1.0)], 2004);
        assert!(joined.is_empty());
    }

    #[test]
    fn classify_attaches_performance_category() {
        let joined = join(
            &[
                BattingRow::new("low", "OAK", 2004, 10, 0),
                BattingRow::new("mid", "OAK", 2004, 100, 0),
                BattingRow::new("high", "OAK", 2004, 200, 0),
            ],
            &[
                SalaryRow::new("low", "OAK", 2004, 1.0),
                SalaryRow::new("mid", "OAK", 2004, 1.0),
                SalaryRow::new("high", "OAK", 2004, 1.0),
            ],
            2004,
        );
        let thresholds = PerformanceThresholds {
            low: 5.0,
            medium: 50.0,
            high: 100.0,
            max: 100.0,
            count: 3,
            average: 55.0,
        };
        let records = classify_players(joined, &thresholds);
        let cats: Vec<PerformanceCategory> =
            records.iter().map(|r| r.performance_category).collect();
        assert_eq!(
            cats,
            vec![
                PerformanceCategory::Low,
                PerformanceCategory::Medium,
                PerformanceCategory::High
            ]
        );
        assert_eq!(records[2].player_id, "high");
    }
}
