// Per-team aggregation of one year's joined population.

use crate::config::SalaryBands;
use crate::pipeline::classify::{categorize_performance, PerformanceCategory, SalaryCategory};
use crate::pipeline::join::PlayerRecord;
use crate::pipeline::scoring::PerformanceThresholds;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One team's players and their summed, averaged and categorized metrics.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAggregate {
    pub team_id: String,
    pub team_name: String,
    /// In joined-population order.
    pub players: Vec<PlayerRecord>,
    pub total_salary: f64,
    pub total_performance_score: f64,
    pub avg_salary: f64,
    pub avg_performance_score: f64,
    pub salary_category_counts: BTreeMap<SalaryCategory, usize>,
    pub performance_category_counts: BTreeMap<PerformanceCategory, usize>,
    pub team_salary_category: SalaryCategory,
    /// The team's average score measured against thresholds drawn from the
    /// individual player distribution.
    pub team_performance_category: PerformanceCategory,
}

impl TeamAggregate {
    fn empty(team_id: &str, team_name: &str) -> Self {
        TeamAggregate {
            team_id: team_id.to_string(),
            team_name: team_name.to_string(),
            players: Vec::new(),
            total_salary: 0.0,
            total_performance_score: 0.0,
            avg_salary: 0.0,
            avg_performance_score: 0.0,
            salary_category_counts: SalaryCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            performance_category_counts: PerformanceCategory::ALL
                .iter()
                .map(|c| (*c, 0))
                .collect(),
            team_salary_category: SalaryCategory::Low,
            team_performance_category: PerformanceCategory::Low,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// Team aggregates in first-appearance order, addressable by team id.
#[derive(Debug, Clone, Default)]
pub struct TeamAggregation {
    teams: Vec<TeamAggregate>,
    index: HashMap<String, usize>,
}

impl TeamAggregation {
    pub fn get(&self, team_id: &str) -> Option<&TeamAggregate> {
        self.index.get(team_id).map(|&i| &self.teams[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TeamAggregate> {
        self.teams.iter()
    }

    pub fn as_slice(&self) -> &[TeamAggregate] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl<'a> IntoIterator for &'a TeamAggregation {
    type Item = &'a TeamAggregate;
    type IntoIter = std::slice::Iter<'a, TeamAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}

/// Group players by team id, then derive averages and team categories.
///
/// The first pass accumulates sums and per-category counts; the second
/// divides by the player count and classifies the averages. Teams with no
/// players cannot arise, so the averages are always defined.
pub fn aggregate_by_team(
    players: &[PlayerRecord],
    thresholds: &PerformanceThresholds,
    bands: &SalaryBands,
) -> TeamAggregation {
    let mut aggregation = TeamAggregation::default();

    for player in players {
        let slot = match aggregation.index.get(&player.team_id) {
            Some(&i) => i,
            None => {
                aggregation
                    .teams
                    .push(TeamAggregate::empty(&player.team_id, &player.team_name));
                let i = aggregation.teams.len() - 1;
                aggregation.index.insert(player.team_id.clone(), i);
                i
            }
        };
        let team = &mut aggregation.teams[slot];
        team.total_salary += player.salary;
        team.total_performance_score += player.performance_score;
        *team
            .salary_category_counts
            .entry(player.salary_category)
            .or_insert(0) += 1;
        *team
            .performance_category_counts
            .entry(player.performance_category)
            .or_insert(0) += 1;
        team.players.push(player.clone());
    }

    for team in &mut aggregation.teams {
        let n = team.players.len() as f64;
        team.avg_salary = team.total_salary / n;
        team.avg_performance_score = team.total_performance_score / n;
        team.team_salary_category = bands.categorize(team.avg_salary);
        team.team_performance_category =
            categorize_performance(team.avg_performance_score, thresholds);
    }

    aggregation
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

    fn player(id: &str, team: &str, salary: f64, score: f64) -> PlayerRecord {
        let bands = SalaryBands::default();
        PlayerRecord {
            player_id: id.into(),
            year: 2004,
            team_id: team.into(),
            team_name: format!("{team} name"),
            hits: 0,
            doubles: 0,
            performance_score: score,
            salary,
            salary_category: bands.categorize(salary),
            performance_category: categorize_performance(score, &thresholds()),
        }
    }

    fn thresholds() -> PerformanceThresholds {
        PerformanceThresholds {
            low: 0.0,
            medium: 20.0,
            high: 60.0,
            max: 100.0,
            count: 10,
            average: 40.0,
        }
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let players = vec![
            player("a", "NYA", 1.0, 1.0),
            player("b", "OAK", 1.0, 1.0),
            player("c", "NYA", 1.0, 1.0),
        ];
        let agg = aggregate_by_team(&players, &thresholds(), &SalaryBands::default());
        assert_eq!(agg.len(), 2);
        let ids: Vec<&str> = agg.iter().map(|t| t.team_id.as_str()).collect();
        assert_eq!(ids, vec!["NYA", "OAK"]);
        let nya = agg.get("NYA").unwrap();
        assert_eq!(nya.player_count(), 2);
        assert_eq!(nya.players[0].player_id, "a");
        assert_eq!(nya.players[1].player_id, "c");
        assert_eq!(nya.team_name, "NYA name");
        assert!(agg.get("BOS").is_none());
    }

    #[test]
    fn sums_averages_and_counts() {
        let players = vec![
            player("a", "OAK", 1_000_000.0, 10.0),
            player("b", "OAK", 9_000_000.0, 70.0),
            player("c", "OAK", 3_000_000.0, 30.0),
        ];
        let agg = aggregate_by_team(&players, &thresholds(), &SalaryBands::default());
        let oak = agg.get("OAK").unwrap();

        assert!(approx_eq(oak.total_salary, 13_000_000.0, 1e-6));
        assert!(approx_eq(oak.avg_salary, 13_000_000.0 / 3.0, 1e-6));
        assert!(approx_eq(oak.total_performance_score, 110.0, 1e-9));
        assert!(approx_eq(oak.avg_performance_score, 110.0 / 3.0, 1e-9));

        assert_eq!(oak.salary_category_counts[&SalaryCategory::Low], 1);
        assert_eq!(oak.salary_category_counts[&SalaryCategory::Medium], 1);
        assert_eq!(oak.salary_category_counts[&SalaryCategory::High], 1);
        assert_eq!(oak.performance_category_counts[&PerformanceCategory::Low], 1);
        assert_eq!(oak.performance_category_counts[&PerformanceCategory::Medium], 1);
        assert_eq!(oak.performance_category_counts[&PerformanceCategory::High], 1);

        // avg salary 4.33M -> Medium; avg score 36.7 -> Medium
        assert_eq!(oak.team_salary_category, SalaryCategory::Medium);
        assert_eq!(oak.team_performance_category, PerformanceCategory::Medium);
    }

    #[test]
    fn counts_include_zero_categories() {
        let players = vec![player("a", "OAK", 100.0, 1.0)];
        let agg = aggregate_by_team(&players, &thresholds(), &SalaryBands::default());
        let oak = agg.get("OAK").unwrap();
        assert_eq!(oak.salary_category_counts.len(), 3);
        assert_eq!(oak.salary_category_counts[&SalaryCategory::High], 0);
        assert_eq!(oak.performance_category_counts.len(), 3);
    }

    #[test]
    fn team_category_uses_average_against_player_thresholds() {
        // Two high scorers and one very low scorer: every individual is
        // High or Low, but the team average lands in Medium.
        let players = vec![
            player("a", "OAK", 1.0, 90.0),
            player("b", "OAK", 1.0, 0.0),
            player("c", "OAK", 1.0, 0.0),
        ];
        let agg = aggregate_by_team(&players, &thresholds(), &SalaryBands::default());
        let oak = agg.get("OAK").unwrap();
        assert_eq!(oak.performance_category_counts[&PerformanceCategory::Medium], 0);
        assert_eq!(oak.team_performance_category, PerformanceCategory::Medium);
    }

    #[test]
    fn empty_population_yields_empty_aggregation() {
        let agg = aggregate_by_team(&[], &thresholds(), &SalaryBands::default());
        assert!(agg.is_empty());
    }
}
