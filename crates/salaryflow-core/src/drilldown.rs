// Drill-down breakdowns shown when a salary or performance node is selected.

use crate::pipeline::classify::SalaryCategory;
use crate::pipeline::graph::{NodeCategory, NodeDetail};
use crate::pipeline::join::PlayerRecord;
use serde::Serialize;

/// A count under a label, in first-appearance order of the label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount<L> {
    pub label: L,
    pub count: usize,
}

fn count_by<'a, L, F>(players: &'a [PlayerRecord], key: F) -> Vec<LabelCount<L>>
where
    L: PartialEq,
    F: Fn(&'a PlayerRecord) -> L,
{
    let mut counts: Vec<LabelCount<L>> = Vec::new();
    for player in players {
        let label = key(player);
        match counts.iter_mut().find(|c| c.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount { label, count: 1 }),
        }
    }
    counts
}

/// Players per team display name.
pub fn players_per_team(players: &[PlayerRecord]) -> Vec<LabelCount<String>> {
    count_by(players, |p| p.team_name.clone())
}

/// Players per salary tier.
pub fn salary_mix(players: &[PlayerRecord]) -> Vec<LabelCount<SalaryCategory>> {
    count_by(players, |p| p.salary_category)
}

/// What a selected node breaks down into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "counts", rename_all = "snake_case")]
pub enum NodeBreakdown {
    /// Salary node: how its players spread over teams.
    PlayersPerTeam(Vec<LabelCount<String>>),
    /// Performance node: how its players spread over salary tiers.
    SalaryMix(Vec<LabelCount<SalaryCategory>>),
}

impl NodeBreakdown {
    /// Team nodes have no breakdown.
    pub fn for_node(detail: &NodeDetail) -> Option<Self> {
        match detail.node_category {
            NodeCategory::Salary => Some(NodeBreakdown::PlayersPerTeam(players_per_team(
                &detail.players,
            ))),
            NodeCategory::Performance => {
                Some(NodeBreakdown::SalaryMix(salary_mix(&detail.players)))
            }
            NodeCategory::Team => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::PerformanceCategory;

    fn player(id: &str, team: &str, salary_category: SalaryCategory) -> PlayerRecord {
        PlayerRecord {
            player_id: id.into(),
            year: 2004,
            team_id: team.into(),
            team_name: format!("{team} club"),
            hits: 0,
            doubles: 0,
            performance_score: 0.0,
            salary: 0.0,
            salary_category,
            performance_category: PerformanceCategory::Low,
        }
    }

    fn detail(category: NodeCategory, players: Vec<PlayerRecord>) -> NodeDetail {
        NodeDetail {
            node_id: 0,
            node_name: "node".into(),
            node_category: category,
            team_id: None,
            total_players: players.len(),
            avg_salary: None,
            avg_performance_score: None,
            players,
        }
    }

    #[test]
    fn players_per_team_first_appearance_order() {
        let players = vec![
            player("a", "OAK", SalaryCategory::Low),
            player("b", "NYA", SalaryCategory::Low),
            player("c", "OAK", SalaryCategory::Low),
        ];
        let counts = players_per_team(&players);
        assert_eq!(
            counts,
            vec![
                LabelCount { label: "OAK club".to_string(), count: 2 },
                LabelCount { label: "NYA club".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn salary_mix_counts_tiers() {
        let players = vec![
            player("a", "OAK", SalaryCategory::High),
            player("b", "OAK", SalaryCategory::Low),
            player("c", "NYA", SalaryCategory::High),
        ];
        let mix = salary_mix(&players);
        assert_eq!(mix.len(), 2);
        assert_eq!(mix[0].label, SalaryCategory::High);
        assert_eq!(mix[0].count, 2);
        assert_eq!(mix[1].label, SalaryCategory::Low);
    }

    #[test]
    fn breakdown_by_node_category() {
        let players = vec![player("a", "OAK", SalaryCategory::Medium)];
        assert!(matches!(
            NodeBreakdown::for_node(&detail(NodeCategory::Salary, players.clone())),
            Some(NodeBreakdown::PlayersPerTeam(_))
        ));
        assert!(matches!(
            NodeBreakdown::for_node(&detail(NodeCategory::Performance, players.clone())),
            Some(NodeBreakdown::SalaryMix(_))
        ));
        assert!(NodeBreakdown::for_node(&detail(NodeCategory::Team, players)).is_none());
    }

    #[test]
    fn breakdown_serializes_with_kind_tag() {
        let players = vec![player("a", "OAK", SalaryCategory::Medium)];
        let breakdown =
            NodeBreakdown::for_node(&detail(NodeCategory::Performance, players)).unwrap();
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["kind"], "salary_mix");
        assert_eq!(json["counts"][0]["label"], "Medium Salary");
        assert_eq!(json["counts"][0]["count"], 1);
    }
}
