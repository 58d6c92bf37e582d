// Human-oriented summaries of a snapshot, for logs and the CLI.

use crate::engine::GraphSnapshot;
use crate::pipeline::graph::NodeCategory;
use serde::Serialize;
use tracing::debug;

/// Node and link totals plus the node names of each column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub year: i32,
    pub total_nodes: usize,
    pub total_links: usize,
    pub teams: Vec<String>,
    pub salary_ranges: Vec<String>,
    pub performance_levels: Vec<String>,
}

impl DataSummary {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let names = |category: NodeCategory| -> Vec<String> {
            snapshot
                .nodes
                .iter()
                .filter(|n| n.category == category)
                .map(|n| n.name.clone())
                .collect()
        };
        DataSummary {
            year: snapshot.year,
            total_nodes: snapshot.nodes.len(),
            total_links: snapshot.links.len(),
            teams: names(NodeCategory::Team),
            salary_ranges: names(NodeCategory::Salary),
            performance_levels: names(NodeCategory::Performance),
        }
    }
}

/// Dump every node, link and the year's thresholds at debug level.
pub fn log_detailed_summary(snapshot: &GraphSnapshot) {
    debug!(
        "=== {} detail: {} nodes, {} links ===",
        snapshot.year,
        snapshot.nodes.len(),
        snapshot.links.len()
    );
    for node in &snapshot.nodes {
        debug!(
            "node {:>3} [{:?}] {} (value {})",
            node.id, node.category, node.name, node.value
        );
    }
    for link in &snapshot.links {
        let source = snapshot
            .nodes
            .get(link.source)
            .map_or("?", |n| n.name.as_str());
        let target = snapshot
            .nodes
            .get(link.target)
            .map_or("?", |n| n.name.as_str());
        debug!("link {source} -> {target}: {}", link.value);
    }
    match &snapshot.performance_stats {
        Some(stats) => debug!(
            "thresholds: low={:.1} medium={:.1} high={:.1} max={:.1} avg={:.2} over {} players",
            stats.thresholds.low,
            stats.thresholds.medium,
            stats.thresholds.high,
            stats.thresholds.max,
            stats.thresholds.average,
            stats.total_players
        ),
        None => debug!("no performance thresholds for {}", snapshot.year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::graph::{Link, Node};

    fn node(id: usize, name: &str, category: NodeCategory) -> Node {
        Node {
            id,
            name: name.into(),
            category,
            value: 1,
        }
    }

    #[test]
    fn summary_lists_columns_in_node_order() {
        let mut snapshot = GraphSnapshot::empty(2004);
        snapshot.nodes = vec![
            node(0, "Oakland Athletics", NodeCategory::Team),
            node(1, "New York Yankees", NodeCategory::Team),
            node(2, "Low Salary", NodeCategory::Salary),
            node(3, "High Performance", NodeCategory::Performance),
        ];
        snapshot.links = vec![
            Link { source: 0, target: 2, value: 1 },
            Link { source: 1, target: 2, value: 1 },
            Link { source: 2, target: 3, value: 2 },
        ];
        let summary = DataSummary::from_snapshot(&snapshot);
        assert_eq!(summary.year, 2004);
        assert_eq!(summary.total_nodes, 4);
        assert_eq!(summary.total_links, 3);
        assert_eq!(summary.teams, vec!["Oakland Athletics", "New York Yankees"]);
        assert_eq!(summary.salary_ranges, vec!["Low Salary"]);
        assert_eq!(summary.performance_levels, vec!["High Performance"]);
    }

    #[test]
    fn empty_snapshot_summary() {
        let summary = DataSummary::from_snapshot(&GraphSnapshot::empty(2099));
        assert_eq!(summary.total_nodes, 0);
        assert!(summary.teams.is_empty());
    }
}
