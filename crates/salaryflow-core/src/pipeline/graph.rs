// Flow graph construction: nodes, links and their provenance.
//
// Node ids are assigned in materialization order (teams, then salary tiers
// Low/Medium/High, then performance tiers Low/Medium/High), skipping any
// node no flow touches. Links appear in the order their flow was first
// recorded. Both orders are part of the renderer contract.

use crate::pipeline::aggregate::TeamAggregation;
use crate::pipeline::classify::{PerformanceCategory, SalaryCategory};
use crate::pipeline::join::PlayerRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which column of the diagram a node sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Team,
    Salary,
    Performance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: usize,
    pub name: String,
    pub category: NodeCategory,
    /// Players in the node (teams, for the team-record schema).
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    /// Number of teams routed along this edge.
    pub value: usize,
}

/// Provenance for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    pub node_id: usize,
    pub node_name: String,
    pub node_category: NodeCategory,
    /// Set on team nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub total_players: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_performance_score: Option<f64>,
    pub players: Vec<PlayerRecord>,
}

/// Provenance for one link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkDetail {
    pub link_id: usize,
    pub source: String,
    pub target: String,
    pub source_index: usize,
    pub target_index: usize,
    pub value: usize,
    pub total_players: usize,
    pub players: Vec<PlayerRecord>,
}

/// Nodes, links and provenance maps for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub node_details: BTreeMap<usize, NodeDetail>,
    pub link_details: BTreeMap<usize, LinkDetail>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes_in(&self, category: NodeCategory) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.category == category)
    }
}

// ---------------------------------------------------------------------------
// Routing (shared by both schemas)
// ---------------------------------------------------------------------------

/// A node identity before ids are assigned. Teams are identified by their
/// position in the route list, so two teams sharing a display name still get
/// separate nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Endpoint {
    Team(usize),
    Salary(SalaryCategory),
    Performance(PerformanceCategory),
}

/// One team's path through the diagram.
#[derive(Debug, Clone)]
pub(crate) struct TeamRoute<'a> {
    pub name: &'a str,
    pub salary: SalaryCategory,
    pub performance: PerformanceCategory,
}

/// Nodes and links laid out from a set of routes, with the endpoint each
/// link joins so callers can attach provenance.
#[derive(Debug, Default)]
pub(crate) struct FlowLayout {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub node_endpoints: Vec<Endpoint>,
    pub link_endpoints: Vec<(Endpoint, Endpoint)>,
}

/// Count each team once on its team->salary edge and once on its
/// salary->performance edge, then materialize only the nodes those edges
/// touch. `node_value` supplies each node's value.
pub(crate) fn layout_routes(
    routes: &[TeamRoute<'_>],
    node_value: impl Fn(Endpoint) -> usize,
) -> FlowLayout {
    let mut flows: Vec<((Endpoint, Endpoint), usize)> = Vec::new();
    let mut flow_slots: HashMap<(Endpoint, Endpoint), usize> = HashMap::new();
    let mut used: HashSet<Endpoint> = HashSet::new();

    let mut record = |edge: (Endpoint, Endpoint)| match flow_slots.get(&edge) {
        Some(&slot) => flows[slot].1 += 1,
        None => {
            flow_slots.insert(edge, flows.len());
            flows.push((edge, 1));
        }
    };

    for (i, route) in routes.iter().enumerate() {
        let team = Endpoint::Team(i);
        let salary = Endpoint::Salary(route.salary);
        let performance = Endpoint::Performance(route.performance);
        used.extend([team, salary, performance]);
        record((team, salary));
        record((salary, performance));
    }

    let materialized = (0..routes.len())
        .map(Endpoint::Team)
        .chain(SalaryCategory::ALL.into_iter().map(Endpoint::Salary))
        .chain(PerformanceCategory::ALL.into_iter().map(Endpoint::Performance))
        .filter(|e| used.contains(e));

    let mut layout = FlowLayout::default();
    let mut node_ids: HashMap<Endpoint, usize> = HashMap::new();
    for endpoint in materialized {
        let id = layout.nodes.len();
        let (name, category) = match endpoint {
            Endpoint::Team(i) => (routes[i].name.to_string(), NodeCategory::Team),
            Endpoint::Salary(c) => (c.label().to_string(), NodeCategory::Salary),
            Endpoint::Performance(c) => (c.label().to_string(), NodeCategory::Performance),
        };
        layout.nodes.push(Node {
            id,
            name,
            category,
            value: node_value(endpoint),
        });
        layout.node_endpoints.push(endpoint);
        node_ids.insert(endpoint, id);
    }

    for ((source, target), value) in flows {
        let (Some(&source_id), Some(&target_id)) = (node_ids.get(&source), node_ids.get(&target))
        else {
            continue;
        };
        layout.links.push(Link {
            source: source_id,
            target: target_id,
            value,
        });
        layout.link_endpoints.push((source, target));
    }

    layout
}

// ---------------------------------------------------------------------------
// Player-schema graph
// ---------------------------------------------------------------------------

/// Build the diagram for one year's joined population.
///
/// Node values count players; link values count teams. A salary or
/// performance node's players span every team, while a team->salary link
/// carries only that team's players in the target tier. An empty
/// population yields an empty graph.
pub fn build_flow_graph(teams: &TeamAggregation, players: &[PlayerRecord]) -> FlowGraph {
    if players.is_empty() || teams.is_empty() {
        return FlowGraph::default();
    }

    let team_list = teams.as_slice();
    let routes: Vec<TeamRoute<'_>> = team_list
        .iter()
        .map(|t| TeamRoute {
            name: &t.team_name,
            salary: t.team_salary_category,
            performance: t.team_performance_category,
        })
        .collect();

    let members = |endpoint: Endpoint| -> Vec<PlayerRecord> {
        match endpoint {
            Endpoint::Team(i) => team_list[i].players.clone(),
            Endpoint::Salary(c) => players
                .iter()
                .filter(|p| p.salary_category == c)
                .cloned()
                .collect(),
            Endpoint::Performance(c) => players
                .iter()
                .filter(|p| p.performance_category == c)
                .cloned()
                .collect(),
        }
    };

    let node_value = |endpoint: Endpoint| -> usize {
        match endpoint {
            Endpoint::Team(i) => team_list[i].players.len(),
            Endpoint::Salary(c) => players.iter().filter(|p| p.salary_category == c).count(),
            Endpoint::Performance(c) => players
                .iter()
                .filter(|p| p.performance_category == c)
                .count(),
        }
    };

    let layout = layout_routes(&routes, node_value);
    let mut graph = FlowGraph::default();

    for (node, endpoint) in layout.nodes.iter().zip(&layout.node_endpoints) {
        let node_players = members(*endpoint);
        let team = match endpoint {
            Endpoint::Team(i) => Some(&team_list[*i]),
            _ => None,
        };
        graph.node_details.insert(
            node.id,
            NodeDetail {
                node_id: node.id,
                node_name: node.name.clone(),
                node_category: node.category,
                team_id: team.map(|t| t.team_id.clone()),
                total_players: node_players.len(),
                avg_salary: team.map(|t| t.avg_salary),
                avg_performance_score: team.map(|t| t.avg_performance_score),
                players: node_players,
            },
        );
    }

    for (link_id, (link, (source, target))) in
        layout.links.iter().zip(&layout.link_endpoints).enumerate()
    {
        let link_players: Vec<PlayerRecord> = match (source, target) {
            (Endpoint::Team(i), Endpoint::Salary(c)) => team_list[*i]
                .players
                .iter()
                .filter(|p| p.salary_category == *c)
                .cloned()
                .collect(),
            (Endpoint::Salary(s), Endpoint::Performance(c)) => players
                .iter()
                .filter(|p| p.salary_category == *s && p.performance_category == *c)
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        graph.link_details.insert(
            link_id,
            LinkDetail {
                link_id,
                source: layout.nodes[link.source].name.clone(),
                target: layout.nodes[link.target].name.clone(),
                source_index: link.source,
                target_index: link.target,
                value: link.value,
                total_players: link_players.len(),
                players: link_players,
            },
        );
    }

    graph.nodes = layout.nodes;
    graph.links = layout.links;
    graph
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
