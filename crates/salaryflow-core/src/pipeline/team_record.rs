// Team-record schema: whole teams flow Team -> Salary -> Win percentage.
//
// Performance comes from the team's season record instead of player
// batting, and salary is the mean of every salary row the team has for the
// year. There is no player population, so the graph carries no provenance.

use crate::config::{SalaryBands, WinPercentageBands};
use crate::data::records::{SalaryRow, TeamRow, YearKeyed};
use crate::pipeline::graph::{layout_routes, Endpoint, FlowGraph, TeamRoute};
use std::collections::HashMap;
use tracing::debug;

/// `w / (w + l)`, or 0 for a team with no decisions.
pub fn win_percentage(wins: u32, losses: u32) -> f64 {
    // Both counts may be anything up to u32::MAX after CSV coercion.
    let games = u64::from(wins) + u64::from(losses);
    if games == 0 {
        return 0.0;
    }
    f64::from(wins) / games as f64
}

/// Mean salary per team id over the year's salary rows.
pub fn team_average_salaries(salaries: &[SalaryRow], year: i32) -> HashMap<String, f64> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for row in salaries.iter().filter(|r| r.in_year(year)) {
        let entry = sums.entry(row.team_id.as_str()).or_insert((0.0, 0));
        entry.0 += row.salary;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(team, (total, n))| (team.to_string(), total / n as f64))
        .collect()
}

/// Build the team-record diagram for one year.
///
/// One route per team row of that year, in row order. A team without salary
/// rows averages 0 and lands in the lowest tier. Node values count teams.
pub fn build_team_record_graph(
    teams: &[TeamRow],
    salaries: &[SalaryRow],
    year: i32,
    salary_bands: &SalaryBands,
    win_bands: &WinPercentageBands,
) -> FlowGraph {
    let averages = team_average_salaries(salaries, year);
    let routes: Vec<TeamRoute<'_>> = teams
        .iter()
        .filter(|t| t.in_year(year))
        .map(|team| {
            let avg_salary = averages.get(&team.team_id).copied().unwrap_or(0.0);
            let pct = win_percentage(team.w, team.l);
            let route = TeamRoute {
                name: team.display_name(),
                salary: salary_bands.categorize(avg_salary),
                performance: win_bands.categorize(pct),
            };
            debug!(
                "{}: wins={}, losses={}, win_pct={:.3}, avg_salary={:.0}, {} -> {}",
                route.name, team.w, team.l, pct, avg_salary, route.salary, route.performance
            );
            route
        })
        .collect();

    let node_value = |endpoint: Endpoint| -> usize {
        match endpoint {
            Endpoint::Team(_) => 1,
            Endpoint::Salary(c) => routes.iter().filter(|r| r.salary == c).count(),
            Endpoint::Performance(c) => routes.iter().filter(|r| r.performance == c).count(),
        }
    };

    let layout = layout_routes(&routes, node_value);
    FlowGraph {
        nodes: layout.nodes,
        links: layout.links,
        ..FlowGraph::default()
    }
}
