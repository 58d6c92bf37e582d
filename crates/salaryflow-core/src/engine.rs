// Aggregation engine: owns the current snapshot and re-runs the pipeline on
// every year change.
//
// The stages always run join -> thresholds -> classify -> aggregate -> build.
// Each call replaces the whole snapshot; node and link ids are only stable
// within one snapshot.

use crate::config::{Config, PerformanceConfig, SalaryBands, Schema, WinPercentageBands};
use crate::data::loader::{load_dataset, Dataset, LoadError};
use crate::data::records::{BattingRow, SalaryRow, TeamRow};
use crate::pipeline::aggregate::aggregate_by_team;
use crate::pipeline::directory::TeamDirectory;
use crate::pipeline::graph::{build_flow_graph, FlowGraph, Link, LinkDetail, Node, NodeDetail};
use crate::pipeline::join::{classify_players, join_year};
use crate::pipeline::scoring::PerformanceStats;
use crate::pipeline::team_record::build_team_record_graph;
use crate::pipeline::years::available_years;
use crate::summary::{log_detailed_summary, DataSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the renderer needs for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub year: i32,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub node_details: BTreeMap<usize, NodeDetail>,
    pub link_details: BTreeMap<usize, LinkDetail>,
    /// Absent for a year with no joined players and for the team-record
    /// schema.
    pub performance_stats: Option<PerformanceStats>,
}

impl GraphSnapshot {
    /// The "no data for this year" snapshot.
    pub fn empty(year: i32) -> Self {
        GraphSnapshot::from_graph(year, FlowGraph::default(), None)
    }

    fn from_graph(year: i32, graph: FlowGraph, performance_stats: Option<PerformanceStats>) -> Self {
        GraphSnapshot {
            year,
            nodes: graph.nodes,
            links: graph.links,
            node_details: graph.node_details,
            link_details: graph.link_details,
            performance_stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The pipeline knobs taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub schema: Schema,
    pub salary_bands: SalaryBands,
    pub performance: PerformanceConfig,
    pub win_percentage: WinPercentageBands,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        EngineSettings {
            schema: config.schema,
            salary_bands: config.salary_bands,
            performance: config.performance,
            win_percentage: config.win_percentage,
        }
    }
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No year processed yet.
    Uninitialized,
    /// Holding the snapshot for `year`.
    Ready { year: i32 },
}

#[derive(Debug, Default)]
pub struct AggregationEngine {
    settings: EngineSettings,
    directory: TeamDirectory,
    current: Option<GraphSnapshot>,
    /// Score distributions of every year processed so far.
    performance_stats: BTreeMap<i32, PerformanceStats>,
}

impl AggregationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        AggregationEngine {
            settings,
            ..AggregationEngine::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        AggregationEngine::new(EngineSettings::from(config))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> EngineState {
        match &self.current {
            Some(snapshot) => EngineState::Ready {
                year: snapshot.year,
            },
            None => EngineState::Uninitialized,
        }
    }

    /// Rebuild the snapshot for `year` and make it current.
    ///
    /// Never fails: a year with no joined data still becomes the current
    /// year, with an empty snapshot. The team directory is only replaced
    /// when `teams` is non-empty, so later calls may omit team data.
    pub fn process_year(
        &mut self,
        batting: &[BattingRow],
        salaries: &[SalaryRow],
        teams: &[TeamRow],
        year: i32,
    ) -> &GraphSnapshot {
        if !teams.is_empty() {
            self.directory = TeamDirectory::from_rows(teams);
        }

        info!("Processing {} ({:?} schema)", year, self.settings.schema);
        let snapshot = match self.settings.schema {
            Schema::PlayerBatting => self.build_player_snapshot(batting, salaries, year),
            Schema::TeamRecord => self.build_team_record_snapshot(teams, salaries, year),
        };

        if snapshot.is_empty() {
            warn!("No data for {}; showing an empty diagram", year);
        } else {
            info!(
                "{}: {} nodes, {} links",
                year,
                snapshot.nodes.len(),
                snapshot.links.len()
            );
        }
        log_detailed_summary(&snapshot);

        self.current.insert(snapshot)
    }

    fn build_player_snapshot(
        &mut self,
        batting: &[BattingRow],
        salaries: &[SalaryRow],
        year: i32,
    ) -> GraphSnapshot {
        let settings = &self.settings;
        let joined = join_year(
            batting,
            salaries,
            year,
            &self.directory,
            &settings.salary_bands,
            &settings.performance,
        );

        let scores: Vec<f64> = joined.iter().map(|p| p.performance_score).collect();
        let Some(stats) = PerformanceStats::from_scores(
            scores,
            settings.performance.medium_percentile,
            settings.performance.high_percentile,
        ) else {
            self.performance_stats.remove(&year);
            return GraphSnapshot::empty(year);
        };
        let thresholds = stats.thresholds;
        debug!(
            "{} thresholds: medium={:.1}, high={:.1} ({} players)",
            year, thresholds.medium, thresholds.high, stats.total_players
        );

        let players = classify_players(joined, &thresholds);
        let teams = aggregate_by_team(&players, &thresholds, &settings.salary_bands);
        for team in &teams {
            debug!(
                "{}: {} players, avg salary {:.0}, avg score {:.1} -> {} / {}",
                team.team_name,
                team.player_count(),
                team.avg_salary,
                team.avg_performance_score,
                team.team_salary_category,
                team.team_performance_category
            );
        }
        let graph = build_flow_graph(&teams, &players);

        self.performance_stats.insert(year, stats.clone());
        GraphSnapshot::from_graph(year, graph, Some(stats))
    }

    fn build_team_record_snapshot(
        &self,
        teams: &[TeamRow],
        salaries: &[SalaryRow],
        year: i32,
    ) -> GraphSnapshot {
        let graph = build_team_record_graph(
            teams,
            salaries,
            year,
            &self.settings.salary_bands,
            &self.settings.win_percentage,
        );
        GraphSnapshot::from_graph(year, graph, None)
    }

    /// The last snapshot built, without recomputing.
    pub fn current_snapshot(&self) -> Option<&GraphSnapshot> {
        self.current.as_ref()
    }

    pub fn current_year(&self) -> Option<i32> {
        self.current.as_ref().map(|s| s.year)
    }

    pub fn node_details(&self, node_id: usize) -> Option<&NodeDetail> {
        self.current.as_ref()?.node_details.get(&node_id)
    }

    pub fn link_details(&self, link_id: usize) -> Option<&LinkDetail> {
        self.current.as_ref()?.link_details.get(&link_id)
    }

    /// Score distribution of any year processed so far.
    pub fn performance_stats(&self, year: i32) -> Option<&PerformanceStats> {
        self.performance_stats.get(&year)
    }

    pub fn summary(&self) -> Option<DataSummary> {
        self.current.as_ref().map(DataSummary::from_snapshot)
    }

    /// Years the configured schema can show for `dataset`.
    pub fn available_years(&self, dataset: &Dataset) -> Vec<i32> {
        match self.settings.schema {
            Schema::PlayerBatting => available_years(&dataset.batting, &dataset.salary),
            Schema::TeamRecord => available_years(&dataset.teams, &dataset.salary),
        }
    }

    pub fn log_detailed_summary(&self) {
        match &self.current {
            Some(snapshot) => log_detailed_summary(snapshot),
            None => debug!("no year processed yet"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A loaded dataset paired with the engine that renders it: the two entry
/// points a year control needs.
#[derive(Debug)]
pub struct FlowSession {
    pub dataset: Dataset,
    pub engine: AggregationEngine,
}

impl FlowSession {
    pub fn new(dataset: Dataset, engine: AggregationEngine) -> Self {
        FlowSession { dataset, engine }
    }

    /// Load the configured CSV files and check they can drive the schema.
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        let dataset = load_dataset(&config.data_paths)?;
        dataset.validate_for(config.schema)?;
        Ok(FlowSession::new(dataset, AggregationEngine::from_config(config)))
    }

    pub fn available_years(&self) -> Vec<i32> {
        self.engine.available_years(&self.dataset)
    }

    pub fn process_year(&mut self, year: i32) -> &GraphSnapshot {
        let dataset = &self.dataset;
        self.engine
            .process_year(&dataset.batting, &dataset.salary, &dataset.teams, year)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
