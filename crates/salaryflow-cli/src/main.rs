// Salary flow command-line driver.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays clean JSON)
// 2. Load config (copying defaults on first run)
// 3. Load the CSV datasets into a session
// 4. Run the requested command and print its JSON export

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use salaryflow_core::config::{self, Config, Schema};
use salaryflow_core::drilldown::NodeBreakdown;
use salaryflow_core::engine::FlowSession;
use salaryflow_core::pipeline::graph::NodeDetail;
use salaryflow_core::pipeline::years::closest_available_year;
use salaryflow_core::summary::DataSummary;
use salaryflow_core::team_batting::compare_team_batting;

#[derive(Parser)]
#[command(name = "salaryflow")]
#[command(about = "Team -> salary -> performance flow diagrams from baseball CSVs", long_about = None)]
struct Cli {
    /// Directory holding config/ and defaults/ (defaults to the working
    /// directory, then the platform config directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the years with data, newest first
    Years,

    /// Build the flow diagram for one year
    Snapshot {
        /// Year to show; snaps to the closest year with data
        #[arg(long)]
        year: Option<i32>,
    },

    /// Build every available year in turn and summarize each
    Sweep,

    /// Drill into one node of a year's diagram
    Node {
        #[arg(long)]
        year: i32,

        /// Node id within that year's diagram
        #[arg(long)]
        id: usize,
    },

    /// Compare a team's batting line with the league's
    Team {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        team_id: String,
    },
}

/// Every printed document carries when and under which schema it was built.
#[derive(Serialize)]
struct Export<T: Serialize> {
    generated_at: DateTime<Utc>,
    schema: Schema,
    data: T,
}

#[derive(Serialize)]
struct NodeReport<'a> {
    year: i32,
    node: &'a NodeDetail,
    breakdown: Option<NodeBreakdown>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let base_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => config::resolve_base_dir().context("failed to resolve config directory")?,
    };
    let config = config::load_config_in(&base_dir)
        .with_context(|| format!("failed to load configuration from {}", base_dir.display()))?;
    info!(
        "Config loaded: schema={:?}, salary bands {}/{}",
        config.schema, config.salary_bands.medium, config.salary_bands.high
    );

    // 3. Load datasets
    let mut session = FlowSession::load(&config).context("failed to load datasets")?;

    // 4. Run the command
    let out = Output {
        schema: session.engine.settings().schema,
        pretty: cli.pretty,
    };
    match cli.command {
        Commands::Years => out.print(session.available_years()),
        Commands::Snapshot { year } => {
            let year = select_year(&session, &config, year)?;
            let snapshot = session.process_year(year);
            out.print(snapshot)
        }
        Commands::Sweep => {
            let years = session.available_years();
            let mut summaries: Vec<DataSummary> = Vec::with_capacity(years.len());
            for year in years {
                let snapshot = session.process_year(year);
                summaries.push(DataSummary::from_snapshot(snapshot));
            }
            out.print(summaries)
        }
        Commands::Node { year, id } => {
            let snapshot = session.process_year(year);
            let Some(node) = snapshot.node_details.get(&id) else {
                bail!(
                    "{} has no node {} ({} nodes in that year's diagram)",
                    year,
                    id,
                    snapshot.nodes.len()
                );
            };
            out.print(NodeReport {
                year,
                node,
                breakdown: NodeBreakdown::for_node(node),
            })
        }
        Commands::Team { year, team_id } => {
            let comparison = compare_team_batting(&session.dataset.batting, &team_id, year)
                .with_context(|| format!("no batting rows for {team_id} in {year}"))?;
            out.print(comparison)
        }
    }
}

/// The requested year, or the configured default, or the newest year,
/// snapped to the closest year that has data.
fn select_year(
    session: &FlowSession,
    config: &Config,
    requested: Option<i32>,
) -> anyhow::Result<i32> {
    let years = session.available_years();
    let Some(&newest) = years.first() else {
        bail!("no year has both datasets; nothing to show");
    };
    let wanted = requested.or(config.default_year).unwrap_or(newest);
    let year = closest_available_year(&years, wanted).unwrap_or(newest);
    if year != wanted {
        warn!("{} has no data; showing {} instead", wanted, year);
    }
    Ok(year)
}

struct Output {
    schema: Schema,
    pretty: bool,
}

impl Output {
    fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let export = Export {
            generated_at: Utc::now(),
            schema: self.schema,
            data,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&export)
        } else {
            serde_json::to_string(&export)
        }
        .context("failed to serialize output")?;
        println!("{json}");
        Ok(())
    }
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("salaryflow=info,salaryflow_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
