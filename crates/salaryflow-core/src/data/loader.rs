// CSV loading for the batting, salary and team datasets.
//
// Columns are read as optional text and coerced through the helpers in
// `records`, so a malformed number never rejects a row. Rows the CSV reader
// cannot decode at all are skipped with a warning.

use crate::config::{DataPaths, Schema};
use crate::data::records::{
    parse_amount_or_default, parse_count_or_default, parse_year, BattingRow, SalaryRow, TeamRow,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The three raw datasets, loaded once and treated as read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub batting: Vec<BattingRow>,
    pub salary: Vec<SalaryRow>,
    pub teams: Vec<TeamRow>,
}

impl Dataset {
    pub fn new(batting: Vec<BattingRow>, salary: Vec<SalaryRow>, teams: Vec<TeamRow>) -> Self {
        Dataset {
            batting,
            salary,
            teams,
        }
    }

    /// Reject datasets that cannot drive the given schema at all.
    pub fn validate_for(&self, schema: Schema) -> Result<(), LoadError> {
        if self.salary.is_empty() {
            return Err(LoadError::Validation(
                "salary CSV produced zero valid rows".into(),
            ));
        }
        match schema {
            Schema::PlayerBatting if self.batting.is_empty() => Err(LoadError::Validation(
                "batting CSV produced zero valid rows".into(),
            )),
            Schema::TeamRecord if self.teams.is_empty() => Err(LoadError::Validation(
                "team CSV produced zero valid rows".into(),
            )),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Batting CSV row. Only the columns the dashboard reads are named; any
/// other column in the file is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBatting {
    player_id: String,
    team_id: String,
    year: Option<String>,
    h: Option<String>,
    double: Option<String>,
    triple: Option<String>,
    hr: Option<String>,
    ab: Option<String>,
    bb: Option<String>,
    hbp: Option<String>,
    sf: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSalary {
    player_id: String,
    team_id: String,
    year: Option<String>,
    salary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTeam {
    team_id: String,
    name: Option<String>,
    year: Option<String>,
    w: Option<String>,
    l: Option<String>,
}

impl From<RawBatting> for BattingRow {
    fn from(raw: RawBatting) -> Self {
        let count = |field: &Option<String>| parse_count_or_default(field.as_deref(), 0);
        BattingRow {
            player_id: raw.player_id.trim().to_string(),
            team_id: raw.team_id.trim().to_string(),
            year: parse_year(raw.year.as_deref()),
            h: count(&raw.h),
            double: count(&raw.double),
            triple: count(&raw.triple),
            hr: count(&raw.hr),
            ab: count(&raw.ab),
            bb: count(&raw.bb),
            hbp: count(&raw.hbp),
            sf: count(&raw.sf),
        }
    }
}

impl From<RawSalary> for SalaryRow {
    fn from(raw: RawSalary) -> Self {
        SalaryRow {
            player_id: raw.player_id.trim().to_string(),
            team_id: raw.team_id.trim().to_string(),
            year: parse_year(raw.year.as_deref()),
            salary: parse_amount_or_default(raw.salary.as_deref(), 0.0),
        }
    }
}

impl From<RawTeam> for TeamRow {
    fn from(raw: RawTeam) -> Self {
        TeamRow {
            team_id: raw.team_id.trim().to_string(),
            name: raw.name.unwrap_or_default().trim().to_string(),
            year: parse_year(raw.year.as_deref()),
            w: parse_count_or_default(raw.w.as_deref(), 0),
            l: parse_count_or_default(raw.l.as_deref(), 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_rows_from_reader<R, Raw, Row>(rdr: R, kind: &str) -> Result<Vec<Row>, csv::Error>
where
    R: Read,
    Raw: for<'de> Deserialize<'de>,
    Row: From<Raw>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<Raw>() {
        match result {
            Ok(raw) => rows.push(Row::from(raw)),
            Err(e) => warn!("skipping malformed {} row: {}", kind, e),
        }
    }
    Ok(rows)
}

fn load_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<BattingRow>, csv::Error> {
    load_rows_from_reader::<R, RawBatting, BattingRow>(rdr, "batting")
}

fn load_salary_from_reader<R: Read>(rdr: R) -> Result<Vec<SalaryRow>, csv::Error> {
    load_rows_from_reader::<R, RawSalary, SalaryRow>(rdr, "salary")
}

fn load_teams_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamRow>, csv::Error> {
    load_rows_from_reader::<R, RawTeam, TeamRow>(rdr, "team")
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> LoadError + '_ {
    move |e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

/// Load player batting lines from a CSV file.
pub fn load_batting(path: &Path) -> Result<Vec<BattingRow>, LoadError> {
    load_batting_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load player salaries from a CSV file.
pub fn load_salaries(path: &Path) -> Result<Vec<SalaryRow>, LoadError> {
    load_salary_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load team names and season records from a CSV file.
pub fn load_teams(path: &Path) -> Result<Vec<TeamRow>, LoadError> {
    load_teams_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load all three datasets. A team path that is unset, or points at a file
/// that does not exist, yields an empty team dataset.
pub fn load_dataset(paths: &DataPaths) -> Result<Dataset, LoadError> {
    let batting = load_batting(Path::new(&paths.batting))?;
    let salary = load_salaries(Path::new(&paths.salary))?;
    let teams = match paths.team.as_deref().map(Path::new) {
        Some(path) if path.exists() => load_teams(path)?,
        Some(path) => {
            warn!("team file {} not found; team ids will be used as names", path.display());
            Vec::new()
        }
        None => Vec::new(),
    };

    info!(
        "Loaded {} batting rows, {} salary rows, {} team rows",
        batting.len(),
        salary.len(),
        teams.len()
    );

    Ok(Dataset::new(batting, salary, teams))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
