// Configuration loading and parsing (salaryflow.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the single configuration file under `config/`.
pub const CONFIG_FILE: &str = "salaryflow.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub data_paths: DataPaths,
    pub schema: Schema,
    pub default_year: Option<i32>,
    pub salary_bands: SalaryBands,
    pub performance: PerformanceConfig,
    pub win_percentage: WinPercentageBands,
}

// ---------------------------------------------------------------------------
// salaryflow.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire salaryflow.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataPaths,
    #[serde(default)]
    pipeline: PipelineSection,
    #[serde(default)]
    salary_bands: SalaryBands,
    #[serde(default)]
    performance: PerformanceConfig,
    #[serde(default)]
    win_percentage: WinPercentageBands,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PipelineSection {
    #[serde(default)]
    schema: Schema,
    default_year: Option<i32>,
}

/// Which input schema drives the flow diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// Team -> salary -> performance from player batting joined with salaries.
    #[default]
    PlayerBatting,
    /// Team -> salary -> win percentage from team season records.
    TeamRecord,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataPaths {
    pub batting: String,
    pub salary: String,
    /// The team file only supplies display names (and season records for the
    /// team-record schema), so it may be absent.
    #[serde(default)]
    pub team: Option<String>,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            batting: "data/batting.csv".into(),
            salary: "data/salary.csv".into(),
            team: Some("data/team.csv".into()),
        }
    }
}

impl DataPaths {
    /// Anchor relative paths at `base_dir`. Absolute paths pass through.
    pub fn resolve(&self, base_dir: &Path) -> DataPaths {
        let anchor = |p: &str| -> String {
            let path = Path::new(p);
            if path.is_absolute() {
                p.to_string()
            } else {
                base_dir.join(path).display().to_string()
            }
        };
        DataPaths {
            batting: anchor(&self.batting),
            salary: anchor(&self.salary),
            team: self.team.as_deref().map(anchor),
        }
    }
}

/// Average-salary cut points, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SalaryBands {
    pub high: f64,
    pub medium: f64,
}

impl Default for SalaryBands {
    fn default() -> Self {
        SalaryBands {
            high: 6_000_000.0,
            medium: 2_500_000.0,
        }
    }
}

/// Performance score weights and the percentile cut points used to derive
/// per-year thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub hits_weight: f64,
    pub doubles_weight: f64,
    pub medium_percentile: f64,
    pub high_percentile: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            hits_weight: 0.5,
            doubles_weight: 1.0,
            medium_percentile: 0.33,
            high_percentile: 0.67,
        }
    }
}

/// Win-percentage cut points for the team-record schema.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WinPercentageBands {
    pub high: f64,
    pub medium: f64,
}

impl Default for WinPercentageBands {
    fn default() -> Self {
        WinPercentageBands {
            high: 0.6,
            medium: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/salaryflow.toml` relative to
/// the given `base_dir`. Relative data paths are anchored at `base_dir`.
///
/// This does not auto-copy defaults; prefer `load_config_in()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        data_paths: file.data.resolve(base_dir),
        schema: file.pipeline.schema,
        default_year: file.pipeline.default_year,
        salary_bands: file.salary_bands,
        performance: file.performance,
        win_percentage: file.win_percentage,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Copy missing defaults into `base_dir/config/`, then load from there.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

/// Convenience wrapper: loads config from the resolved base directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_in(&resolve_base_dir()?)
}

/// The working directory when it carries `config/` or `defaults/`, otherwise
/// the platform configuration directory for salaryflow.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    match directories::ProjectDirs::from("", "", "salaryflow") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Ok(cwd),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let bands = &config.salary_bands;
    for (name, val) in [("salary_bands.high", bands.high), ("salary_bands.medium", bands.medium)] {
        if !val.is_finite() || val <= 0.0 {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }
    if bands.medium > bands.high {
        return Err(invalid(
            "salary_bands.medium",
            format!("must not exceed salary_bands.high ({}), got {}", bands.high, bands.medium),
        ));
    }

    let perf = &config.performance;
    for (name, val) in [
        ("performance.hits_weight", perf.hits_weight),
        ("performance.doubles_weight", perf.doubles_weight),
    ] {
        if !val.is_finite() || val < 0.0 {
            return Err(invalid(name, format!("must be >= 0, got {val}")));
        }
    }
    for (name, val) in [
        ("performance.medium_percentile", perf.medium_percentile),
        ("performance.high_percentile", perf.high_percentile),
    ] {
        if !(0.0..1.0).contains(&val) {
            return Err(invalid(name, format!("must be in [0.0, 1.0), got {val}")));
        }
    }
    if perf.medium_percentile > perf.high_percentile {
        return Err(invalid(
            "performance.medium_percentile",
            format!(
                "must not exceed performance.high_percentile ({}), got {}",
                perf.high_percentile, perf.medium_percentile
            ),
        ));
    }

    let win = &config.win_percentage;
    for (name, val) in [("win_percentage.high", win.high), ("win_percentage.medium", win.medium)] {
        if !(0.0..=1.0).contains(&val) {
            return Err(invalid(name, format!("must be between 0.0 and 1.0 inclusive, got {val}")));
        }
    }
    if win.medium > win.high {
        return Err(invalid(
            "win_percentage.medium",
            format!("must not exceed win_percentage.high ({}), got {}", win.high, win.medium),
        ));
    }

    if config.data_paths.batting.trim().is_empty() {
        return Err(invalid("data.batting", "must not be empty"));
    }
    if config.data_paths.salary.trim().is_empty() {
        return Err(invalid("data.salary", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
