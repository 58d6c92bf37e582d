// Typed input rows and the coercion rules applied at the ingestion boundary.
//
// CSV columns arrive as loosely formatted text. Every numeric field is
// coerced exactly once, here, so the pipeline never re-parses strings.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Parse the leading integer of `text`: optional whitespace, an optional
/// sign, then ASCII digits. Trailing garbage is ignored ("2004abc" -> 2004,
/// "12.7" -> 12). Returns `None` when no digits lead the text.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Season year of a row. Rows whose year does not parse never match any
/// requested year and never contribute to the year index.
pub fn parse_year(field: Option<&str>) -> Option<i32> {
    field
        .and_then(parse_leading_int)
        .and_then(|y| i32::try_from(y).ok())
}

/// Non-negative counting stat. Missing or unparseable text yields `default`;
/// negative values clamp to zero.
pub fn parse_count_or_default(field: Option<&str>, default: u32) -> u32 {
    match field.and_then(parse_leading_int) {
        Some(n) if n < 0 => 0,
        Some(n) => u32::try_from(n).unwrap_or(default),
        None => default,
    }
}

/// Non-negative dollar amount. Missing, unparseable, non-finite or negative
/// text yields `default`.
pub fn parse_amount_or_default(field: Option<&str>, default: f64) -> f64 {
    let Some(text) = field.map(str::trim) else {
        return default;
    };
    let parsed = text
        .parse::<f64>()
        .ok()
        .or_else(|| parse_leading_int(text).map(|n| n as f64));
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => default,
    }
}

// ---------------------------------------------------------------------------
// Year-keyed rows
// ---------------------------------------------------------------------------

/// Any input row that belongs to a season.
pub trait YearKeyed {
    fn year(&self) -> Option<i32>;

    fn in_year(&self, year: i32) -> bool {
        self.year() == Some(year)
    }
}

// ---------------------------------------------------------------------------
// Typed rows
// ---------------------------------------------------------------------------

/// One player's batting line for one team-season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingRow {
    pub player_id: String,
    pub team_id: String,
    pub year: Option<i32>,
    pub h: u32,
    pub double: u32,
    pub triple: u32,
    pub hr: u32,
    pub ab: u32,
    pub bb: u32,
    pub hbp: u32,
    pub sf: u32,
}

impl BattingRow {
    /// Minimal row carrying only the fields the flow pipeline reads.
    pub fn new(player_id: &str, team_id: &str, year: i32, h: u32, double: u32) -> Self {
        BattingRow {
            player_id: player_id.into(),
            team_id: team_id.into(),
            year: Some(year),
            h,
            double,
            triple: 0,
            hr: 0,
            ab: 0,
            bb: 0,
            hbp: 0,
            sf: 0,
        }
    }
}

impl YearKeyed for BattingRow {
    fn year(&self) -> Option<i32> {
        self.year
    }
}

/// One player's salary for one team-season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRow {
    pub player_id: String,
    pub team_id: String,
    pub year: Option<i32>,
    pub salary: f64,
}

impl SalaryRow {
    pub fn new(player_id: &str, team_id: &str, year: i32, salary: f64) -> Self {
        SalaryRow {
            player_id: player_id.into(),
            team_id: team_id.into(),
            year: Some(year),
            salary,
        }
    }
}

impl YearKeyed for SalaryRow {
    fn year(&self) -> Option<i32> {
        self.year
    }
}

/// A team season: display name plus the win/loss record used by the
/// team-record schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub team_id: String,
    pub name: String,
    pub year: Option<i32>,
    pub w: u32,
    pub l: u32,
}

impl TeamRow {
    /// Name-only row, as used for display-name lookup.
    pub fn named(team_id: &str, name: &str) -> Self {
        TeamRow {
            team_id: team_id.into(),
            name: name.into(),
            year: None,
            w: 0,
            l: 0,
        }
    }

    pub fn season(team_id: &str, name: &str, year: i32, w: u32, l: u32) -> Self {
        TeamRow {
            team_id: team_id.into(),
            name: name.into(),
            year: Some(year),
            w,
            l,
        }
    }

    /// The name shown on diagrams: the team's name, or its id when blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.team_id
        } else {
            &self.name
        }
    }
}

impl YearKeyed for TeamRow {
    fn year(&self) -> Option<i32> {
        self.year
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
