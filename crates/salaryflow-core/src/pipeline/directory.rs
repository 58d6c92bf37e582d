// Team id -> display name lookup.

use crate::data::records::TeamRow;
use std::collections::HashMap;

/// Display names keyed by team id. Unmapped ids display as themselves.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    names: HashMap<String, String>,
}

impl TeamDirectory {
    /// Build from team rows of any year. When an id appears more than once,
    /// the last row wins.
    pub fn from_rows(rows: &[TeamRow]) -> Self {
        let names = rows
            .iter()
            .map(|row| (row.team_id.clone(), row.display_name().to_string()))
            .collect();
        TeamDirectory { names }
    }

    pub fn name_for<'a>(&'a self, team_id: &'a str) -> &'a str {
        self.names.get(team_id).map(String::as_str).unwrap_or(team_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
