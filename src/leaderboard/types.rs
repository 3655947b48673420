//! Leaderboard data types
//!
//! - `RunResult`: one scored run as sent by the backend
//! - `ScoreDetails`: the `[topRuns, lesserRuns]` JSON pair
//! - `UpdateMessage`: a parsed update message (header + rows)
//! - `UpdateResult`: the `{state, message}` envelope of a player update

use serde::{Deserialize, Serialize};

/// A single scored run (one leaderboard row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub game_name: String,
    pub category_name: String,
    /// Present only for individual-level runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    /// Weight of this run relative to a full-game run, in (0, 1]
    pub level_fraction: f64,
    /// Score already computed by the backend
    pub points: f64,
}

impl RunResult {
    /// Create a full-game run
    pub fn new(game_name: impl Into<String>, category_name: impl Into<String>, points: f64) -> Self {
        Self {
            game_name: game_name.into(),
            category_name: category_name.into(),
            level_name: None,
            level_fraction: 1.0,
            points,
        }
    }

    /// Builder method: mark as an individual-level run
    pub fn level(mut self, level_name: impl Into<String>, level_fraction: f64) -> Self {
        self.level_name = Some(level_name.into());
        self.level_fraction = level_fraction;
        self
    }

    /// Builder method: override the level fraction
    pub fn fraction(mut self, level_fraction: f64) -> Self {
        self.level_fraction = level_fraction;
        self
    }

    /// `"{game} - {category}"`, with `" ({level})"` appended for non-empty levels
    pub fn description(&self) -> String {
        match self.level_name.as_deref() {
            Some(level) if !level.is_empty() => {
                format!("{} - {} ({})", self.game_name, self.category_name, level)
            }
            _ => format!("{} - {}", self.game_name, self.category_name),
        }
    }
}

/// The JSON block of an update message: `[topRuns, lesserRuns]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails(pub Vec<RunResult>, pub Vec<RunResult>);

/// A parsed leaderboard update message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMessage {
    /// Free text preceding the first newline
    pub header: String,
    /// Best runs ("Top 100 runs")
    pub top_runs: Vec<RunResult>,
    /// Remaining runs, continuing the same ranking
    pub lesser_runs: Vec<RunResult>,
    /// Cells of an old pipe-delimited table, only filled when the
    /// remainder is not the JSON pair
    pub legacy_rows: Vec<Vec<String>>,
}

impl UpdateMessage {
    /// Message with only a header and structured rows
    pub fn new(header: impl Into<String>, top_runs: Vec<RunResult>, lesser_runs: Vec<RunResult>) -> Self {
        Self {
            header: header.into(),
            top_runs,
            lesser_runs,
            legacy_rows: Vec::new(),
        }
    }

    /// True when no table section would be rendered
    pub fn has_no_rows(&self) -> bool {
        self.top_runs.is_empty() && self.lesser_runs.is_empty() && self.legacy_rows.is_empty()
    }

    /// Encode back into the `"{header}\n{json}"` wire format
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        let details = ScoreDetails(self.top_runs.clone(), self.lesser_runs.clone());
        Ok(format!("{}\n{}", self.header, serde_json::to_string(&details)?))
    }
}

/// Outcome category of a player update, used to pick the alert style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Success,
    Warning,
    Danger,
}

impl std::fmt::Display for UpdateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateState::Success => write!(f, "success"),
            UpdateState::Warning => write!(f, "warning"),
            UpdateState::Danger => write!(f, "danger"),
        }
    }
}

/// Response of `POST players/{nameOrId}/update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub state: UpdateState,
    /// Raw update message, see [`crate::leaderboard::parse_update_message`]
    pub message: String,
}

/// A player as listed on the global scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub last_update: Option<String>,
}
