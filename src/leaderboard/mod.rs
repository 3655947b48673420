//! Global Scoreboard
//!
//! Turns the backend's player update message into ranked score tables.
//!
//! ## Wire Format
//!
//! ```text
//! {free text header}\n[[topRuns...], [lesserRuns...]]
//! ```
//!
//! ## Components
//!
//! - **Parser**: splits header from the JSON pair, degrading to empty lists
//! - **Renderer**: numbers rows by a weighted running position
//! - **ProgressTicker**: progress of a running update

mod parser;
mod progress;
mod render;
mod types;

pub use parser::parse_update_message;
pub use progress::{remaining_percent, ProgressTicker, PROGRESS_TICK, UPDATE_WINDOW};
pub use render::{
    format_position, render_score_table, round_position, PositionAccumulator, RenderedRow,
    RenderedScoreboard, ScoreSection, COLUMN_TITLES, LESSER_RUNS_LABEL, TOP_RUNS_LABEL,
};
pub use types::{Player, RunResult, ScoreDetails, UpdateMessage, UpdateResult, UpdateState};
