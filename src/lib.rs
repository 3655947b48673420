//! # Runboard
//!
//! Speedrun scoreboard dashboard and tournament scheduler client.
//!
//! ## Features
//!
//! - **Scoreboard**: parse player update messages into ranked score tables
//! - **Scheduler**: time slots with capacity rules and registration links
//! - **Registration**: form state with capacity-conflict repair on 507
//! - **Backend client**: typed REST client with request ids and bearer auth
//!
//! ## Modules
//!
//! - [`leaderboard`]: Update message parsing, weighted positions, progress timer
//! - [`schedule`]: Schedules, time slots, registrations and their rules
//! - [`api`]: REST client for the backend
//! - [`datetime`]: Slot date/time helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use runboard::leaderboard::{parse_update_message, render_score_table};
//!
//! let raw = "Updated Ava\n[[{\"gameName\":\"Celeste\",\"categoryName\":\"Any%\",\"levelFraction\":1,\"points\":12.5}],[]]";
//! let scoreboard = render_score_table(&parse_update_message(raw));
//!
//! assert_eq!(scoreboard.header, "Updated Ava");
//! assert_eq!(scoreboard.positions(), vec!["1"]);
//! ```

pub mod api;
pub mod config;
pub mod datetime;
pub mod leaderboard;
pub mod logging;
pub mod schedule;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiClientConfig, ApiError, ApiResult};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};

pub use leaderboard::{
    parse_update_message, render_score_table, Player, ProgressTicker, RenderedScoreboard,
    RunResult, UpdateMessage, UpdateResult, UpdateState,
};

pub use schedule::{
    RegistrationBackend, RegistrationLink, RegistrationSession, Schedule, ScheduleError,
    ScheduleResult, SlotAvailability, SubmitOutcome, TimeSlot,
};
