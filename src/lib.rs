//! NHL Team Season Stats Library
//!
//! Builds a season-by-season table of NHL team statistics from the NHL stats
//! API: one row per (team, season) with the team's link, every statistic the
//! API reports for the season, and a playoff clinch indicator.
//!
//! ## Pipeline
//!
//! - **Roster**: `/teams?season=…` flattened into one row per team
//! - **Stat columns**: discovered once from a probe team's stats, added zero-valued to every row
//! - **Team stats**: fetched per team (concurrently) and written by team id
//! - **Qualification**: standings normalized into a group × slot grid, then a
//!   clinch indicator (`1` clinched, `0` listed without a clinch, unset when not listed)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nhl_team_stats::{nhl::HttpStatsClient, pipeline::build_table, NHL_BASE_URL};
//!
//! # async fn example() -> nhl_team_stats::Result<()> {
//! let client = HttpStatsClient::new(NHL_BASE_URL)?;
//! let assembly = build_table(&client, 2015, 2017).await?;
//!
//! for row in assembly.table.rows() {
//!     println!("{} {} wins={:?}", row.season, row.team_id, row.stat("wins"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Point the client at a mirror or recorded API:
//! ```bash
//! export NHL_STATS_BASE_URL=http://localhost:8080
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod nhl;
pub mod pipeline;
pub mod table;

// Re-export commonly used types
pub use cli::types::{Season, TeamId};
pub use error::{Result, StatsError};
pub use nhl::http::NHL_BASE_URL;
pub use table::{ClinchStatus, StatSchema, TeamSeasonRecord, TeamStatsTable};

pub const BASE_URL_ENV_VAR: &str = "NHL_STATS_BASE_URL";
