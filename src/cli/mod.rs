//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::Season;

use crate::config::{resolve_base_url, PullConfig, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};
use crate::core::default_cache_dir;
use crate::pipeline::assemble::DEFAULT_CONCURRENCY;

/// Connection arguments shared between commands
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// API base URL (or set `NHL_STATS_BASE_URL` env var).
    #[clap(long)]
    pub base_url: Option<String>,

    /// Persist raw API responses and reuse them on later runs.
    #[clap(long)]
    pub cache: bool,

    /// Directory for `--cache` (defaults to the user cache directory).
    #[clap(long, requires = "cache")]
    pub cache_dir: Option<PathBuf>,
}

impl SourceArgs {
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        self.cache
            .then(|| self.cache_dir.clone().unwrap_or_else(default_cache_dir))
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the team-season table for every season starting in `[min-year, max-year)`.
    ///
    /// Fetches each season's roster, per-team stats and standings, and prints
    /// one line per team-season (or the whole table as JSON).
    Pull {
        #[clap(flatten)]
        source: SourceArgs,

        /// First season start year (inclusive).
        #[clap(long, default_value_t = DEFAULT_MIN_YEAR)]
        min_year: u16,

        /// Last season start year (exclusive).
        #[clap(long, default_value_t = DEFAULT_MAX_YEAR)]
        max_year: u16,

        /// Maximum concurrent team stats requests.
        #[clap(long, short = 'j', default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Number of teams whose stat names form the column schema.
        #[clap(long, default_value_t = 1)]
        probe_teams: usize,

        /// Leave out seasons that fail instead of aborting.
        #[clap(long)]
        skip_failed_seasons: bool,

        /// Output the table as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// List the teams of one season.
    Teams {
        #[clap(flatten)]
        source: SourceArgs,

        /// Season, as `20152016` or `2015`.
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "nhl-team-stats", about = "NHL team season statistics table builder")]
pub struct NhlStats {
    /// Log debug output (overridden by `RUST_LOG`).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Build a [`PullConfig`] from `pull` arguments.
pub fn pull_config(
    source: &SourceArgs,
    min_year: u16,
    max_year: u16,
    concurrency: usize,
    probe_teams: usize,
    skip_failed_seasons: bool,
) -> PullConfig {
    PullConfig {
        base_url: resolve_base_url(source.base_url.clone()),
        min_year,
        max_year,
        concurrency,
        schema_probe_teams: probe_teams,
        skip_failed_seasons,
        cache_dir: source.resolved_cache_dir(),
    }
}
