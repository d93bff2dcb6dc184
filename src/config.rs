//! Pull configuration and its resolution from flags and environment.

use std::path::PathBuf;

use crate::error::{Result, StatsError};
use crate::nhl::http::NHL_BASE_URL;
use crate::pipeline::{AssembleOptions, SchemaProbe};
use crate::pipeline::assemble::DEFAULT_CONCURRENCY;
use crate::BASE_URL_ENV_VAR;

pub const DEFAULT_MIN_YEAR: u16 = 2009;
pub const DEFAULT_MAX_YEAR: u16 = 2019;

/// Everything needed to run one pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullConfig {
    pub base_url: String,
    /// First season start year (inclusive).
    pub min_year: u16,
    /// Last season start year (exclusive).
    pub max_year: u16,
    pub concurrency: usize,
    pub schema_probe_teams: usize,
    pub skip_failed_seasons: bool,
    /// Persist raw responses here when set.
    pub cache_dir: Option<PathBuf>,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            base_url: NHL_BASE_URL.to_string(),
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            concurrency: DEFAULT_CONCURRENCY,
            schema_probe_teams: 1,
            skip_failed_seasons: false,
            cache_dir: None,
        }
    }
}

impl PullConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_year >= self.max_year {
            return Err(StatsError::InvalidYearRange {
                min_year: self.min_year,
                max_year: self.max_year,
            });
        }
        Ok(())
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            concurrency: self.concurrency.max(1),
            schema_probe: SchemaProbe {
                teams: self.schema_probe_teams.max(1),
            },
            skip_failed_seasons: self.skip_failed_seasons,
        }
    }
}

/// Pick the API base URL: explicit value, then `NHL_STATS_BASE_URL`, then the public host.
pub fn resolve_base_url(base_url: Option<String>) -> String {
    base_url
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            std::env::var(BASE_URL_ENV_VAR)
                .ok()
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| NHL_BASE_URL.to_string())
}
