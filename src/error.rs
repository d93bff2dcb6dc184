//! Error types for the NHL team stats pipeline

use thiserror::Error;


pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    /// The API could not be reached, answered with an error status, or
    /// returned a body that was not usable at the top level.
    #[error("Stats source unavailable ({url}): {reason}")]
    SourceUnavailable { url: String, reason: String },

    /// An expected nested key path was absent, or the value found there was
    /// not the list-of-objects / object that the caller needed.
    #[error("Unexpected response shape at `{path}`: {reason}")]
    ShapeMismatch { path: String, reason: String },

    #[error("Statistic `{stat}` for team {team_id} is not numeric: {value}")]
    TypeCoercion {
        team_id: u32,
        stat: String,
        value: String,
    },

    #[error("Invalid season: {input}")]
    InvalidSeason { input: String },

    #[error("Invalid year range: min year {min_year} must be below max year {max_year}")]
    InvalidYearRange { min_year: u16, max_year: u16 },

    #[error("Failed to parse integer: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    pub(crate) fn shape(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StatsError::ShapeMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(url: impl Into<String>, reason: impl ToString) -> Self {
        StatsError::SourceUnavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that invalidate a whole season rather than one row.
    pub fn is_season_fatal(&self) -> bool {
        matches!(
            self,
            StatsError::SourceUnavailable { .. } | StatsError::ShapeMismatch { .. }
        )
    }
}
