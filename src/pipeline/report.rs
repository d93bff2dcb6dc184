//! Non-fatal findings collected while assembling the table.

use std::fmt;
use tracing::warn;

use crate::cli::types::{Season, TeamId};

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A team's stats carried a name the season schema does not have; the value was ignored.
    SchemaDrift {
        season: Season,
        team_id: TeamId,
        stat: String,
    },
    /// A stat value was not numeric; the team's row kept its previous values.
    CoercionFailure {
        season: Season,
        team_id: TeamId,
        stat: String,
        value: String,
    },
    /// The team's stats document could not be fetched or navigated.
    StatsUnavailable {
        season: Season,
        team_id: TeamId,
        reason: String,
    },
    /// The standings named a team that is not in the season roster.
    UnknownStandingsTeam { season: Season, team_id: TeamId },
    /// A populated standings cell had no usable `team.id`.
    MalformedStandingsCell {
        season: Season,
        group: usize,
        slot: usize,
        reason: String,
    },
    /// A season-fatal error was hit and the season was left out.
    SeasonSkipped { season: Season, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SchemaDrift {
                season,
                team_id,
                stat,
            } => write!(
                f,
                "season {season}: team {team_id} reported stat `{stat}` missing from the season schema; ignored"
            ),
            Diagnostic::CoercionFailure {
                season,
                team_id,
                stat,
                value,
            } => write!(
                f,
                "season {season}: team {team_id} stat `{stat}` is not numeric ({value}); row left at defaults"
            ),
            Diagnostic::StatsUnavailable {
                season,
                team_id,
                reason,
            } => write!(
                f,
                "season {season}: no stats for team {team_id}: {reason}"
            ),
            Diagnostic::UnknownStandingsTeam { season, team_id } => write!(
                f,
                "season {season}: standings reference team {team_id} which is not in the roster"
            ),
            Diagnostic::MalformedStandingsCell {
                season,
                group,
                slot,
                reason,
            } => write!(
                f,
                "season {season}: standings cell ({group}, {slot}) unusable: {reason}"
            ),
            Diagnostic::SeasonSkipped { season, reason } => {
                write!(f, "season {season} skipped: {reason}")
            }
        }
    }
}

/// Ordered list of diagnostics. Every entry is logged at `warn` when recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    diagnostics: Vec<Diagnostic>,
}

impl AssemblyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn for_season(&self, season: Season) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.season() == season)
    }
}

impl Diagnostic {
    pub fn season(&self) -> Season {
        match self {
            Diagnostic::SchemaDrift { season, .. }
            | Diagnostic::CoercionFailure { season, .. }
            | Diagnostic::StatsUnavailable { season, .. }
            | Diagnostic::UnknownStandingsTeam { season, .. }
            | Diagnostic::MalformedStandingsCell { season, .. }
            | Diagnostic::SeasonSkipped { season, .. } => *season,
        }
    }
}
