//! Playoff qualification from the standings document.

use serde_json::Value;
use tracing::info;

use super::report::{AssemblyReport, Diagnostic};
use crate::cli::types::{Season, TeamId};
use crate::error::Result;
use crate::nhl::http::{season_query, StatsSource, STANDINGS_PATH};
use crate::nhl::standings::{normalize_standings, QualificationGrid};
use crate::table::flatten::kind_of;
use crate::table::{ClinchStatus, SeasonSlice};

/// Key whose presence on a team record marks a clinch event (any kind).
pub const CLINCH_KEY: &str = "clinchIndicator";

/// Outcome counts of one qualification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualificationSummary {
    pub clinched: usize,
    pub not_clinched: usize,
    pub skipped: usize,
}

/// Team id and clinch status of one standings cell.
pub fn read_cell(cell: &Value) -> std::result::Result<(TeamId, ClinchStatus), String> {
    let Value::Object(record) = cell else {
        return Err(format!("expected an object, found {}", kind_of(cell)));
    };
    let team_id = record
        .get("team")
        .and_then(|t| t.get("id"))
        .and_then(TeamId::from_json)
        .ok_or_else(|| "missing team.id".to_string())?;

    let status = if record.contains_key(CLINCH_KEY) {
        ClinchStatus::Clinched
    } else {
        ClinchStatus::NotClinched
    };
    Ok((team_id, status))
}

/// Write clinch indicators from `grid` into `slice`.
///
/// Only populated cells are read. Teams never seen in a cell keep whatever
/// indicator they had. A team seen in several cells is `Clinched` if any of
/// them carries a clinch event. Only `clinch_indicator` is ever written; a
/// team missing from the roster is reported, never added.
pub fn apply_qualification(
    slice: &mut SeasonSlice,
    grid: &QualificationGrid,
    report: &mut AssemblyReport,
) -> QualificationSummary {
    let season = slice.season();
    let mut summary = QualificationSummary::default();
    let mut seen: Vec<(TeamId, ClinchStatus)> = Vec::new();

    for (group, slot, cell) in grid.populated_cells() {
        match read_cell(cell) {
            Ok((team_id, status)) => {
                match seen.iter_mut().find(|(id, _)| *id == team_id) {
                    Some(entry) if status == ClinchStatus::Clinched => entry.1 = status,
                    Some(_) => {}
                    None => seen.push((team_id, status)),
                }
            }
            Err(reason) => {
                summary.skipped += 1;
                report.record(Diagnostic::MalformedStandingsCell {
                    season,
                    group,
                    slot,
                    reason,
                });
            }
        }
    }

    for (team_id, status) in seen {
        let Some(record) = slice.get_mut(team_id) else {
            summary.skipped += 1;
            report.record(Diagnostic::UnknownStandingsTeam { season, team_id });
            continue;
        };
        record.clinch_indicator = Some(status);
        match status {
            ClinchStatus::Clinched => summary.clinched += 1,
            ClinchStatus::NotClinched => summary.not_clinched += 1,
        }
    }

    summary
}

/// Fetch the season's standings and mark each listed team's qualification.
///
/// A standings document that cannot be fetched or normalized fails the
/// whole pass; cell-level problems are only reported.
pub async fn mark_qualification<S>(
    source: &S,
    slice: &mut SeasonSlice,
    report: &mut AssemblyReport,
) -> Result<QualificationSummary>
where
    S: StatsSource + ?Sized,
{
    let season: Season = slice.season();
    let doc = source
        .get_json(STANDINGS_PATH, &season_query(season))
        .await?;
    let grid = normalize_standings(&doc)?;

    let summary = apply_qualification(slice, &grid, report);
    info!(
        season = %season,
        layout = %grid.layout,
        clinched = summary.clinched,
        not_clinched = summary.not_clinched,
        "playoff qualification marked"
    );
    Ok(summary)
}
