//! Per-season team roster.

use serde_json::Value;
use tracing::{debug, info};

use crate::cli::types::{Season, TeamId};
use crate::error::{Result, StatsError};
use crate::nhl::http::{season_query, StatsSource, TEAMS_PATH};
use crate::table::{flatten_records, SeasonSlice, TeamSeasonRecord, RESERVED_COLUMNS};

/// Display-only team fields that are dropped from the roster.
pub const DESCRIPTIVE_COLUMNS: &[&str] = &[
    "name",
    "teamName",
    "locationName",
    "venue",
    "division",
    "conference",
    "franchise",
    "shortName",
    "officialSiteUrl",
];

/// Fetch the team listing for `season` and turn it into a season slice.
///
/// Every row has its `link`, no stats and an unset clinch indicator. An empty
/// listing is a [`StatsError::SourceUnavailable`]: nothing downstream can run
/// without the teams.
pub async fn fetch_roster<S>(source: &S, season: Season) -> Result<SeasonSlice>
where
    S: StatsSource + ?Sized,
{
    let doc = source.get_json(TEAMS_PATH, &season_query(season)).await?;
    let slice = build_roster(&doc, season)?;
    info!(season = %season, teams = slice.len(), "roster loaded");
    Ok(slice)
}

/// Build a season slice from a `/teams` document.
pub fn build_roster(doc: &Value, season: Season) -> Result<SeasonSlice> {
    let teams = flatten_records(doc, "teams")?;
    if teams.is_empty() {
        return Err(StatsError::unavailable(
            format!("{TEAMS_PATH}?season={season}"),
            "empty team list",
        ));
    }

    let mut slice = SeasonSlice::new(season);
    for (idx, row) in teams.rows.into_iter().enumerate() {
        let team_id = row
            .get("id")
            .and_then(TeamId::from_json)
            .ok_or_else(|| StatsError::shape(format!("teams[{idx}].id"), "missing team id"))?;
        let link = row
            .get("link")
            .and_then(Value::as_str)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| StatsError::shape(format!("teams[{idx}].link"), "missing team link"))?
            .to_string();

        let mut record = TeamSeasonRecord::new(team_id, season, link);
        for (key, value) in row {
            if key == "id" || key == "link" || DESCRIPTIVE_COLUMNS.contains(&key.as_str()) {
                continue;
            }
            // would collide with a column every row already carries
            if RESERVED_COLUMNS.contains(&key.as_str()) {
                debug!(season = %season, team_id = %team_id, field = %key, "roster field dropped");
                continue;
            }
            record.attributes.insert(key, value);
        }
        debug!(season = %season, team_id = %team_id, "roster row");
        slice.insert(record)?;
    }

    Ok(slice)
}
