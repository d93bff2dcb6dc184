//! Team statistics: schema discovery and per-team enrichment.
//!
//! A team's stats document looks like
//! `{ stats: [ { splits: [ { stat: { <name>: <value>, ... } } ] } ] }`;
//! only the first split of the first stats entry is used.

use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use super::report::{AssemblyReport, Diagnostic};
use crate::cli::types::{Season, TeamId};
use crate::error::{Result, StatsError};
use crate::nhl::http::{season_query, team_stats_path, StatsSource};
use crate::table::flatten::{flatten_records, kind_of, locate};
use crate::table::{SeasonSlice, StatSchema};

const STAT_PATH: &str = "stats.0.splits.0.stat";

/// How many teams to probe when discovering a season's stat columns.
///
/// The schema is the union of the probed teams' stat names, in probe order.
/// The first probed team must succeed; later probes only widen the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaProbe {
    pub teams: usize,
}

impl Default for SchemaProbe {
    fn default() -> Self {
        Self { teams: 1 }
    }
}

/// The flat `stat` object of a team stats document.
pub fn stat_block(doc: &Value) -> Result<&Map<String, Value>> {
    flatten_records(doc, "stats")?.first_row("stats")?;
    flatten_records(doc, "stats.0.splits")?.first_row("stats.0.splits")?;

    match locate(doc, STAT_PATH)? {
        Value::Object(map) => Ok(map),
        other => Err(StatsError::shape(
            STAT_PATH,
            format!("expected an object, found {}", kind_of(other)),
        )),
    }
}

/// Stat column names of a team stats document, in document order.
pub fn discover_schema(doc: &Value) -> Result<StatSchema> {
    let block = stat_block(doc)?;
    if block.is_empty() {
        return Err(StatsError::shape(STAT_PATH, "no statistics in stat block"));
    }
    Ok(StatSchema::from_names(block.keys().cloned()))
}

/// Convert one stat value to a float.
///
/// Numbers pass through; numeric strings (optionally ending in `%`) are
/// parsed; `null` means "no value" and yields `None`. Anything else fails,
/// including strings that parse to NaN or an infinity.
pub fn coerce_stat(team_id: TeamId, name: &str, value: &Value) -> Result<Option<f64>> {
    let failure = || StatsError::TypeCoercion {
        team_id: team_id.as_u32(),
        stat: name.to_string(),
        value: value.to_string(),
    };

    if value.is_null() {
        return Ok(None);
    }

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let s = s.strip_suffix('%').unwrap_or(s).trim_end();
            s.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(failure)
}

/// Coerce a whole stat block. One bad value fails the whole block.
pub fn coerce_stat_block(
    team_id: TeamId,
    block: &Map<String, Value>,
) -> Result<BTreeMap<String, Option<f64>>> {
    block
        .iter()
        .map(|(name, value)| Ok((name.clone(), coerce_stat(team_id, name, value)?)))
        .collect()
}

async fn fetch_stats_doc<S>(source: &S, season: Season, link: &str) -> Result<Value>
where
    S: StatsSource + ?Sized,
{
    source
        .get_json(&team_stats_path(link), &season_query(season))
        .await
}

/// Discover the season's stat columns and add them, zero-valued, to every row.
///
/// Probes the first `probe.teams` rows in roster order. If the first probe
/// fails (unreachable, or no stats for the season) the error is returned and
/// the slice is left untouched.
pub async fn initialize_stat_columns<S>(
    source: &S,
    slice: &mut SeasonSlice,
    probe: SchemaProbe,
    report: &mut AssemblyReport,
) -> Result<StatSchema>
where
    S: StatsSource + ?Sized,
{
    let season = slice.season();
    let probes: Vec<(TeamId, String)> = slice
        .records()
        .iter()
        .take(probe.teams.max(1))
        .map(|r| (r.team_id, r.link.clone()))
        .collect();

    let Some(((first_id, first_link), rest)) = probes.split_first() else {
        return Err(StatsError::shape("teams", "no team to probe for stat columns"));
    };

    debug!(season = %season, team_id = %first_id, "probing stat columns");
    let doc = fetch_stats_doc(source, season, first_link).await?;
    let mut schema = discover_schema(&doc)?;

    for (team_id, link) in rest {
        let discovered = match fetch_stats_doc(source, season, link).await {
            Ok(doc) => discover_schema(&doc),
            Err(e) => Err(e),
        };
        match discovered {
            Ok(more) => schema.union(&more),
            Err(e) => report.record(Diagnostic::StatsUnavailable {
                season,
                team_id: *team_id,
                reason: e.to_string(),
            }),
        }
    }

    slice.widen(&schema);
    info!(season = %season, columns = schema.len(), "stat columns initialized");
    Ok(schema)
}

/// Outcome counts of one [`enrich_stats`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub enriched: usize,
    pub failed: usize,
}

/// Fetch every team's stats and write them into its row, by team id.
///
/// Up to `concurrency` requests run at once; results are written by this
/// task alone once they are in. Rows are first widened to `schema` so every
/// row carries every column. A team whose stats cannot be fetched or
/// coerced keeps its previous values and gets a diagnostic; stat names
/// outside `schema` are reported as drift and not written.
pub async fn enrich_stats<S>(
    source: &S,
    slice: &mut SeasonSlice,
    schema: &StatSchema,
    concurrency: usize,
    report: &mut AssemblyReport,
) -> EnrichSummary
where
    S: StatsSource + ?Sized,
{
    let season = slice.season();
    slice.widen(schema);

    let jobs: Vec<(TeamId, String)> = slice
        .records()
        .iter()
        .map(|r| (r.team_id, r.link.clone()))
        .collect();

    let mut results: HashMap<TeamId, Result<BTreeMap<String, Option<f64>>>> = stream::iter(jobs)
        .map(|(team_id, link)| async move {
            let values = match fetch_stats_doc(source, season, &link).await {
                Ok(doc) => stat_block(&doc).and_then(|block| coerce_stat_block(team_id, block)),
                Err(e) => Err(e),
            };
            (team_id, values)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut summary = EnrichSummary::default();
    for team_id in slice.team_ids() {
        let Some(outcome) = results.remove(&team_id) else {
            continue;
        };
        let values = match outcome {
            Ok(values) => values,
            Err(StatsError::TypeCoercion { stat, value, .. }) => {
                summary.failed += 1;
                report.record(Diagnostic::CoercionFailure {
                    season,
                    team_id,
                    stat,
                    value,
                });
                continue;
            }
            Err(e) => {
                summary.failed += 1;
                report.record(Diagnostic::StatsUnavailable {
                    season,
                    team_id,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let Some(record) = slice.get_mut(team_id) else {
            continue;
        };
        for (stat, value) in values {
            if !schema.contains(&stat) {
                report.record(Diagnostic::SchemaDrift {
                    season,
                    team_id,
                    stat,
                });
                continue;
            }
            if let Some(v) = value {
                record.stats.insert(stat, v);
            }
        }
        summary.enriched += 1;
    }

    info!(
        season = %season,
        enriched = summary.enriched,
        failed = summary.failed,
        "team stats written"
    );
    summary
}
