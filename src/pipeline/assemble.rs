//! Season-by-season assembly of the final table.

use tracing::{error, info, info_span, Instrument};

use super::playoffs::mark_qualification;
use super::report::{AssemblyReport, Diagnostic};
use super::roster::fetch_roster;
use super::stats::{enrich_stats, initialize_stat_columns, SchemaProbe};
use crate::cli::types::Season;
use crate::error::{Result, StatsError};
use crate::nhl::http::StatsSource;
use crate::table::{SeasonSlice, StatSchema, TeamStatsTable};

/// Default number of concurrent team stats requests.
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Upper bound on in-flight team stats requests.
    pub concurrency: usize,
    pub schema_probe: SchemaProbe,
    /// Leave out seasons that hit a season-fatal error instead of failing the build.
    pub skip_failed_seasons: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            schema_probe: SchemaProbe::default(),
            skip_failed_seasons: false,
        }
    }
}

/// The assembled table plus everything noteworthy that happened on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub table: TeamStatsTable,
    pub report: AssemblyReport,
}

/// Builds the multi-season table from a [`StatsSource`].
pub struct SeasonAssembler<'a, S: ?Sized> {
    source: &'a S,
    options: AssembleOptions,
}

impl<'a, S> SeasonAssembler<'a, S>
where
    S: StatsSource + ?Sized,
{
    pub fn new(source: &'a S) -> Self {
        Self::with_options(source, AssembleOptions::default())
    }

    pub fn with_options(source: &'a S, options: AssembleOptions) -> Self {
        Self { source, options }
    }

    /// Assemble every season starting in `[min_year, max_year)`.
    ///
    /// The first season that completes fixes the stat schema; every later
    /// season is widened to it. Seasons are appended in year order.
    pub async fn build_table(&self, min_year: u16, max_year: u16) -> Result<Assembly> {
        if min_year >= max_year {
            return Err(StatsError::InvalidYearRange { min_year, max_year });
        }

        let mut table: Option<TeamStatsTable> = None;
        let mut report = AssemblyReport::new();

        for year in min_year..max_year {
            let season = Season::new(year);
            let established = table.as_ref().map(|t| t.schema().clone());

            let span = info_span!("season", season = %season);
            let outcome = self
                .assemble_season(season, established.as_ref(), &mut report)
                .instrument(span)
                .await;

            match outcome {
                Ok((slice, schema)) => {
                    table
                        .get_or_insert_with(|| TeamStatsTable::new(schema))
                        .append(slice)?;
                }
                Err(e) if self.options.skip_failed_seasons && e.is_season_fatal() => {
                    report.record(Diagnostic::SeasonSkipped {
                        season,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    error!(season = %season, error = %e, "season failed");
                    return Err(e);
                }
            }
        }

        let table = table.unwrap_or_default();
        info!(
            rows = table.len(),
            columns = table.schema().len(),
            diagnostics = report.len(),
            "table assembled"
        );
        Ok(Assembly { table, report })
    }

    /// Roster, schema (first season only), stats, then qualification for one season.
    pub async fn assemble_season(
        &self,
        season: Season,
        established: Option<&StatSchema>,
        report: &mut AssemblyReport,
    ) -> Result<(SeasonSlice, StatSchema)> {
        let mut slice = fetch_roster(self.source, season).await?;

        let schema = match established {
            Some(schema) => schema.clone(),
            None => {
                initialize_stat_columns(self.source, &mut slice, self.options.schema_probe, report)
                    .await?
            }
        };

        enrich_stats(
            self.source,
            &mut slice,
            &schema,
            self.options.concurrency,
            report,
        )
        .await;
        mark_qualification(self.source, &mut slice, report).await?;

        Ok((slice, schema))
    }
}

/// Assemble `[min_year, max_year)` with default options.
pub async fn build_table<S>(source: &S, min_year: u16, max_year: u16) -> Result<Assembly>
where
    S: StatsSource + ?Sized,
{
    SeasonAssembler::new(source)
        .build_table(min_year, max_year)
        .await
}
