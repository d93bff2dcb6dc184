//! Entry point: parse CLI, set up logging and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use nhl_team_stats::{
    cli::{pull_config, Commands, NhlStats, SourceArgs},
    config::{resolve_base_url, PullConfig},
    core::ResponseCache,
    nhl::HttpStatsClient,
    pipeline::{fetch_roster, AssemblyReport, SeasonAssembler},
    Season, TeamStatsTable,
};
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn client_for(base_url: &str, cache_dir: Option<&std::path::Path>) -> Result<HttpStatsClient> {
    let mut cache = ResponseCache::default();
    if let Some(dir) = cache_dir {
        cache = cache.with_disk_dir(dir);
    }
    Ok(HttpStatsClient::new(base_url)?.with_cache(cache))
}

async fn run_pull(config: PullConfig, as_json: bool) -> Result<()> {
    config.validate()?;
    let client = client_for(&config.base_url, config.cache_dir.as_deref())?;

    let assembly = SeasonAssembler::with_options(&client, config.assemble_options())
        .build_table(config.min_year, config.max_year)
        .await
        .with_context(|| {
            format!(
                "building table for seasons {}..{}",
                config.min_year, config.max_year
            )
        })?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&assembly.table)?);
    } else {
        print_table(&assembly.table);
    }

    print_diagnostics(&assembly.report);
    Ok(())
}

fn print_diagnostics(report: &AssemblyReport) {
    if report.is_clean() {
        return;
    }
    eprintln!("⚠ {} diagnostic(s):", report.len());

    let mut seasons: Vec<Season> = report.diagnostics().iter().map(|d| d.season()).collect();
    seasons.sort();
    seasons.dedup();
    for season in seasons {
        eprintln!("  season {season}:");
        for d in report.for_season(season) {
            eprintln!("    {d}");
        }
    }
}

fn print_table(table: &TeamStatsTable) {
    let columns: Vec<&str> = table.schema().names().collect();
    println!("season team clinch {}", columns.join(" "));
    for row in table.rows() {
        let clinch = row
            .clinch_indicator
            .map(|c| c.indicator().to_string())
            .unwrap_or_else(|| "-".to_string());
        let stats: Vec<String> = columns
            .iter()
            .map(|c| row.stat(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{} {} {} {}", row.season, row.team_id, clinch, stats.join(" "));
    }
}

async fn run_teams(source: SourceArgs, season: Season) -> Result<()> {
    let base_url = resolve_base_url(source.base_url.clone());
    let client = client_for(&base_url, source.resolved_cache_dir().as_deref())?;

    let slice = fetch_roster(&client, season).await?;
    for record in slice.records() {
        let abbreviation = record
            .attributes
            .get("abbreviation")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        println!("{:>3} {:<4} {}", record.team_id, abbreviation, record.link);
    }
    println!("✓ {} teams in season {}", slice.len(), season);
    Ok(())
}

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    let app = NhlStats::parse();
    init_logging(app.verbose);

    match app.command {
        Commands::Pull {
            source,
            min_year,
            max_year,
            concurrency,
            probe_teams,
            skip_failed_seasons,
            json,
        } => {
            let config = pull_config(
                &source,
                min_year,
                max_year,
                concurrency,
                probe_teams,
                skip_failed_seasons,
            );
            run_pull(config, json).await?
        }

        Commands::Teams { source, season } => run_teams(source, season).await?,
    }

    Ok(())
}
