//! The table assembly pipeline
//!
//! Per season: roster → stat columns (first season only) → team stats →
//! playoff qualification, then the season is appended to the table.
//!
//! - `roster`: team listing for a season
//! - `stats`: stat schema discovery and per-team enrichment
//! - `playoffs`: clinch indicators from the standings
//! - `assemble`: the season loop
//! - `report`: non-fatal diagnostics

pub mod assemble;
pub mod playoffs;
pub mod report;
pub mod roster;
pub mod stats;

pub use assemble::{build_table, AssembleOptions, Assembly, SeasonAssembler};
pub use playoffs::{apply_qualification, mark_qualification, QualificationSummary};
pub use report::{AssemblyReport, Diagnostic};
pub use roster::{build_roster, fetch_roster};
pub use stats::{enrich_stats, initialize_stat_columns, EnrichSummary, SchemaProbe};
