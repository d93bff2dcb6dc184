//! In-memory table model
//!
//! - `flatten`: nested JSON → rows and columns
//! - `schema`: statistic column schema discovered at runtime
//! - `record`: team-season rows, per-season slices and the assembled table

pub mod flatten;
pub mod record;
pub mod schema;

pub use flatten::{flatten_records, locate, FlatTable};
pub use record::{ClinchStatus, SeasonSlice, TeamSeasonRecord, TeamStatsTable, RESERVED_COLUMNS};
pub use schema::{ColumnType, StatField, StatSchema};
