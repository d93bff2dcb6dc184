//! NHL stats API access
//!
//! - `http`: the [`StatsSource`](http::StatsSource) seam, the live HTTP client and fixtures
//! - `standings`: normalization of the standings document into a qualification grid

pub mod http;
pub mod standings;

pub use http::{FixtureSource, HttpStatsClient, StatsSource};
pub use standings::{normalize_standings, QualificationGrid, StandingsLayout};
