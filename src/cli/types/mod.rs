//! Type-safe wrappers for NHL stats data.

pub mod ids;
pub mod time;

pub use ids::TeamId;
pub use time::Season;
