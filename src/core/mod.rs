//! Core utilities shared across the pipeline
//!
//! - `cache`: memory + file system cache for raw API responses

pub mod cache;

pub use cache::{default_cache_dir, ResponseCache};
