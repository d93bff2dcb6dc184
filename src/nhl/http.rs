//! Access to the NHL stats API.
//!
//! The pipeline only ever asks a [`StatsSource`] for a JSON document at a
//! path; how that document is obtained (HTTP, fixtures, a replay cache) is
//! up to the implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::cli::types::Season;
use crate::core::ResponseCache;
use crate::error::{Result, StatsError};

#[cfg(test)]
mod tests;

/// Public host of the NHL stats API. Team links returned by the API are
/// absolute paths on this host (`/api/v1/teams/7`).
pub const NHL_BASE_URL: &str = "https://statsapi.web.nhl.com";

pub const TEAMS_PATH: &str = "/api/v1/teams";
pub const STANDINGS_PATH: &str = "/api/v1/standings/wildCardWithLeaders";

const USER_AGENT: &str = "nhl-team-stats/0.1";

/// Path of a team's stats document, given the team's `link`.
pub fn team_stats_path(link: &str) -> String {
    format!("{}/stats", link.trim_end_matches('/'))
}

/// The `season=<token>` query every endpoint takes.
pub fn season_query(season: Season) -> [(&'static str, String); 1] {
    [("season", season.token())]
}

/// Canonical key for a request: `path?k=v&k2=v2`, query in the given order.
pub fn request_key(path: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let qs = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{qs}")
}

/// A source of NHL stats JSON documents.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch the document at `path` with the given query parameters.
    ///
    /// Any failure to produce a JSON document is a
    /// [`StatsError::SourceUnavailable`].
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}

/// [`StatsSource`] backed by the live HTTP API.
pub struct HttpStatsClient {
    client: Client,
    base_url: String,
    cache: ResponseCache,
}

impl HttpStatsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StatsError::unavailable("<client>", e))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: ResponseCache::default(),
        })
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Cache key of a request: the host plus its [`request_key`], so that
    /// clients pointed at different hosts never share cached documents.
    pub fn cache_key(&self, path: &str, query: &[(&str, String)]) -> String {
        format!("{}{}", self.base_url, request_key(path, query))
    }

    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let res = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| StatsError::unavailable(url, e))?
            .error_for_status()
            .map_err(|e| StatsError::unavailable(url, e))?
            .json::<Value>()
            .await
            .map_err(|e| StatsError::unavailable(url, e))?;
        Ok(res)
    }
}

#[async_trait]
impl StatsSource for HttpStatsClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let key = self.cache_key(path, query);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "response cache hit");
            return Ok(hit);
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");
        let value = self.fetch(&url, query).await?;
        self.cache.put(&key, &value);
        Ok(value)
    }
}

/// [`StatsSource`] serving canned documents, keyed by [`request_key`].
///
/// Used for tests and for replaying a saved pull offline.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    documents: HashMap<String, Value>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `doc` as the answer to `path` for `season`.
    pub fn with_season_doc(mut self, path: &str, season: Season, doc: Value) -> Self {
        self.insert(request_key(path, &season_query(season)), doc);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, doc: Value) {
        self.documents.insert(key.into(), doc);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl StatsSource for FixtureSource {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let key = request_key(path, query);
        self.documents
            .get(&key)
            .cloned()
            .ok_or_else(|| StatsError::unavailable(key, "no fixture registered"))
    }
}
