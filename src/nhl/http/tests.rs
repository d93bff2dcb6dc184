//! Unit tests for the stats API client

use super::*;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[cfg(test)]
mod http_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_teams_success() {
        let mock_server = MockServer::start().await;

        let mock_response = json!({
            "teams": [
                {"id": 1, "link": "/api/v1/teams/1", "abbreviation": "NJD"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api/v1/teams"))
            .and(query_param("season", "20152016"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&mock_response))
            .mount(&mock_server)
            .await;

        let client = HttpStatsClient::new(mock_server.uri()).unwrap();
        let doc = client
            .get_json(TEAMS_PATH, &season_query(Season::new(2015)))
            .await
            .unwrap();

        assert_eq!(doc, mock_response);
    }

    #[tokio::test]
    async fn test_repeated_request_served_from_cache() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams/7/stats"))
            .and(query_param("season", "20152016"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stats": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpStatsClient::new(mock_server.uri()).unwrap();
        let query = season_query(Season::new(2015));
        let stats_path = team_stats_path("/api/v1/teams/7");

        let first = client.get_json(&stats_path, &query).await.unwrap();
        let second = client.get_json(&stats_path, &query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.cache().memory_len(), 1);
        // `expect(1)` is verified when the server drops
    }

    #[tokio::test]
    async fn test_error_status_is_source_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/teams"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = HttpStatsClient::new(mock_server.uri()).unwrap();
        let result = client
            .get_json(TEAMS_PATH, &season_query(Season::new(2015)))
            .await;

        match result {
            Err(StatsError::SourceUnavailable { url, .. }) => {
                assert!(url.ends_with("/api/v1/teams"))
            }
            other => panic!("Expected SourceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_source_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/standings/wildCardWithLeaders"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = HttpStatsClient::new(mock_server.uri()).unwrap();
        let result = client
            .get_json(STANDINGS_PATH, &season_query(Season::new(2015)))
            .await;

        assert!(matches!(result, Err(StatsError::SourceUnavailable { .. })));
        assert_eq!(client.cache().memory_len(), 0);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpStatsClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_nhl_base_url_constant() {
        assert_eq!(NHL_BASE_URL, "https://statsapi.web.nhl.com");
    }

    #[test]
    fn test_team_stats_path() {
        assert_eq!(team_stats_path("/api/v1/teams/7"), "/api/v1/teams/7/stats");
        assert_eq!(team_stats_path("/api/v1/teams/7/"), "/api/v1/teams/7/stats");
    }

    #[test]
    fn test_request_key() {
        assert_eq!(request_key("/api/v1/teams", &[]), "/api/v1/teams");
        assert_eq!(
            request_key("/api/v1/teams", &season_query(Season::new(2009))),
            "/api/v1/teams?season=20092010"
        );
    }

    #[test]
    fn test_cache_key_includes_host() {
        let query = season_query(Season::new(2009));
        let live = HttpStatsClient::new(NHL_BASE_URL).unwrap();
        let local = HttpStatsClient::new("http://localhost:8080/").unwrap();

        assert_eq!(
            live.cache_key(TEAMS_PATH, &query),
            "https://statsapi.web.nhl.com/api/v1/teams?season=20092010"
        );
        assert_ne!(
            live.cache_key(TEAMS_PATH, &query),
            local.cache_key(TEAMS_PATH, &query)
        );
    }
}

#[cfg(test)]
mod fixture_tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_source_serves_registered_doc() {
        let season = Season::new(2016);
        let source = FixtureSource::new().with_season_doc(TEAMS_PATH, season, json!({"teams": []}));

        let doc = source
            .get_json(TEAMS_PATH, &season_query(season))
            .await
            .unwrap();
        assert_eq!(doc, json!({"teams": []}));
        assert_eq!(source.len(), 1);
    }

    #[tokio::test]
    async fn test_fixture_source_missing_doc() {
        let source = FixtureSource::new();
        assert!(source.is_empty());

        let result = source
            .get_json(TEAMS_PATH, &season_query(Season::new(2016)))
            .await;
        match result {
            Err(StatsError::SourceUnavailable { url, .. }) => {
                assert_eq!(url, "/api/v1/teams?season=20162017")
            }
            other => panic!("Expected SourceUnavailable, got {:?}", other),
        }
    }
}
