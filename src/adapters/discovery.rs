use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::app_config::DiscoveryConfig;
use crate::core::response::ResponseShapes;
use crate::domain::model::Record;
use crate::domain::ports::CompanyDiscovery;
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use reqwest::Client;

const SERVICE: &str = "DiscoLike";

/// DiscoLike company-similarity search.
pub struct DiscoLikeClient {
    client: Client,
    config: DiscoveryConfig,
    shapes: ResponseShapes,
}

impl DiscoLikeClient {
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            config,
            shapes: ResponseShapes::discovery(),
        })
    }

    fn query(&self, icp_text: &str, limit: usize) -> Vec<(&'static str, String)> {
        vec![
            ("country", self.config.country.clone()),
            ("min_similarity", self.config.min_similarity.to_string()),
            ("max_records", limit.to_string()),
            ("redirect", "1".to_string()),
            ("icp_text", icp_text.to_string()),
        ]
    }
}

#[async_trait]
impl CompanyDiscovery for DiscoLikeClient {
    async fn find_companies(&self, icp_text: &str, limit: usize) -> Result<Vec<Record>> {
        if self.config.api_key.is_empty() {
            return Err(LeadError::MissingConfigError {
                field: "discovery.api_key".to_string(),
            });
        }

        let endpoint = join_url(&self.config.base_url, "discover");
        let preview: String = icp_text.chars().take(80).collect();
        tracing::info!("📡 Calling {} API, ICP: {}", SERVICE, preview);

        let response = self
            .client
            .get(&endpoint)
            .header("x-discolike-key", &self.config.api_key)
            .query(&self.query(icp_text, limit))
            .send()
            .await?;

        let body = read_json(SERVICE, response).await?;
        let mut companies = self.shapes.extract_records(&body);
        companies.truncate(limit);

        tracing::info!("🏢 Found {} companies", companies.len());
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(base_url: String) -> DiscoveryConfig {
        DiscoveryConfig {
            base_url,
            api_key: "disco-key".to_string(),
            ..DiscoveryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_find_companies_sends_icp_query() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/discover")
                .header("x-discolike-key", "disco-key")
                .query_param("country", "US")
                .query_param("min_similarity", "50")
                .query_param("max_records", "2")
                .query_param("redirect", "1")
                .query_param("icp_text", "roofing contractors");
            then.status(200).json_body(serde_json::json!([
                {"name": "A Roofing", "domain": "a.test"},
                {"name": "B Roofing", "domain": "b.test"},
                {"name": "C Roofing", "domain": "c.test"}
            ]));
        });

        let client = DiscoLikeClient::new(config(server.base_url())).unwrap();
        let companies = client.find_companies("roofing contractors", 2).await.unwrap();

        api_mock.assert();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].get("domain"), Some(&serde_json::json!("a.test")));
    }

    #[tokio::test]
    async fn test_find_companies_accepts_results_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/discover");
            then.status(200)
                .json_body(serde_json::json!({"results": [{"name": "Acme"}]}));
        });

        let client = DiscoLikeClient::new(config(server.base_url())).unwrap();
        let companies = client.find_companies("anything", 10).await.unwrap();

        assert_eq!(companies.len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_is_api_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/discover");
            then.status(401).body("invalid key");
        });

        let client = DiscoLikeClient::new(config(server.base_url())).unwrap();
        let err = client.find_companies("anything", 10).await.unwrap_err();

        match err {
            LeadError::ApiStatusError { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let client = DiscoLikeClient::new(DiscoveryConfig::default()).unwrap();

        let err = client.find_companies("anything", 10).await.unwrap_err();

        assert!(matches!(err, LeadError::MissingConfigError { .. }));
    }
}
