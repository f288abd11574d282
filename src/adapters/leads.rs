use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::app_config::LeadSearchConfig;
use crate::core::response::ResponseShapes;
use crate::domain::model::Record;
use crate::domain::ports::LeadSearch;
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

const SERVICE: &str = "AI Arc";

/// AI Arc lead search, driven by request-file filters.
pub struct AiArcLeadClient {
    client: Client,
    config: LeadSearchConfig,
    shapes: ResponseShapes,
}

impl AiArcLeadClient {
    pub fn new(config: LeadSearchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            config,
            shapes: ResponseShapes::leads(),
        })
    }
}

/// 請求內容就是 filters 再加上 `limit`
pub fn search_payload(filters: &Map<String, Value>, limit: usize) -> Value {
    let mut payload = filters.clone();
    payload.insert("limit".to_string(), Value::from(limit));
    Value::Object(payload)
}

#[async_trait]
impl LeadSearch for AiArcLeadClient {
    async fn search_leads(
        &self,
        filters: &Map<String, Value>,
        limit: usize,
    ) -> Result<Vec<Record>> {
        if self.config.api_key.is_empty() {
            tracing::error!("❌ AI_ARC_API_KEY not configured");
            return Err(LeadError::MissingConfigError {
                field: "leads.api_key".to_string(),
            });
        }

        let endpoint = join_url(&self.config.base_url, "leads/search");
        tracing::info!("📡 {} lead search ({} filters, limit {})", SERVICE, filters.len(), limit);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&search_payload(filters, limit))
            .send()
            .await?;

        let body = read_json(SERVICE, response).await?;
        Ok(self.shapes.extract_records(&body))
    }
}
