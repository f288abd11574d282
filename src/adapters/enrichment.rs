use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::app_config::EnrichmentConfig;
use crate::core::response::ResponseShapes;
use crate::domain::model::Record;
use crate::domain::ports::ContactEnrichment;
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

const SERVICE: &str = "AI Ark";

/// Request body for the people search endpoint.
///
/// Filters left empty are omitted from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeopleQuery {
    domain: String,
    seniorities: Vec<String>,
    departments: Vec<String>,
    page_size: usize,
    page: usize,
}

impl PeopleQuery {
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            seniorities: Vec::new(),
            departments: Vec::new(),
            page_size: 20,
            page: 1,
        }
    }

    pub fn seniorities<I, S>(mut self, seniorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seniorities = seniorities.into_iter().map(Into::into).collect();
        self
    }

    pub fn departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn to_payload(&self) -> Value {
        let mut contact_filter = Map::new();
        if !self.seniorities.is_empty() {
            contact_filter.insert("seniority".to_string(), json!(self.seniorities));
        }
        if !self.departments.is_empty() {
            contact_filter.insert("department".to_string(), json!(self.departments));
        }

        json!({
            "account_filter": {"domain": self.domain},
            "contact_filter": contact_filter,
            "page_size": self.page_size,
            "page": self.page,
        })
    }
}

/// AI Ark people search, one company domain per call.
pub struct AiArkPeopleClient {
    client: Client,
    config: EnrichmentConfig,
    shapes: ResponseShapes,
}

impl AiArkPeopleClient {
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            config,
            shapes: ResponseShapes::people(),
        })
    }

    pub fn query_for(&self, domain: &str) -> PeopleQuery {
        PeopleQuery::for_domain(domain)
            .seniorities(self.config.seniorities.iter().cloned())
            .departments(self.config.departments.iter().cloned())
            .page_size(self.config.page_size)
    }
}

#[async_trait]
impl ContactEnrichment for AiArkPeopleClient {
    async fn find_people(&self, domain: &str) -> Result<Vec<Record>> {
        if self.config.api_key.is_empty() {
            return Err(LeadError::MissingConfigError {
                field: "enrichment.api_key".to_string(),
            });
        }

        let endpoint = join_url(&self.config.base_url, "people");
        let payload = self.query_for(domain).to_payload();
        tracing::debug!("📡 {} people search for {}", SERVICE, domain);

        let response = self
            .client
            .post(&endpoint)
            .header("x-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let body = read_json(SERVICE, response).await?;
        let people = self.shapes.extract_records(&body);
        tracing::debug!("👥 {}: {} people", domain, people.len());
        Ok(people)
    }
}
