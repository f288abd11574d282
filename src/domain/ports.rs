use crate::domain::model::{Record, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}

/// Company-similarity search (DiscoLike).
#[async_trait]
pub trait CompanyDiscovery: Send + Sync {
    async fn find_companies(&self, icp_text: &str, limit: usize) -> Result<Vec<Record>>;
}

/// People/contact enrichment by company domain (AI Ark).
#[async_trait]
pub trait ContactEnrichment: Send + Sync {
    async fn find_people(&self, domain: &str) -> Result<Vec<Record>>;
}

#[async_trait]
pub trait LeadSearch: Send + Sync {
    async fn search_leads(
        &self,
        filters: &serde_json::Map<String, serde_json::Value>,
        limit: usize,
    ) -> Result<Vec<Record>>;
}
