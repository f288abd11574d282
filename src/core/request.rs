use crate::config::request::{file_safe_name, LeadRequest, LeadSource};
use crate::core::export::{CsvExporter, ExportOptions};
use crate::core::{Pipeline, Record, Storage, TransformResult};
use crate::domain::ports::LeadSearch;
use crate::utils::error::Result;
use chrono::Local;
use std::path::Path;

pub const LEAD_PRIORITY_FIELDS: [&str; 12] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "job_title",
    "company_name",
    "industry",
    "company_size",
    "location",
    "linkedin_url",
    "company_website",
    "revenue",
];

pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Runs one request file: lead search, CSV export, then writes completion
/// metadata back into the request file.
pub struct RequestPipeline<S: Storage, L: LeadSearch> {
    storage: S,
    search: L,
    request_path: String,
    results_dir: String,
    request: LeadRequest,
    source: LeadSource,
    exporter: CsvExporter,
}

impl<S: Storage, L: LeadSearch> RequestPipeline<S, L> {
    /// 讀取並解析 request 檔；不支援的 source 直接回報錯誤
    pub async fn open(
        storage: S,
        search: L,
        request_path: &str,
        results_dir: &str,
        export: ExportOptions,
    ) -> Result<Self> {
        let bytes = storage.read_file(request_path).await?;
        let file_stem = Path::new(request_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("request")
            .to_string();
        let request = LeadRequest::from_slice(&bytes, file_stem)?;
        let source = request.source()?;

        tracing::info!("📄 Processing: {}", request_path);
        tracing::info!("Source: {}", source);
        tracing::info!("Audience: {}", request.audience_name());
        tracing::info!("Limit: {}", request.limit());

        Ok(Self {
            storage,
            search,
            request_path: request_path.to_string(),
            results_dir: results_dir.trim_end_matches('/').to_string(),
            request,
            source,
            exporter: CsvExporter::new(export),
        })
    }

    pub fn request(&self) -> &LeadRequest {
        &self.request
    }
}

#[async_trait::async_trait]
impl<S: Storage, L: LeadSearch> Pipeline for RequestPipeline<S, L> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let leads = match self.source {
            LeadSource::AiArc => self
                .search
                .search_leads(&self.request.filters(), self.request.limit())
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("❌ AI Arc error: {}", e);
                    Vec::new()
                }),
        };

        tracing::info!("Found {} leads", leads.len());
        Ok(leads)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        self.exporter.render(&data)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let now = Local::now();
        let output_path = format!(
            "{}/{}-{}.csv",
            self.results_dir,
            file_safe_name(&self.request.audience_name()),
            now.format("%Y%m%d-%H%M%S")
        );

        self.storage.write_file(&output_path, &result.csv_output).await?;
        tracing::info!("💾 Saved {} leads to {}", result.row_count, output_path);

        // 標記 request 已處理
        let processed = self.request.mark_processed(now, &output_path, result.row_count);
        let json = serde_json::to_string_pretty(&processed)?;
        self.storage.write_file(&self.request_path, json.as_bytes()).await?;

        Ok(output_path)
    }
}
