use crate::core::export::{CsvExporter, ExportOptions};
use crate::core::response::{pick, pick_str};
use crate::core::{Pipeline, Record, Storage, TransformResult};
use crate::domain::model::{CompanySummary, ContactSummary, LeadRow};
use crate::domain::ports::{CompanyDiscovery, ContactEnrichment};
use crate::utils::error::Result;
use chrono::Local;
use serde_json::Value;
use std::time::Duration;

pub const LOOKALIKE_PRIORITY_FIELDS: [&str; 10] = [
    "company_name",
    "company_domain",
    "company_linkedin",
    "employees",
    "city",
    "state",
    "first_name",
    "last_name",
    "title",
    "person_linkedin",
];

const PROGRESS_EVERY: usize = 25;

#[derive(Debug, Clone)]
pub struct LookalikeSettings {
    pub icp_text: String,
    pub limit: usize,
    pub skip_people: bool,
    pub output_dir: String,
    pub rate_limit_delay: Duration,
    pub export: ExportOptions,
}

/// Company discovery, then optional decision-maker enrichment, then CSV.
pub struct LookalikePipeline<S: Storage, D: CompanyDiscovery, E: ContactEnrichment> {
    storage: S,
    discovery: D,
    enrichment: E,
    settings: LookalikeSettings,
    exporter: CsvExporter,
}

impl<S: Storage, D: CompanyDiscovery, E: ContactEnrichment> LookalikePipeline<S, D, E> {
    pub fn new(storage: S, discovery: D, enrichment: E, settings: LookalikeSettings) -> Self {
        let exporter = CsvExporter::new(settings.export.clone());
        Self {
            storage,
            discovery,
            enrichment,
            settings,
            exporter,
        }
    }

    async fn enrich(&self, companies: &[Record]) -> Result<Vec<Record>> {
        let total = companies.len();
        let mut rows = Vec::new();
        let mut calls = 0usize;

        tracing::info!("👥 Finding decision-makers at {} companies...", total);

        for (index, company) in companies.iter().enumerate() {
            let summary = summarize_company(company);
            if summary.company_domain.is_empty() {
                tracing::debug!("Skipping company without domain: {}", summary.company_name);
                continue;
            }

            if index == 0 || (index + 1) % PROGRESS_EVERY == 0 {
                tracing::info!("⏳ Processing {}/{}...", index + 1, total);
            }

            if calls > 0 && !self.settings.rate_limit_delay.is_zero() {
                tokio::time::sleep(self.settings.rate_limit_delay).await;
            }
            calls += 1;

            // 單一公司查詢失敗不影響整批，視為沒有找到人
            let people = self
                .enrichment
                .find_people(&summary.company_domain)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        "⚠️ People search failed for {}: {}",
                        summary.company_domain,
                        e
                    );
                    Vec::new()
                });

            if people.is_empty() {
                rows.push(lead_record(&summary, ContactSummary::default())?);
            } else {
                for person in &people {
                    rows.push(lead_record(&summary, summarize_person(person))?);
                }
            }
        }

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl<S, D, E> Pipeline for LookalikePipeline<S, D, E>
where
    S: Storage,
    D: CompanyDiscovery,
    E: ContactEnrichment,
{
    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::info!("🔍 ICP: {}", self.settings.icp_text);
        tracing::info!("🔢 Limit: {}", self.settings.limit);
        tracing::info!(
            "👥 People enrichment: {}",
            if self.settings.skip_people { "Disabled" } else { "Enabled" }
        );

        let companies = self
            .discovery
            .find_companies(&self.settings.icp_text, self.settings.limit)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("❌ Company discovery failed: {}", e);
                Vec::new()
            });

        if companies.is_empty() {
            tracing::warn!("No companies found.");
            return Ok(Vec::new());
        }

        let rows = if self.settings.skip_people {
            tracing::info!("Processing {} companies (no enrichment)...", companies.len());
            companies
                .iter()
                .map(|company| lead_record(&summarize_company(company), ContactSummary::default()))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.enrich(&companies).await?
        };

        tracing::info!("🏢 Companies: {}, total rows: {}", companies.len(), rows.len());
        Ok(rows)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        self.exporter.render(&data)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let filename = format!("lookalikes_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
        let output_path = format!(
            "{}/{}",
            self.settings.output_dir.trim_end_matches('/'),
            filename
        );

        // 與 RequestPipeline 相同，路徑相對於 Storage 根目錄
        tracing::debug!("Writing {} bytes to {}", result.csv_output.len(), output_path);
        self.storage.write_file(&output_path, &result.csv_output).await?;

        Ok(output_path)
    }
}

fn lead_record(company: &CompanySummary, contact: ContactSummary) -> Result<Record> {
    let row = LeadRow {
        company: company.clone(),
        contact,
    };
    Ok(Record::from_serialize(&row)?)
}

/// 從 DiscoLike 的公司物件取出需要的欄位
pub fn summarize_company(company: &Record) -> CompanySummary {
    let data = &company.data;
    let address = data.get("address").and_then(Value::as_object);
    let address_field = |key: &str| {
        address
            .and_then(|a| pick_str(a, &[key]))
            .unwrap_or_default()
            .to_string()
    };

    let company_linkedin = data
        .get("social_urls")
        .and_then(Value::as_array)
        .and_then(|urls| {
            urls.iter()
                .filter_map(Value::as_str)
                .find(|url| url.to_lowercase().contains("linkedin.com"))
        })
        .unwrap_or_default()
        .to_string();

    CompanySummary {
        company_name: pick_str(data, &["name"]).unwrap_or_default().to_string(),
        company_domain: pick_str(data, &["domain"]).unwrap_or_default().to_string(),
        company_linkedin,
        employees: pick(data, &["employees"]).cloned().unwrap_or(Value::Null),
        city: address_field("city"),
        state: address_field("state"),
    }
}

/// 從 AI Ark 的人員物件取出聯絡人欄位；只有全名時拆成名與姓
pub fn summarize_person(person: &Record) -> ContactSummary {
    let data = &person.data;
    let mut first_name = pick_str(data, &["first_name"]).unwrap_or_default().to_string();
    let mut last_name = pick_str(data, &["last_name"]).unwrap_or_default().to_string();

    if first_name.is_empty() {
        if let Some(full_name) = pick_str(data, &["name", "full_name"]) {
            let mut parts = full_name.splitn(2, ' ');
            first_name = parts.next().unwrap_or_default().to_string();
            last_name = parts.next().unwrap_or_default().to_string();
        }
    }

    ContactSummary {
        first_name,
        last_name,
        title: pick_str(data, &["title", "job_title"]).unwrap_or_default().to_string(),
        person_linkedin: pick_str(data, &["linkedin_url", "linkedin"])
            .unwrap_or_default()
            .to_string(),
    }
}
