use crate::core::export::{ExportOptions, DEFAULT_EMPTY_MESSAGE};
use crate::core::flatten::{FlattenOptions, DEFAULT_LIST_JOIN_DELIMITER, DEFAULT_SEPARATOR};
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DISCOLIKE_API_KEY_ENV: &str = "DISCOLIKE_API_KEY";
pub const AIARK_API_KEY_ENV: &str = "AIARK_API_KEY";
pub const AI_ARC_API_KEY_ENV: &str = "AI_ARC_API_KEY";
pub const AI_ARC_BASE_URL_ENV: &str = "AI_ARC_BASE_URL";

pub const TARGET_SENIORITIES: [&str; 5] = ["C-Level", "VP", "Director", "Owner", "Founder"];
pub const TARGET_DEPARTMENTS: [&str; 5] = [
    "Executive",
    "Sales",
    "Business Development",
    "Marketing",
    "Management",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub discovery: DiscoveryConfig,
    pub enrichment: EnrichmentConfig,
    pub leads: LeadSearchConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub base_url: String,
    pub api_key: String,
    pub country: String,
    pub min_similarity: u8,
    pub timeout_seconds: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.discolike.com/v1".to_string(),
            api_key: String::new(),
            country: "US".to_string(),
            min_similarity: 50,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub base_url: String,
    pub api_key: String,
    pub seniorities: Vec<String>,
    pub departments: Vec<String>,
    pub page_size: usize,
    pub timeout_seconds: u64,
    pub rate_limit_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ai-ark.com/api/developer-portal/v1".to_string(),
            api_key: String::new(),
            seniorities: TARGET_SENIORITIES.iter().map(|s| s.to_string()).collect(),
            departments: TARGET_DEPARTMENTS.iter().map(|s| s.to_string()).collect(),
            page_size: 20,
            timeout_seconds: 30,
            rate_limit_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadSearchConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl Default for LeadSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ai-ark.com/v1".to_string(),
            api_key: String::new(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub column_separator: String,
    pub list_join_delimiter: String,
    pub empty_message: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            column_separator: DEFAULT_SEPARATOR.to_string(),
            list_join_delimiter: DEFAULT_LIST_JOIN_DELIMITER.to_string(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }
}

impl ExportConfig {
    /// 每個整合各自的優先欄位，搭配共用的攤平設定
    pub fn export_options(&self, priority_fields: &[&str]) -> ExportOptions {
        ExportOptions::with_priority_fields(priority_fields.iter().copied())
            .flatten_options(FlattenOptions {
                separator: self.column_separator.clone(),
                list_join_delimiter: self.list_join_delimiter.clone(),
            })
            .empty_message(self.empty_message.clone())
    }
}

impl AppConfig {
    /// 有設定檔就讀檔，否則使用預設值；空的金鑰再由環境變數補上
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_fallbacks(|name| std::env::var(name).ok()))
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LeadError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LeadError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 `${VAR}`；未設定的變數換成空字串，之後由 fallback 處理
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LeadError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::debug!("Environment variable {} is not set", var_name);
                String::new()
            })
        });

        Ok(result.to_string())
    }

    pub fn with_env_fallbacks<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fill = |slot: &mut String, name: &str| {
            if slot.is_empty() {
                if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                    *slot = value;
                }
            }
        };

        fill(&mut self.discovery.api_key, DISCOLIKE_API_KEY_ENV);
        fill(&mut self.enrichment.api_key, AIARK_API_KEY_ENV);
        fill(&mut self.leads.api_key, AI_ARC_API_KEY_ENV);

        if let Some(base_url) = lookup(AI_ARC_BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.leads.base_url = base_url;
        }

        self
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("discovery.base_url", &self.discovery.base_url)?;
        validation::validate_url("enrichment.base_url", &self.enrichment.base_url)?;
        validation::validate_url("leads.base_url", &self.leads.base_url)?;

        validation::validate_range(
            "discovery.min_similarity",
            self.discovery.min_similarity,
            0,
            100,
        )?;
        validation::validate_positive_number("enrichment.page_size", self.enrichment.page_size, 1)?;

        validation::validate_non_empty_string(
            "export.column_separator",
            &self.export.column_separator,
        )?;

        Ok(())
    }
}
