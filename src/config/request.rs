use crate::config::DEFAULT_COMPANY_LIMIT;
use crate::utils::error::{LeadError, Result};
use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SOURCE: &str = "ai_arc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSource {
    AiArc,
}

impl FromStr for LeadSource {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ai_arc" => Ok(LeadSource::AiArc),
            other => Err(LeadError::ConfigError {
                message: format!("Unknown source: {}", other),
            }),
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadSource::AiArc => write!(f, "ai_arc"),
        }
    }
}

/// A JSON request file describing one audience to build.
///
/// Unknown keys are kept so the file can be written back with completion
/// metadata added.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRequest {
    raw: Map<String, Value>,
    file_stem: String,
}

impl LeadRequest {
    pub fn from_slice(bytes: &[u8], file_stem: impl Into<String>) -> Result<Self> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(raw) => Ok(Self {
                raw,
                file_stem: file_stem.into(),
            }),
            _ => Err(LeadError::ConfigError {
                message: "Request file must contain a JSON object".to_string(),
            }),
        }
    }

    pub fn source(&self) -> Result<LeadSource> {
        self.raw
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SOURCE)
            .parse()
    }

    pub fn audience_name(&self) -> String {
        self.raw
            .get("audience_name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.file_stem.clone())
    }

    pub fn filters(&self) -> Map<String, Value> {
        self.raw
            .get("filters")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn limit(&self) -> usize {
        self.raw
            .get("limit")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_COMPANY_LIMIT)
    }

    /// 原始內容加上 `processed_at`、`result_file`、`result_count`
    pub fn mark_processed(
        &self,
        processed_at: DateTime<Local>,
        result_file: &str,
        result_count: usize,
    ) -> Map<String, Value> {
        let mut processed = self.raw.clone();
        processed.insert(
            "processed_at".to_string(),
            Value::String(processed_at.to_rfc3339()),
        );
        processed.insert(
            "result_file".to_string(),
            Value::String(result_file.to_string()),
        );
        processed.insert("result_count".to_string(), Value::from(result_count));
        processed
    }
}

/// 檔名用；避免 audience 名稱把輸出寫到別的目錄
pub fn file_safe_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect()
}
