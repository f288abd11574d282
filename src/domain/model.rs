use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 一筆 API 回傳的原始物件，保留欄位順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// 將可序列化的結構轉成 Record，欄位順序依結構定義
    pub fn from_serialize<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(data) => Ok(Self { data }),
            other => {
                let mut data = serde_json::Map::new();
                data.insert("raw_data".to_string(), serde_json::Value::String(other.to_string()));
                Ok(Self { data })
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

/// 攤平後的一列，值只會是純量
pub type FlatRow = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub csv_output: Vec<u8>,
    pub columns: Vec<String>,
    pub row_count: usize,
}

impl TransformResult {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// 公司探索結果整理後的欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company_name: String,
    pub company_domain: String,
    pub company_linkedin: String,
    pub employees: serde_json::Value,
    pub city: String,
    pub state: String,
}

/// 聯絡人欄位；沒有找到人時全部留空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub person_linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRow {
    #[serde(flatten)]
    pub company: CompanySummary,
    #[serde(flatten)]
    pub contact: ContactSummary,
}
