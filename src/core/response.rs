use crate::domain::model::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const RAW_DATA_FIELD: &str = "raw_data";

/// Where a list of results may live inside a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// 回應本身就是陣列
    BareList,
    /// 回應物件中的某個欄位是陣列
    Key(String),
}

impl ResponseShape {
    pub fn key(name: impl Into<String>) -> Self {
        ResponseShape::Key(name.into())
    }

    fn locate<'a>(&self, body: &'a Value) -> Option<&'a Vec<Value>> {
        match (self, body) {
            (ResponseShape::BareList, Value::Array(items)) => Some(items),
            (ResponseShape::Key(name), Value::Object(object)) => match object.get(name) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Ordered candidate shapes; the first one that matches wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseShapes(pub Vec<ResponseShape>);

impl ResponseShapes {
    pub fn new(shapes: Vec<ResponseShape>) -> Self {
        Self(shapes)
    }

    /// `{results: [...]}` or a bare list
    pub fn discovery() -> Self {
        Self(vec![ResponseShape::BareList, ResponseShape::key("results")])
    }

    pub fn people() -> Self {
        Self(vec![
            ResponseShape::key("content"),
            ResponseShape::key("data"),
            ResponseShape::key("results"),
            ResponseShape::key("people"),
        ])
    }

    pub fn leads() -> Self {
        Self(vec![ResponseShape::key("leads"), ResponseShape::key("results")])
    }

    pub fn extract(&self, body: &Value) -> Vec<Value> {
        for shape in &self.0 {
            if let Some(items) = shape.locate(body) {
                tracing::debug!("Response matched shape {:?} with {} items", shape, items.len());
                return items.clone();
            }
        }
        tracing::debug!("Response matched none of {} candidate shapes", self.0.len());
        Vec::new()
    }

    pub fn extract_records(&self, body: &Value) -> Vec<Record> {
        into_records(self.extract(body))
    }
}

/// 非物件的項目轉成單一 `raw_data` 欄位，不讓整批匯出失敗
pub fn into_records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(data) => Record::new(data),
            other => {
                tracing::debug!("Coercing non-object result into {}", RAW_DATA_FIELD);
                let mut data = Map::new();
                data.insert(RAW_DATA_FIELD.to_string(), Value::String(other.to_string()));
                Record::new(data)
            }
        })
        .collect()
}

/// First present, non-null value among the candidate keys.
pub fn pick<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|key| object.get(*key).filter(|value| !value.is_null()))
}

/// Like [`pick`], but only accepts non-empty strings.
pub fn pick_str<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    })
}
