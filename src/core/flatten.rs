use crate::domain::model::{FlatRow, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SEPARATOR: &str = "_";
pub const DEFAULT_LIST_JOIN_DELIMITER: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    /// 巢狀欄位名稱之間的分隔符號，例如 `location` + `city` -> `location_city`
    pub separator: String,
    /// 純量陣列合併成單一欄位時使用的分隔字串
    pub list_join_delimiter: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            list_join_delimiter: DEFAULT_LIST_JOIN_DELIMITER.to_string(),
        }
    }
}

/// Turns arbitrarily nested records into flat, CSV-ready rows.
///
/// Nested objects are walked depth-first and their keys joined with the
/// configured separator. Lists of objects are kept whole as JSON text in a
/// single column; lists of scalars are joined into one string. When two
/// different paths join to the same column name the one visited last wins.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    options: FlattenOptions,
}

impl Flattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    pub fn flatten(&self, record: &Record) -> FlatRow {
        let mut row = FlatRow::with_capacity(record.data.len());
        self.flatten_into(&record.data, None, &mut row);
        row
    }

    fn flatten_into(&self, object: &Map<String, Value>, prefix: Option<&str>, row: &mut FlatRow) {
        for (key, value) in object {
            let path = match prefix {
                Some(parent) => format!("{}{}{}", parent, self.options.separator, key),
                None => key.clone(),
            };

            match value {
                Value::Object(nested) => self.flatten_into(nested, Some(&path), row),
                Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
                    row.insert(path, Value::String(value.to_string()));
                }
                Value::Array(items) => {
                    let joined = items
                        .iter()
                        .map(cell_text)
                        .collect::<Vec<_>>()
                        .join(&self.options.list_join_delimiter);
                    row.insert(path, Value::String(joined));
                }
                scalar => {
                    row.insert(path, scalar.clone());
                }
            }
        }
    }
}

/// CSV 儲存格文字；null 輸出為空字串
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
