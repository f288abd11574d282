use crate::core::flatten::{cell_text, FlattenOptions, Flattener};
use crate::domain::model::{FlatRow, Record, TransformResult};
use crate::utils::error::{LeadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

pub const EMPTY_STATUS: &str = "no_results";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No results were returned for this request";
pub const EMPTY_HEADER: [&str; 2] = ["status", "message"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub priority_fields: Vec<String>,
    pub flatten: FlattenOptions,
    pub empty_message: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            priority_fields: Vec::new(),
            flatten: FlattenOptions::default(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }
}

impl ExportOptions {
    pub fn with_priority_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            priority_fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn flatten_options(mut self, flatten: FlattenOptions) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }
}

/// Writes records as CSV: flattened, priority columns first, the rest sorted.
///
/// An empty input, or one whose records flatten to no fields, still
/// produces a file holding a single `status,message` / `no_results,...` row.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    options: ExportOptions,
    flattener: Flattener,
}

impl CsvExporter {
    pub fn new(options: ExportOptions) -> Self {
        let flattener = Flattener::new(options.flatten.clone());
        Self { options, flattener }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// 寫出 CSV 並回傳資料列數（寫出 sentinel 時回傳 0）
    pub fn export<W: Write>(&self, records: &[Record], sink: W) -> Result<usize> {
        let (_, row_count) = self.write_csv(records, sink)?;
        Ok(row_count)
    }

    pub fn export_to_path<P: AsRef<Path>>(&self, records: &[Record], path: P) -> Result<usize> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        let count = self.export(records, std::io::BufWriter::new(file))?;
        tracing::debug!("Wrote {} rows to {}", count, path.display());
        Ok(count)
    }

    /// 在記憶體中產生 CSV，交給 Storage 寫出
    pub fn render(&self, records: &[Record]) -> Result<TransformResult> {
        let mut csv_output = Vec::new();
        let (columns, row_count) = self.write_csv(records, &mut csv_output)?;
        Ok(TransformResult {
            csv_output,
            columns,
            row_count,
        })
    }

    pub fn column_order(&self, rows: &[FlatRow]) -> Vec<String> {
        column_order(rows, &self.options.priority_fields)
    }

    /// 回傳實際寫出的欄位與資料列數
    fn write_csv<W: Write>(&self, records: &[Record], sink: W) -> Result<(Vec<String>, usize)> {
        let mut writer = csv::Writer::from_writer(sink);

        let flat_rows: Vec<FlatRow> = records.iter().map(|r| self.flattener.flatten(r)).collect();
        let columns = self.column_order(&flat_rows);

        // 沒有任何欄位的資料列視同空結果
        if columns.is_empty() {
            tracing::info!(
                "⚠️ No exportable fields in {} records, writing {} sentinel",
                records.len(),
                EMPTY_STATUS
            );
            writer.write_record(EMPTY_HEADER).map_err(write_error)?;
            writer
                .write_record([EMPTY_STATUS, self.options.empty_message.as_str()])
                .map_err(write_error)?;
            writer.flush()?;
            return Ok((EMPTY_HEADER.iter().map(|c| c.to_string()).collect(), 0));
        }

        tracing::debug!("Exporting {} rows with {} columns", flat_rows.len(), columns.len());

        writer.write_record(&columns).map_err(write_error)?;
        for row in &flat_rows {
            let cells = columns
                .iter()
                .map(|column| row.get(column).map(cell_text).unwrap_or_default());
            writer.write_record(cells).map_err(write_error)?;
        }
        writer.flush()?;

        Ok((columns, flat_rows.len()))
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

/// Priority fields that were observed, in priority order, then every other
/// observed field in ascending order. Independent of key discovery order.
pub fn column_order(rows: &[FlatRow], priority_fields: &[String]) -> Vec<String> {
    let observed: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut columns: Vec<String> = Vec::with_capacity(observed.len());
    for field in priority_fields {
        if observed.contains(field.as_str()) && !columns.contains(field) {
            columns.push(field.clone());
        }
    }

    columns.extend(
        observed
            .into_iter()
            .filter(|field| !priority_fields.iter().any(|p| p == field))
            .map(str::to_string),
    );

    columns
}

// 寫入失敗（磁碟滿、權限不足）歸類為 IO 錯誤
fn write_error(err: csv::Error) -> LeadError {
    if !err.is_io_error() {
        return LeadError::CsvError(err);
    }
    match err.into_kind() {
        csv::ErrorKind::Io(io) => LeadError::IoError(io),
        _ => LeadError::ProcessingError {
            message: "CSV writer reported an unexpected error".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(data) => Record::new(data),
                _ => panic!("test records must be objects"),
            })
            .collect()
    }

    fn export_string(exporter: &CsvExporter, input: &[Record]) -> String {
        let mut out = Vec::new();
        exporter.export(input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_input_writes_sentinel() {
        let exporter = CsvExporter::default();
        let mut out = Vec::new();

        let count = exporter.export(&[], &mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "status,message\nno_results,No results were returned for this request\n"
        );
    }

    #[test]
    fn test_records_without_fields_write_sentinel() {
        let exporter = CsvExporter::default();
        let input = records(vec![json!({"address": {}}), json!({})]);
        let mut out = Vec::new();

        let count = exporter.export(&input, &mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "status,message\nno_results,No results were returned for this request\n"
        );

        let result = exporter.render(&input).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns, vec!["status", "message"]);
    }

    #[test]
    fn test_empty_message_is_quoted_when_needed() {
        let exporter =
            CsvExporter::new(ExportOptions::default().empty_message("No companies found, sorry"));

        let csv = export_string(&exporter, &[]);

        assert_eq!(csv, "status,message\nno_results,\"No companies found, sorry\"\n");
    }

    #[test]
    fn test_priority_fields_first_then_alphabetical() {
        let exporter = CsvExporter::new(ExportOptions::with_priority_fields([
            "last_name",
            "first_name",
        ]));
        let input = records(vec![json!({
            "zip": "78701",
            "first_name": "Ada",
            "last_name": "Lovelace"
        })]);

        let csv = export_string(&exporter, &input);

        let header = csv.lines().next().unwrap();
        assert_eq!(header, "last_name,first_name,zip");
        assert_eq!(csv.lines().nth(1).unwrap(), "Lovelace,Ada,78701");
    }

    #[test]
    fn test_missing_priority_fields_are_skipped() {
        let rows: Vec<FlatRow> = vec![[("b".to_string(), json!(1))].into_iter().collect()];
        let priority = vec!["email".to_string(), "b".to_string(), "b".to_string()];

        assert_eq!(column_order(&rows, &priority), vec!["b".to_string()]);
    }

    #[test]
    fn test_column_order_is_independent_of_row_order() {
        let exporter = CsvExporter::new(ExportOptions::with_priority_fields(["name"]));
        let a = json!({"name": "A", "city": "Austin"});
        let b = json!({"title": "CEO", "name": "B", "employees": 10});

        let forward = export_string(&exporter, &records(vec![a.clone(), b.clone()]));
        let backward = export_string(&exporter, &records(vec![b, a]));

        assert_eq!(forward.lines().next(), backward.lines().next());
        assert_eq!(forward.lines().next().unwrap(), "name,city,employees,title");
    }

    #[test]
    fn test_row_order_is_preserved() {
        let exporter = CsvExporter::default();
        let input = records(vec![
            json!({"id": "C"}),
            json!({"id": "A"}),
            json!({"id": "B"}),
        ]);

        let csv = export_string(&exporter, &input);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["id", "C", "A", "B"]);
    }

    #[test]
    fn test_missing_values_are_blank() {
        let exporter = CsvExporter::default();
        let input = records(vec![json!({"a": 1}), json!({"b": 2}), json!({"a": null, "b": 3})]);

        let csv = export_string(&exporter, &input);

        assert_eq!(csv, "a,b\n1,\n,2\n,3\n");
    }

    #[test]
    fn test_embedded_delimiters_are_quoted() {
        let exporter = CsvExporter::default();
        let input = records(vec![json!({"note": "hello, \"world\"\nbye", "tags": ["x", "y"]})]);

        let csv = export_string(&exporter, &input);
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();

        assert_eq!(&row[0], "hello, \"world\"\nbye");
        assert_eq!(&row[1], "x, y");
    }

    #[test]
    fn test_render_reports_columns_and_count() {
        let exporter = CsvExporter::new(ExportOptions::with_priority_fields(["name"]));
        let input = records(vec![json!({"name": "Acme", "location": {"city": "Austin"}})]);

        let result = exporter.render(&input).unwrap();

        assert_eq!(result.row_count, 1);
        assert_eq!(result.columns, vec!["name", "location_city"]);
        assert_eq!(
            String::from_utf8(result.csv_output).unwrap(),
            "name,location_city\nAcme,Austin\n"
        );
    }

    #[test]
    fn test_render_empty_reports_sentinel_columns() {
        let result = CsvExporter::default().render(&[]).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.columns, vec!["status", "message"]);
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let exporter = CsvExporter::default();
        let input = records(vec![json!({"a": 1})]);

        let err = exporter.export(&input, FailingSink).unwrap_err();

        assert!(matches!(err, LeadError::IoError(_)));
    }
}
