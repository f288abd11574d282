use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: String,
    pub extracted: usize,
    pub exported_rows: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting ETL process");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        let extracted = raw_data.len();
        tracing::info!("📥 Extracted {} records", extracted);

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "🔄 Transformed {} rows into {} columns",
            transformed.row_count,
            transformed.columns.len()
        );
        let exported_rows = transformed.row_count;

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("💾 Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(RunReport {
            output_path,
            extracted,
            exported_rows,
        })
    }
}
