pub mod app_config;
pub mod request;

pub use app_config::AppConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_COMPANY_LIMIT: usize = 100;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "lead-etl")]
#[command(about = "Find lookalike companies, enrich decision-makers and export a CSV")]
pub struct CliConfig {
    /// Ideal customer profile, in plain text
    pub icp_text: String,

    /// Maximum number of companies to discover
    #[arg(long, default_value_t = DEFAULT_COMPANY_LIMIT)]
    pub limit: usize,

    /// Export companies only, without people enrichment
    #[arg(long)]
    pub skip_people: bool,

    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("icp_text", &self.icp_text)?;
        validation::validate_positive_number("limit", self.limit, 1)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        Ok(())
    }
}
