pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::adapters::{AiArcLeadClient, AiArkPeopleClient, DiscoLikeClient, LocalStorage};
pub use crate::config::AppConfig;
pub use crate::core::{
    etl::{EtlEngine, RunReport},
    export::CsvExporter,
    lookalike::LookalikePipeline,
    request::RequestPipeline,
};
pub use crate::utils::error::{LeadError, Result};
