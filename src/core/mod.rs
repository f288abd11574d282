pub mod etl;
pub mod export;
pub mod flatten;
pub mod lookalike;
pub mod request;
pub mod response;

pub use crate::domain::model::{FlatRow, Record, TransformResult};
pub use crate::domain::ports::{
    CompanyDiscovery, ContactEnrichment, LeadSearch, Pipeline, Storage,
};
pub use crate::utils::error::Result;
pub use export::{CsvExporter, ExportOptions};
pub use flatten::{FlattenOptions, Flattener};
pub use response::{ResponseShape, ResponseShapes};
