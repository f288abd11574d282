// Adapters layer: concrete implementations of the domain ports (HTTP APIs, storage).

pub mod discovery;
pub mod enrichment;
pub mod http;
pub mod leads;
pub mod storage;

pub use discovery::DiscoLikeClient;
pub use enrichment::{AiArkPeopleClient, PeopleQuery};
pub use leads::AiArcLeadClient;
pub use storage::LocalStorage;
