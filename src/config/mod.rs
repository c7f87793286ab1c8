pub mod schema;

pub use schema::{Config, EnrichmentConfig, GatewayConfig, LinkedInConfig, RunStoreKind, WorkflowConfig};
