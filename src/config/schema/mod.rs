mod core;
mod enrichment;
mod gateway;
mod linkedin;
mod workflow;

pub use core::Config;
pub use enrichment::EnrichmentConfig;
pub use gateway::GatewayConfig;
pub use linkedin::LinkedInConfig;
pub use workflow::{RunStoreKind, WorkflowConfig};
