//! Outbound publishing of approved drafts.

pub mod linkedin;

pub use linkedin::LinkedInPublisher;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Normalized outcome of a publish attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PublishResult {
    pub fn published(status_code: u16, post_id: Option<String>) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            post_id,
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Sends text to a posting API. Failures are reported in the result.
pub trait Publisher: Send + Sync {
    fn name(&self) -> &str;

    fn publish<'a>(&'a self, text: &'a str)
    -> Pin<Box<dyn Future<Output = PublishResult> + Send + 'a>>;
}
