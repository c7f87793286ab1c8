use serde::{Deserialize, Serialize};

/// Credentials and fixed payload settings for the LinkedIn posts API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInConfig {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Author URN, e.g. `urn:li:person:abc123`
    #[serde(default)]
    pub author_urn: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Value of the `LinkedIn-Version` header (yyyymm)
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.linkedin.com/rest/posts".into()
}

fn default_api_version() -> String {
    "202408".into()
}

fn default_visibility() -> String {
    "PUBLIC".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            author_urn: None,
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            visibility: default_visibility(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
