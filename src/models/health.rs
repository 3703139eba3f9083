//! Health endpoint payload shared by the backend and the health-check client.

use serde::{Deserialize, Serialize};

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_UNHEALTHY: &str = "unhealthy";

/// Subsystem availability flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default)]
    pub cms: bool,
    #[serde(default)]
    pub translations: bool,
    #[serde(default)]
    pub file_uploads: bool,
    #[serde(default)]
    pub database: bool,
}

impl Features {
    /// Look a flag up by its wire name; unknown names are `None`.
    pub fn get(&self, name: &str) -> Option<bool> {
        match name {
            "cms" => Some(self.cms),
            "translations" => Some(self.translations),
            "fileUploads" => Some(self.file_uploads),
            "database" => Some(self.database),
            _ => None,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthConfig {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub features: Features,
    pub app_key: String,
    pub environment: String,
}
