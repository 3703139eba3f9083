//! Content section model for database-backed page slots.

use serde::{Deserialize, Serialize};

/// One named slot of a page (`quote`, `biography_p1`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSectionItem {
    pub id: i64,
    pub section_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub position: i64,
}
