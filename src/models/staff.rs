//! School staff model.

use serde::{Deserialize, Serialize};

/// A member of the school staff shown on the team page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, rename = "is_director", alias = "isDirector")]
    pub is_director: bool,
    #[serde(default = "default_active", rename = "is_active", alias = "isActive")]
    pub is_active: bool,
    #[serde(default)]
    pub position: i64,
}

fn default_active() -> bool {
    true
}
