//! CMS page and navigation models.

use serde::{Deserialize, Serialize};

/// A CMS-managed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub position: i64,
}

/// A header menu entry with its nested children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub position: i64,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

/// A flat navigation row as stored.
#[derive(Debug, Clone)]
pub struct NavigationRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub label: String,
    pub url: String,
    pub position: i64,
}
