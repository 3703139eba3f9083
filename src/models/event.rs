//! School calendar event model.

use serde::{Deserialize, Serialize};

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Academic,
    Extracurricular,
    Meeting,
    Holiday,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Academic => "academic",
            EventType::Extracurricular => "extracurricular",
            EventType::Meeting => "meeting",
            EventType::Holiday => "holiday",
            EventType::Other => "other",
        }
    }

    /// Unknown stored values degrade to `Other` rather than failing the row.
    pub fn from_db(s: &str) -> Self {
        match s {
            "academic" => EventType::Academic,
            "extracurricular" => EventType::Extracurricular,
            "meeting" => EventType::Meeting,
            "holiday" => EventType::Holiday,
            _ => EventType::Other,
        }
    }
}

/// A dated event on the school calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
