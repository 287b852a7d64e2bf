use serde::{Deserialize, Serialize};

use super::EventCategory;

pub const EVENTS_COLLECTION: &str = "events";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: EventCategory,
    /// Local calendar day, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    pub user_id: String,
    #[serde(default)]
    pub created_at: i64,
}
