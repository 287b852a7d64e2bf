use serde::{Deserialize, Serialize};

pub const BOOKMARKS_COLLECTION: &str = "bookmarks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub user_id: String,
    pub created_at: i64,
}
