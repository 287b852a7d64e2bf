use serde::{Deserialize, Serialize};

pub const NEWS_COLLECTION: &str = "news";
pub const DEFAULT_AUTHOR: &str = "Team Member";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default = "default_author")]
    pub author: String,
    pub created_at: i64,
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}
