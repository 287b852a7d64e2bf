use serde::{Deserialize, Serialize};

pub const INBOX_COLLECTION: &str = "inbox";

/// A message addressed by email. The sender sees it under "sent" and the
/// recipient under "received".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub from: String,
    pub to: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxTab {
    Received,
    Sent,
}

impl InboxTab {
    /// Document field matched against the viewer's email for this tab.
    pub fn filter_field(&self) -> &'static str {
        match self {
            InboxTab::Received => "to",
            InboxTab::Sent => "from",
        }
    }
}
