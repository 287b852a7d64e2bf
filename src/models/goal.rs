use serde::{Deserialize, Serialize};

pub const GOALS_COLLECTION: &str = "goals";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: i64,
    #[serde(default)]
    pub completed_at: Option<i64>,
    pub user_id: String,
}

impl Goal {
    pub fn new(user_id: &str, text: &str, created_at: i64) -> Self {
        Self {
            id: String::new(),
            text: text.to_string(),
            completed: false,
            created_at,
            completed_at: None,
            user_id: user_id.to_string(),
        }
    }
}

/// Anything that can be checked off at a moment in time.
pub trait Completable {
    fn is_completed(&self) -> bool;
    fn completed_at(&self) -> Option<i64>;

    /// The completion moment, only when the item is actually completed.
    fn completion(&self) -> Option<i64> {
        if self.is_completed() {
            self.completed_at()
        } else {
            None
        }
    }
}

impl Completable for Goal {
    fn is_completed(&self) -> bool {
        self.completed
    }

    fn completed_at(&self) -> Option<i64> {
        self.completed_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub streak: u32,
    pub open_goals: usize,
    pub completed_today: usize,
}
