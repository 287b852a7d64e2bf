use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::{json, Value};

use super::live_binding::{newest_first, BindingConsumer, LiveCollectionBinding};
use super::session::Session;
use super::streak::StreakCalculator;
use crate::database::{to_fields, DocumentStore, Fields, Query};
use crate::error::AppError;
use crate::models::{Goal, GoalSummary, GOALS_COLLECTION};
use crate::utils::{non_empty, now_ts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalDraft {
    pub text: String,
}

impl GoalDraft {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

pub struct GoalsPage {
    session: Session,
    store: Arc<dyn DocumentStore>,
    streaks: StreakCalculator,
}

impl GoalsPage {
    pub fn new(session: Session, store: Arc<dyn DocumentStore>, tz: Tz) -> Self {
        Self {
            session,
            store,
            streaks: StreakCalculator::new(tz),
        }
    }

    /// The viewer's goals, newest first.
    pub fn bind(&self, consumer: Arc<dyn BindingConsumer<Goal>>) -> LiveCollectionBinding<Goal> {
        LiveCollectionBinding::bind(
            self.store.as_ref(),
            Query::collection(GOALS_COLLECTION).where_eq("userId", self.session.user_id.as_str()),
            newest_first(|g: &Goal| g.created_at),
            consumer,
        )
    }

    /// Returns `Ok(None)` without writing when the draft is blank.
    pub fn add_goal(&self, draft: &mut GoalDraft) -> Result<Option<String>, AppError> {
        let Some(text) = non_empty(&draft.text) else {
            return Ok(None);
        };
        let goal = Goal::new(&self.session.user_id, &text, now_ts());
        let fields = to_fields(&goal).map_err(AppError::Write)?;
        let id = self
            .store
            .add(GOALS_COLLECTION, fields)
            .map_err(AppError::Write)?;

        log::info!("Goal {} added", id);
        draft.text.clear();
        Ok(Some(id))
    }

    /// Flip completion; `completedAt` is written in the same update so the
    /// pair never disagrees.
    pub fn toggle_complete(&self, goal: &Goal) -> Result<(), AppError> {
        self.toggle_complete_at(goal, now_ts())
    }

    pub fn toggle_complete_at(&self, goal: &Goal, now: i64) -> Result<(), AppError> {
        let completed = !goal.completed;
        let mut patch = Fields::new();
        patch.insert("completed".to_string(), json!(completed));
        patch.insert(
            "completedAt".to_string(),
            if completed { json!(now) } else { Value::Null },
        );
        self.store
            .update(GOALS_COLLECTION, &goal.id, patch)
            .map_err(AppError::Write)
    }

    pub fn summary(&self, goals: &[Goal]) -> GoalSummary {
        self.summary_at(goals, Utc::now())
    }

    pub fn summary_at(&self, goals: &[Goal], now: DateTime<Utc>) -> GoalSummary {
        self.streaks.summary_at(goals, now)
    }
}
