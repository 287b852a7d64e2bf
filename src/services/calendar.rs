use std::sync::Arc;

use super::date_key::{date_key_for_day, parse_day};
use super::live_binding::{BindingConsumer, LiveCollectionBinding};
use super::session::Session;
use crate::database::{to_fields, DocumentStore, Query};
use crate::error::AppError;
use crate::models::{CalendarEvent, EventCategory, EVENTS_COLLECTION};
use crate::utils::{non_empty, now_ts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub category: EventCategory,
    pub date: String,
}

pub struct CalendarPage {
    session: Session,
    store: Arc<dyn DocumentStore>,
}

impl CalendarPage {
    pub fn new(session: Session, store: Arc<dyn DocumentStore>) -> Self {
        Self { session, store }
    }

    /// Events ordered by calendar day, earliest first.
    pub fn bind(
        &self,
        consumer: Arc<dyn BindingConsumer<CalendarEvent>>,
    ) -> LiveCollectionBinding<CalendarEvent> {
        LiveCollectionBinding::bind(
            self.store.as_ref(),
            Query::collection(EVENTS_COLLECTION).where_eq("userId", self.session.user_id.as_str()),
            |a: &CalendarEvent, b: &CalendarEvent| a.date.cmp(&b.date),
            consumer,
        )
    }

    pub fn add_event(&self, draft: &mut EventDraft) -> Result<Option<String>, AppError> {
        let Some(title) = non_empty(&draft.title) else {
            return Ok(None);
        };
        if draft.date.trim().is_empty() {
            return Ok(None);
        }
        let day = parse_day(&draft.date).ok_or_else(|| {
            AppError::Validation(format!("'{}' is not a date (expected YYYY-MM-DD)", draft.date.trim()))
        })?;

        let event = CalendarEvent {
            id: String::new(),
            title,
            category: draft.category,
            date: date_key_for_day(day),
            user_id: self.session.user_id.clone(),
            created_at: now_ts(),
        };
        let fields = to_fields(&event).map_err(AppError::Write)?;
        let id = self
            .store
            .add(EVENTS_COLLECTION, fields)
            .map_err(AppError::Write)?;

        log::info!("Event {} added for {}", id, event.date);
        *draft = EventDraft::default();
        Ok(Some(id))
    }
}
