use std::sync::Arc;

use serde_json::json;

use super::live_binding::{newest_first, BindingConsumer, LiveCollectionBinding};
use super::session::Session;
use crate::database::{to_fields, DocumentStore, Fields, Query};
use crate::error::AppError;
use crate::models::{InboxMessage, InboxTab, INBOX_COLLECTION};
use crate::utils::{is_valid_email, non_empty, now_ts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub to: String,
    pub title: String,
    pub body: String,
}

/// Messages are addressed by email, so the page needs a session with one.
pub struct InboxPage {
    email: String,
    store: Arc<dyn DocumentStore>,
}

impl InboxPage {
    pub fn new(session: &Session, store: Arc<dyn DocumentStore>) -> Result<Self, AppError> {
        let email = session.require_email()?.to_string();
        Ok(Self { email, store })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn bind(
        &self,
        tab: InboxTab,
        consumer: Arc<dyn BindingConsumer<InboxMessage>>,
    ) -> LiveCollectionBinding<InboxMessage> {
        LiveCollectionBinding::bind(
            self.store.as_ref(),
            Query::collection(INBOX_COLLECTION).where_eq(tab.filter_field(), self.email.as_str()),
            newest_first(|m: &InboxMessage| m.created_at),
            consumer,
        )
    }

    pub fn bind_received(
        &self,
        consumer: Arc<dyn BindingConsumer<InboxMessage>>,
    ) -> LiveCollectionBinding<InboxMessage> {
        self.bind(InboxTab::Received, consumer)
    }

    pub fn bind_sent(
        &self,
        consumer: Arc<dyn BindingConsumer<InboxMessage>>,
    ) -> LiveCollectionBinding<InboxMessage> {
        self.bind(InboxTab::Sent, consumer)
    }

    pub fn send_message(&self, draft: &mut MessageDraft) -> Result<Option<String>, AppError> {
        let (Some(to), Some(title), Some(body)) = (
            non_empty(&draft.to),
            non_empty(&draft.title),
            non_empty(&draft.body),
        ) else {
            return Ok(None);
        };
        if !is_valid_email(&to) {
            return Err(AppError::Validation(format!("'{}' is not an email address", to)));
        }

        let message = InboxMessage {
            id: String::new(),
            from: self.email.clone(),
            to,
            title,
            body,
            created_at: now_ts(),
            read: false,
        };
        let fields = to_fields(&message).map_err(AppError::Write)?;
        let id = self
            .store
            .add(INBOX_COLLECTION, fields)
            .map_err(AppError::Write)?;

        log::info!("Message {} sent to {}", id, message.to);
        *draft = MessageDraft::default();
        Ok(Some(id))
    }

    pub fn toggle_read(&self, message: &InboxMessage) -> Result<(), AppError> {
        let mut patch = Fields::new();
        patch.insert("read".to_string(), json!(!message.read));
        self.store
            .update(INBOX_COLLECTION, &message.id, patch)
            .map_err(AppError::Write)
    }
}
