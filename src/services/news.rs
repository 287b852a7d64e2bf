use std::sync::Arc;

use super::live_binding::{newest_first, BindingConsumer, LiveCollectionBinding};
use super::session::Session;
use crate::database::{to_fields, DocumentStore, Query};
use crate::error::AppError;
use crate::models::{NewsItem, NEWS_COLLECTION};
use crate::utils::{non_empty, now_ts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsDraft {
    pub title: String,
    pub summary: String,
}

/// Company-wide feed; not scoped to the viewer.
pub struct NewsPage {
    session: Session,
    store: Arc<dyn DocumentStore>,
}

impl NewsPage {
    pub fn new(session: Session, store: Arc<dyn DocumentStore>) -> Self {
        Self { session, store }
    }

    pub fn bind(&self, consumer: Arc<dyn BindingConsumer<NewsItem>>) -> LiveCollectionBinding<NewsItem> {
        LiveCollectionBinding::bind(
            self.store.as_ref(),
            Query::collection(NEWS_COLLECTION),
            newest_first(|n: &NewsItem| n.created_at),
            consumer,
        )
    }

    pub fn post(&self, draft: &mut NewsDraft) -> Result<Option<String>, AppError> {
        let (Some(title), Some(summary)) = (non_empty(&draft.title), non_empty(&draft.summary)) else {
            return Ok(None);
        };

        let item = NewsItem {
            id: String::new(),
            title,
            summary,
            author: self.session.author_label(),
            created_at: now_ts(),
        };
        let fields = to_fields(&item).map_err(AppError::Write)?;
        let id = self
            .store
            .add(NEWS_COLLECTION, fields)
            .map_err(AppError::Write)?;

        log::info!("News {} posted by {}", id, item.author);
        *draft = NewsDraft::default();
        Ok(Some(id))
    }
}
