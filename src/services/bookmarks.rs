use std::sync::Arc;

use super::live_binding::{newest_first, BindingConsumer, LiveCollectionBinding};
use super::session::Session;
use crate::database::{to_fields, DocumentStore, Query};
use crate::error::AppError;
use crate::models::{Bookmark, BOOKMARKS_COLLECTION};
use crate::utils::{is_http_url, non_empty, now_ts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub label: String,
    pub url: String,
    pub note: String,
}

pub struct BookmarksPage {
    session: Session,
    store: Arc<dyn DocumentStore>,
}

impl BookmarksPage {
    pub fn new(session: Session, store: Arc<dyn DocumentStore>) -> Self {
        Self { session, store }
    }

    pub fn bind(&self, consumer: Arc<dyn BindingConsumer<Bookmark>>) -> LiveCollectionBinding<Bookmark> {
        LiveCollectionBinding::bind(
            self.store.as_ref(),
            Query::collection(BOOKMARKS_COLLECTION).where_eq("userId", self.session.user_id.as_str()),
            newest_first(|b: &Bookmark| b.created_at),
            consumer,
        )
    }

    pub fn save_bookmark(&self, draft: &mut BookmarkDraft) -> Result<Option<String>, AppError> {
        let (Some(label), Some(url)) = (non_empty(&draft.label), non_empty(&draft.url)) else {
            return Ok(None);
        };
        if !is_http_url(&url) {
            return Err(AppError::Validation(format!(
                "'{}' is not a web link (expected http:// or https://)",
                url
            )));
        }

        let bookmark = Bookmark {
            id: String::new(),
            label,
            url,
            note: non_empty(&draft.note),
            user_id: self.session.user_id.clone(),
            created_at: now_ts(),
        };
        let fields = to_fields(&bookmark).map_err(AppError::Write)?;
        let id = self
            .store
            .add(BOOKMARKS_COLLECTION, fields)
            .map_err(AppError::Write)?;

        log::info!("Bookmark {} saved", id);
        *draft = BookmarkDraft::default();
        Ok(Some(id))
    }
}
