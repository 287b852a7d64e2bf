//! Command-line handlers. Each subcommand opens a page against the local
//! store, does its one thing and prints the result.

pub mod bookmarks;
pub mod calendar;
pub mod dashboard;
pub mod goals;
pub mod inbox;
pub mod news;
pub mod settings;
pub mod watch;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::mpsc;

use crate::database::{DocumentStore, SqliteStore};
use crate::error::AppError;
use crate::services::live_binding::{
    BindingConsumer, BindingEvent, ChannelConsumer, LiveCollectionBinding,
};
use crate::services::{LocalCache, Session};
use crate::utils::config::Config;

/// Everything a handler needs, resolved once by the shell.
pub struct AppContext {
    pub config: Config,
    pub session: Session,
    pub store: Arc<SqliteStore>,
    pub cache: Arc<LocalCache>,
}

impl AppContext {
    pub fn open(config: Config, session: Session) -> Result<Self, AppError> {
        let store = SqliteStore::open(&config.db_path()).map_err(AppError::Load)?;
        let cache = LocalCache::open(&config.cache_dir())?;
        log::debug!("Opened store at {}", config.db_path().display());
        Ok(Self {
            config,
            session,
            store: Arc::new(store),
            cache: Arc::new(cache),
        })
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store) as Arc<dyn DocumentStore>
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }
}

/// Bind, wait for the first delivery, then release.
pub async fn first_snapshot<T, B>(bind: B) -> Result<Vec<T>, AppError>
where
    T: Clone + Send + Sync + 'static,
    B: FnOnce(Arc<dyn BindingConsumer<T>>) -> LiveCollectionBinding<T>,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let consumer: Arc<dyn BindingConsumer<T>> = Arc::new(ChannelConsumer::new(tx));
    let binding = bind(consumer);
    let event = rx.recv().await;
    binding.release();

    match event {
        Some(BindingEvent::Snapshot(items)) => Ok(items),
        Some(BindingEvent::Error(msg)) => Err(AppError::Subscription(msg)),
        None => Err(AppError::Subscription(format!(
            "{} closed before delivering",
            binding.label()
        ))),
    }
}

pub fn format_ts(ts: i64, tz: &Tz) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Resolve an item by full id or unique id prefix.
pub fn find_by_prefix<'a, T>(
    items: &'a [T],
    id: &str,
    id_of: fn(&T) -> &str,
    noun: &str,
) -> Result<&'a T, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation(format!("A {} id is required", noun)));
    }
    let mut matches = items.iter().filter(|item| id_of(item).starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item),
        (None, _) => Err(AppError::Validation(format!("No {} matches '{}'", noun, id))),
        (Some(_), Some(_)) => Err(AppError::Validation(format!(
            "'{}' matches more than one {}",
            id, noun
        ))),
    }
}

/// Shorten long ids for table output.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ts_uses_local_zone() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        // 2024-06-15T20:30:00Z
        assert_eq!(format_ts(1_718_483_400, &tz), "2024-06-16 05:30");
    }

    #[test]
    fn prefix_must_be_unique() {
        let ids = vec!["abc123".to_string(), "abd456".to_string()];
        let found = find_by_prefix(&ids, "abc", |s| s.as_str(), "goal").unwrap();
        assert_eq!(found, "abc123");
        assert!(find_by_prefix(&ids, "ab", |s| s.as_str(), "goal").is_err());
        assert!(find_by_prefix(&ids, "zzz", |s| s.as_str(), "goal").is_err());
        assert!(find_by_prefix(&ids, " ", |s| s.as_str(), "goal").is_err());
    }

    #[test]
    fn short_id_handles_short_input() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789"), "01234567");
    }
}
