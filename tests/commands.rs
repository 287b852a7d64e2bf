mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use common::{alice, store};
use motiverse::commands::{self, AppContext};
use motiverse::database::DocumentStore;
use motiverse::models::SETTINGS_COLLECTION;
use motiverse::services::LocalCache;
use motiverse::utils::config::Config;

fn context(dir: &TempDir) -> AppContext {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        timezone: chrono_tz::UTC,
        user_id: Some("alice".to_string()),
        email: Some("alice@example.com".to_string()),
        display_name: Some("Alice".to_string()),
        poll_interval: Duration::from_millis(100),
    };
    let cache = LocalCache::open(&config.cache_dir()).unwrap();
    AppContext {
        config,
        session: alice(),
        store: store(),
        cache: Arc::new(cache),
    }
}

#[tokio::test]
async fn consecutive_settings_edits_are_all_saved() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let remote = json!({ "accent": "red" });
    ctx.store
        .set_merge(SETTINGS_COLLECTION, "alice", remote.as_object().cloned().unwrap())
        .unwrap();

    commands::settings::set(&ctx, "accent", "blue").await.unwrap();
    commands::settings::set(&ctx, "compactMode", "on").await.unwrap();
    commands::settings::save(&ctx).await.unwrap();

    let doc = ctx.store.get(SETTINGS_COLLECTION, "alice").unwrap().unwrap();
    assert_eq!(doc.data.get("accent"), Some(&json!("blue")));
    assert_eq!(doc.data.get("compactMode"), Some(&json!(true)));
}

#[tokio::test]
async fn invalid_setting_is_rejected_without_touching_cache() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let err = commands::settings::set(&ctx, "accent", "chartreuse").await.unwrap_err();
    assert!(matches!(err, motiverse::AppError::Validation(_)));
    assert_eq!(
        ctx.cache.get_item(motiverse::services::settings_sync::SETTINGS_KEY),
        None
    );
}
