mod common;

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use common::{alice, dyn_store, store, FailingStore};
use motiverse::database::DocumentStore;
use motiverse::models::{Accent, ThemeMode, UserSettings, SETTINGS_COLLECTION};
use motiverse::services::settings_sync::SETTINGS_KEY;
use motiverse::services::{LocalCache, SettingsPage, SettingsState};

fn cache(dir: &TempDir) -> Arc<LocalCache> {
    Arc::new(LocalCache::open(dir.path()).expect("open cache"))
}

#[test]
fn starts_from_defaults_without_cache() {
    let dir = TempDir::new().unwrap();
    let store = store();
    let page = SettingsPage::new(alice(), dyn_store(&store), cache(&dir));
    assert_eq!(page.state(), &SettingsState::CachedLocal(UserSettings::default()));
}

#[test]
fn remote_document_overwrites_cache() {
    let dir = TempDir::new().unwrap();
    let cache = cache(&dir);
    cache
        .set_item(SETTINGS_KEY, r#"{"accent":"green","compactMode":true}"#)
        .unwrap();

    let store = store();
    let remote = json!({ "accent": "blue", "themeMode": "light" });
    store
        .set_merge(SETTINGS_COLLECTION, "alice", remote.as_object().cloned().unwrap())
        .unwrap();

    let mut page = SettingsPage::new(alice(), dyn_store(&store), Arc::clone(&cache));
    assert_eq!(page.settings().accent, Accent::Green);
    assert!(page.settings().compact_mode);

    page.reconcile().unwrap();
    assert!(page.state().is_reconciled());
    let settings = page.settings().clone();
    assert_eq!(settings.accent, Accent::Blue);
    assert_eq!(settings.theme_mode, ThemeMode::Light);
    // Fields absent remotely fall back to defaults, not the cached value.
    assert!(!settings.compact_mode);
    assert!(settings.show_employee_strip);

    let cached: UserSettings =
        serde_json::from_str(&cache.get_item(SETTINGS_KEY).unwrap()).unwrap();
    assert_eq!(cached, settings);
}

#[test]
fn remote_wins_even_when_cache_is_unwritable() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("cache");
    std::fs::write(&blocker, "not a directory").unwrap();
    let cache = Arc::new(LocalCache::open(&blocker).unwrap());

    let store = store();
    let remote = json!({ "accent": "blue" });
    store
        .set_merge(SETTINGS_COLLECTION, "alice", remote.as_object().cloned().unwrap())
        .unwrap();

    let mut page = SettingsPage::new(alice(), dyn_store(&store), Arc::clone(&cache));
    page.reconcile().unwrap();

    assert!(page.state().is_reconciled());
    assert_eq!(page.settings().accent, Accent::Blue);
    assert_eq!(cache.get_item(SETTINGS_KEY), None);
}

#[test]
fn missing_remote_promotes_cached_state() {
    let dir = TempDir::new().unwrap();
    let cache = cache(&dir);
    cache.set_item(SETTINGS_KEY, r#"{"themeMode":"midnight"}"#).unwrap();

    let store = store();
    let mut page = SettingsPage::new(alice(), dyn_store(&store), cache);
    page.reconcile().unwrap();

    assert!(page.state().is_reconciled());
    assert_eq!(page.settings().theme_mode, ThemeMode::Midnight);
}

#[test]
fn failed_reconcile_stays_cached() {
    let dir = TempDir::new().unwrap();
    let failing: Arc<dyn DocumentStore> = Arc::new(FailingStore);
    let mut page = SettingsPage::new(alice(), failing, cache(&dir));

    let err = page.reconcile().unwrap_err();
    assert_eq!(err.banner("settings"), "Failed to load settings.");
    assert!(!page.state().is_reconciled());
}

#[test]
fn edits_survive_reopening_and_save_merges() {
    let dir = TempDir::new().unwrap();
    let store = store();

    {
        let mut page = SettingsPage::new(alice(), dyn_store(&store), cache(&dir));
        page.update(|s| s.reduce_motion = true).unwrap();
    }

    let page = SettingsPage::new(alice(), dyn_store(&store), cache(&dir));
    assert!(page.settings().reduce_motion);
    page.save().unwrap();

    let doc = store.get(SETTINGS_COLLECTION, "alice").unwrap().unwrap();
    assert_eq!(doc.data.get("reduceMotion"), Some(&json!(true)));
    assert!(doc.data.get("updatedAt").and_then(|v| v.as_i64()).is_some());
}

#[test]
fn reset_restores_defaults_locally() {
    let dir = TempDir::new().unwrap();
    let store = store();
    let mut page = SettingsPage::new(alice(), dyn_store(&store), cache(&dir));
    page.update(|s| s.accent = Accent::Purple).unwrap();
    page.reset().unwrap();

    assert_eq!(page.settings(), &UserSettings::default());
    assert!(store.get(SETTINGS_COLLECTION, "alice").unwrap().is_none());
}
