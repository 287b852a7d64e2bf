//! Per-user settings: shown from the local cache first, then reconciled
//! with the stored document. The remote copy wins once it has loaded.

use std::sync::Arc;

use serde_json::json;

use super::local_cache::LocalCache;
use super::session::Session;
use crate::database::{to_fields, DocumentStore};
use crate::error::AppError;
use crate::models::{PartialUserSettings, UserSettings, SETTINGS_COLLECTION};
use crate::utils::now_ts;

pub const SETTINGS_KEY: &str = "motiverse_settings_v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsState {
    /// Defaults overlaid with the local cache; remote not consulted yet.
    CachedLocal(UserSettings),
    /// The remote document (or its absence) has been applied.
    ReconciledRemote(UserSettings),
}

impl SettingsState {
    pub fn settings(&self) -> &UserSettings {
        match self {
            SettingsState::CachedLocal(s) | SettingsState::ReconciledRemote(s) => s,
        }
    }

    pub fn is_reconciled(&self) -> bool {
        matches!(self, SettingsState::ReconciledRemote(_))
    }
}

pub struct SettingsPage {
    session: Session,
    store: Arc<dyn DocumentStore>,
    cache: Arc<LocalCache>,
    state: SettingsState,
}

impl SettingsPage {
    /// Reads the cache synchronously; call [`reconcile`](Self::reconcile)
    /// afterwards to pick up the stored document.
    pub fn new(session: Session, store: Arc<dyn DocumentStore>, cache: Arc<LocalCache>) -> Self {
        let cached = cache
            .get_item(SETTINGS_KEY)
            .and_then(|raw| match serde_json::from_str::<PartialUserSettings>(&raw) {
                Ok(partial) => Some(partial),
                Err(e) => {
                    log::warn!("Ignoring unreadable cached settings: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        Self {
            session,
            store,
            cache,
            state: SettingsState::CachedLocal(UserSettings::merged(cached)),
        }
    }

    pub fn state(&self) -> &SettingsState {
        &self.state
    }

    pub fn settings(&self) -> &UserSettings {
        self.state.settings()
    }

    pub fn reconcile(&mut self) -> Result<&UserSettings, AppError> {
        let remote = self
            .store
            .get(SETTINGS_COLLECTION, &self.session.user_id)
            .map_err(AppError::Load)?;

        let settings = match remote {
            Some(doc) => {
                let partial: PartialUserSettings = doc.decode().unwrap_or_else(|e| {
                    log::warn!("Stored settings for {} unreadable, using defaults: {}", self.session.user_id, e);
                    PartialUserSettings::default()
                });
                let merged = UserSettings::merged(partial);
                // The remote value stands even if the cache cannot follow.
                if let Err(e) = self.write_cache(&merged) {
                    log::warn!("Could not cache remote settings for {}: {}", self.session.user_id, e);
                }
                merged
            }
            None => self.settings().clone(),
        };

        self.state = SettingsState::ReconciledRemote(settings);
        Ok(self.settings())
    }

    /// Apply a local edit and refresh the cache. The stored document is only
    /// touched by [`save`](Self::save).
    pub fn update<F>(&mut self, edit: F) -> Result<&UserSettings, AppError>
    where
        F: FnOnce(&mut UserSettings),
    {
        let mut next = self.settings().clone();
        edit(&mut next);
        self.write_cache(&next)?;
        self.replace(next);
        Ok(self.settings())
    }

    pub fn reset(&mut self) -> Result<&UserSettings, AppError> {
        self.update(|s| *s = UserSettings::default())
    }

    pub fn save(&self) -> Result<(), AppError> {
        let mut fields = to_fields(self.settings()).map_err(AppError::Write)?;
        fields.insert("updatedAt".to_string(), json!(now_ts()));
        self.store
            .set_merge(SETTINGS_COLLECTION, &self.session.user_id, fields)
            .map_err(AppError::Write)?;
        log::info!("Settings saved for {}", self.session.user_id);
        Ok(())
    }

    fn replace(&mut self, settings: UserSettings) {
        self.state = match self.state {
            SettingsState::CachedLocal(_) => SettingsState::CachedLocal(settings),
            SettingsState::ReconciledRemote(_) => SettingsState::ReconciledRemote(settings),
        };
    }

    fn write_cache(&self, settings: &UserSettings) -> Result<(), AppError> {
        let raw = serde_json::to_string(settings).map_err(|e| AppError::Cache(e.to_string()))?;
        self.cache.set_item(SETTINGS_KEY, &raw)
    }
}
