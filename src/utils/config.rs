use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::AppError;
use crate::services::session::Session;

const ENV_DATA_DIR: &str = "MOTIVERSE_DATA_DIR";
const ENV_TZ: &str = "MOTIVERSE_TZ";
const ENV_USER_ID: &str = "MOTIVERSE_USER_ID";
const ENV_EMAIL: &str = "MOTIVERSE_EMAIL";
const ENV_DISPLAY_NAME: &str = "MOTIVERSE_DISPLAY_NAME";
const ENV_POLL_MS: &str = "MOTIVERSE_POLL_MS";

const DEFAULT_DATA_DIR: &str = ".motiverse";
const DEFAULT_POLL_MS: u64 = 1000;

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub timezone: Tz,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub poll_interval: Duration,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let data_dir = env_var(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let timezone = match env_var(ENV_TZ) {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| AppError::Config(format!("{} is not a valid timezone: {}", ENV_TZ, e)))?,
            None => system_timezone(),
        };

        let poll_ms = match env_var(ENV_POLL_MS) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("Invalid {} value: {}", ENV_POLL_MS, e)))?,
            None => DEFAULT_POLL_MS,
        };

        Ok(Self {
            data_dir,
            timezone,
            user_id: env_var(ENV_USER_ID),
            email: env_var(ENV_EMAIL),
            display_name: env_var(ENV_DISPLAY_NAME),
            poll_interval: Duration::from_millis(poll_ms.max(50)),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("motiverse.db")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    /// The configured identity, if one is set.
    pub fn session(&self) -> Option<Session> {
        let user_id = self.user_id.as_deref()?;
        let mut session = Session::new(user_id);
        session.email = self.email.clone();
        session.display_name = self.display_name.clone();
        Some(session)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn system_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse().unwrap_or_else(|_| {
            log::warn!("System timezone '{}' not recognised, using UTC", name);
            Tz::UTC
        }),
        Err(e) => {
            log::info!("Could not detect system timezone ({}), using UTC", e);
            Tz::UTC
        }
    }
}
