use std::sync::Arc;

use chrono::NaiveDate;

use super::date_key::date_key_for_day;
use super::session::Session;
use crate::database::{to_fields, DocumentStore};
use crate::error::AppError;
use crate::models::{EmployeeInfo, EMPLOYEES_COLLECTION};
use crate::utils::hash_string;

const QUOTES: [&str; 7] = [
    "Small steps every day lead to big changes.",
    "You don't have to do it all today. Just do the next right thing.",
    "Your work matters more than you think.",
    "Rest is a productive activity.",
    "Progress, not perfection.",
    "You've done hard things before. You can do this too.",
    "Even 10 focused minutes move you forward.",
];

pub struct DashboardPage {
    session: Session,
    store: Arc<dyn DocumentStore>,
}

impl DashboardPage {
    pub fn new(session: Session, store: Arc<dyn DocumentStore>) -> Self {
        Self { session, store }
    }

    pub fn load_employee(&self) -> Result<Option<EmployeeInfo>, AppError> {
        let doc = self
            .store
            .get(EMPLOYEES_COLLECTION, &self.session.user_id)
            .map_err(AppError::Load)?;
        match doc {
            Some(doc) => Ok(Some(doc.decode().map_err(AppError::Load)?)),
            None => Ok(None),
        }
    }

    pub fn save_employee(&self, info: &EmployeeInfo) -> Result<(), AppError> {
        let fields = to_fields(info).map_err(AppError::Write)?;
        self.store
            .set_merge(EMPLOYEES_COLLECTION, &self.session.user_id, fields)
            .map_err(AppError::Write)?;
        log::info!("Employee profile saved for {}", self.session.user_id);
        Ok(())
    }
}

/// Motivational prompt for a day; stable for the whole day.
pub fn prompt_for(day: NaiveDate) -> &'static str {
    let bucket = hash_string(&date_key_for_day(day)) % QUOTES.len() as u64;
    QUOTES[bucket as usize]
}

pub fn all_prompts() -> &'static [&'static str] {
    &QUOTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_stable_per_day() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(prompt_for(day), prompt_for(day));
        assert!(all_prompts().contains(&prompt_for(day)));
    }

    #[test]
    fn prompts_vary_across_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let distinct: std::collections::HashSet<_> = (0..60)
            .filter_map(|i| start.checked_add_days(chrono::Days::new(i)))
            .map(prompt_for)
            .collect();
        assert!(distinct.len() > 1);
    }
}
