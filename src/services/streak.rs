use std::collections::HashSet;

use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;

use super::date_key::{date_key_for_day, date_key_from_timestamp, local_day};
use crate::models::{Completable, Goal, GoalSummary};

/// Counts consecutive local days, ending today, with at least one completion.
///
/// A streak has to include today: completions up to yesterday with nothing
/// yet today yield 0.
#[derive(Debug, Clone, Copy)]
pub struct StreakCalculator {
    tz: Tz,
}

impl StreakCalculator {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn current<'a, I, C>(&self, items: I) -> u32
    where
        I: IntoIterator<Item = &'a C>,
        C: Completable + 'a,
    {
        self.streak_at(items, Utc::now())
    }

    pub fn streak_at<'a, I, C>(&self, items: I, now: DateTime<Utc>) -> u32
    where
        I: IntoIterator<Item = &'a C>,
        C: Completable + 'a,
    {
        let days = self.completed_days(items);
        let today = local_day(now, &self.tz);

        let mut streak = 0u32;
        let mut offset = 0u64;
        loop {
            let Some(day) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            if !days.contains(&date_key_for_day(day)) {
                break;
            }
            streak += 1;
            offset += 1;
        }
        streak
    }

    /// Distinct local-day keys on which something was completed.
    pub fn completed_days<'a, I, C>(&self, items: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a C>,
        C: Completable + 'a,
    {
        items
            .into_iter()
            .filter_map(|item| item.completion())
            .filter_map(|ts| date_key_from_timestamp(ts, &self.tz))
            .collect()
    }

    pub fn summary_at(&self, goals: &[Goal], now: DateTime<Utc>) -> GoalSummary {
        let today = date_key_for_day(local_day(now, &self.tz));
        let completed_today = goals
            .iter()
            .filter_map(|g| g.completion())
            .filter(|ts| date_key_from_timestamp(*ts, &self.tz).as_deref() == Some(today.as_str()))
            .count();

        GoalSummary {
            streak: self.streak_at(goals, now),
            open_goals: goals.iter().filter(|g| !g.completed).count(),
            completed_today,
        }
    }
}
