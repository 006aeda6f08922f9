use chrono::{Datelike, NaiveDateTime};
use rusqlite::Connection;

use crate::budget::{Budget, Status};
use crate::error::Result;
use crate::settings::{Preferences, KEY_HAS_ONBOARDED};
use crate::store;

/// How loudly the status headline should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Caution,
    Alarm,
}

pub fn title(status: Status) -> &'static str {
    match status {
        Status::Positive => "You're Awesome",
        Status::Neutral => "Slow Down",
        Status::Negative => "You're broke",
        Status::Unassigned => "Welcome",
    }
}

pub fn tone(status: Status) -> Tone {
    match status {
        Status::Positive | Status::Unassigned => Tone::Plain,
        Status::Neutral => Tone::Caution,
        Status::Negative => Tone::Alarm,
    }
}

/// Home screen summary recomputed from the store on every refresh.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total_carts: i64,
    pub budget: Budget,
    pub has_onboarded: bool,
    pub title: &'static str,
    pub tone: Tone,
}

impl Dashboard {
    pub fn new(budget: Budget) -> Self {
        Self {
            total_carts: 0,
            budget,
            has_onboarded: false,
            title: title(budget.status),
            tone: tone(budget.status),
        }
    }

    pub fn refresh(&mut self, conn: &Connection, prefs: &impl Preferences, now: NaiveDateTime) -> Result<()> {
        self.has_onboarded = prefs.get_bool(KEY_HAS_ONBOARDED);
        if self.has_onboarded {
            self.budget.update_settings(prefs);
            self.budget.update_lock(now.day());
        }

        self.total_carts = store::total_carts(conn)?;
        self.budget.total_monthly_spend = store::total_monthly_spend(conn, now)?;
        self.budget.update_status();

        self.title = title(self.budget.status);
        self.tone = tone(self.budget.status);
        log::debug!(
            "dashboard refreshed: spend {:.2} of {:.2} -> {}",
            self.budget.total_monthly_spend,
            self.budget.budget_amount,
            self.budget.status
        );
        Ok(())
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Budget::default())
    }
}
