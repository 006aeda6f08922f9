use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};

use crate::settings::{Preferences, KEY_BUDGET, KEY_BUDGET_MODE};

/// Difficulty level controlling how early spending is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Easy, Mode::Medium, Mode::Hard];

    /// Spend/budget ratios at which the status moves to neutral and to negative.
    pub fn cutoffs(self) -> (f64, f64) {
        match self {
            Mode::Easy => (0.70, 0.95),
            Mode::Medium => (0.50, 0.80),
            Mode::Hard => (0.35, 0.65),
        }
    }

    pub fn positive_cutoff(self) -> f64 {
        self.cutoffs().0
    }

    pub fn neutral_cutoff(self) -> f64 {
        self.cutoffs().1
    }

    /// Tag used in the settings file.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Easy => "Easy",
            Mode::Medium => "Medium",
            Mode::Hard => "Hard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Mode::Easy),
            "medium" => Ok(Mode::Medium),
            "hard" => Ok(Mode::Hard),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    Positive,
    Neutral,
    Negative,
    #[default]
    Unassigned,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Positive => "Positive",
            Status::Neutral => "Neutral",
            Status::Negative => "Negative",
            Status::Unassigned => "Unassigned",
        };
        f.write_str(s)
    }
}

/// Grade `spend` against `amount` using the cutoffs for `mode`.
///
/// A zero or unset budget gives a non-finite ratio, which grades as
/// [`Status::Unassigned`] instead of failing.
pub fn compute_status(spend: f64, amount: f64, mode: Mode) -> Status {
    let ratio = spend / amount;
    if !ratio.is_finite() || ratio < 0.0 {
        return Status::Unassigned;
    }
    let (positive, neutral) = mode.cutoffs();
    if ratio < positive {
        Status::Positive
    } else if ratio < neutral {
        Status::Neutral
    } else {
        Status::Negative
    }
}

/// Monthly budget state for the current session.
///
/// `status` is stored, not derived on read: it only changes when
/// [`Budget::update_status`] runs, so it is stale after any input field is
/// edited until the next call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Budget {
    pub total_monthly_spend: f64,
    pub budget_amount: f64,
    pub budget_mode: Mode,
    pub is_locked: bool,
    pub status: Status,
}

impl Budget {
    pub fn update_status(&mut self) {
        self.status = compute_status(self.total_monthly_spend, self.budget_amount, self.budget_mode);
    }

    /// Budget edits are only allowed on the first day of the month.
    pub fn update_lock(&mut self, day: u32) {
        self.is_locked = day != 1;
    }

    pub fn update_lock_today(&mut self) {
        self.update_lock(Local::now().day());
    }

    /// Pull the saved amount and mode. An absent or unrecognised mode leaves
    /// the current one in place.
    pub fn update_settings(&mut self, prefs: &impl Preferences) {
        self.budget_amount = prefs.get_double(KEY_BUDGET);
        if let Some(tag) = prefs.get_string(KEY_BUDGET_MODE) {
            match tag.parse::<Mode>() {
                Ok(mode) => self.budget_mode = mode,
                Err(_) => log::warn!("ignoring unknown budget mode '{tag}' in settings"),
            }
        }
    }

    /// Fraction of the budget spent so far, if a budget is set.
    pub fn spent_fraction(&self) -> Option<f64> {
        let ratio = self.total_monthly_spend / self.budget_amount;
        ratio.is_finite().then_some(ratio)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    #[derive(Default)]
    struct MemoryPrefs {
        doubles: HashMap<String, f64>,
        strings: HashMap<String, String>,
    }

    impl Preferences for MemoryPrefs {
        fn get_double(&self, key: &str) -> f64 {
            self.doubles.get(key).copied().unwrap_or(0.0)
        }

        fn get_string(&self, key: &str) -> Option<String> {
            self.strings.get(key).cloned()
        }

        fn get_bool(&self, _key: &str) -> bool {
            false
        }
    }

    fn severity(status: Status) -> Option<u8> {
        match status {
            Status::Positive => Some(0),
            Status::Neutral => Some(1),
            Status::Negative => Some(2),
            Status::Unassigned => None,
        }
    }

    fn budget(spend: f64, amount: f64, mode: Mode) -> Budget {
        Budget {
            total_monthly_spend: spend,
            budget_amount: amount,
            budget_mode: mode,
            ..Budget::default()
        }
    }

    #[test]
    fn test_defaults() {
        let b = Budget::default();
        assert_eq!(b.total_monthly_spend, 0.0);
        assert_eq!(b.budget_amount, 0.0);
        assert_eq!(b.budget_mode, Mode::Medium);
        assert!(!b.is_locked);
        assert_eq!(b.status, Status::Unassigned);
    }

    #[test]
    fn test_medium_scenarios() {
        let mut b = budget(1200.0, 5500.0, Mode::Medium);
        b.update_status();
        assert_eq!(b.status, Status::Positive);

        b.total_monthly_spend = 3000.0;
        b.update_status();
        assert_eq!(b.status, Status::Neutral);

        b.total_monthly_spend = 5000.0;
        b.update_status();
        assert_eq!(b.status, Status::Negative);
    }

    #[test]
    fn test_mode_calibrates_status() {
        let expected = [Status::Neutral, Status::Negative, Status::Negative];
        for (mode, want) in Mode::ALL.into_iter().zip(expected) {
            let mut b = budget(5000.0, 5500.0, mode);
            b.update_status();
            assert_eq!(b.status, want, "mode {mode}");
        }
    }

    #[test]
    fn test_over_neutral_cutoff_is_negative() {
        for mode in Mode::ALL {
            let mut b = budget(0.0, 5500.0, mode);
            b.total_monthly_spend = (mode.neutral_cutoff() + 1.0) * b.budget_amount;
            b.update_status();
            assert_eq!(b.status, Status::Negative);
        }
    }

    #[test]
    fn test_zero_budget_is_unassigned() {
        for mode in Mode::ALL {
            assert_eq!(compute_status(100.0, 0.0, mode), Status::Unassigned);
            assert_eq!(compute_status(0.0, 0.0, mode), Status::Unassigned);
        }
    }

    #[test]
    fn test_negative_ratio_is_unassigned() {
        assert_eq!(compute_status(-10.0, 100.0, Mode::Medium), Status::Unassigned);
        assert_eq!(compute_status(f64::NAN, 100.0, Mode::Medium), Status::Unassigned);
    }

    #[test]
    fn test_cutoff_boundaries_are_inclusive_below() {
        assert_eq!(compute_status(50.0, 100.0, Mode::Medium), Status::Neutral);
        assert_eq!(compute_status(80.0, 100.0, Mode::Medium), Status::Negative);
        assert_eq!(compute_status(0.0, 100.0, Mode::Hard), Status::Positive);
    }

    #[test]
    fn test_status_goes_stale_until_recomputed() {
        let mut b = budget(1200.0, 5500.0, Mode::Medium);
        b.update_status();
        b.total_monthly_spend = 5000.0;
        assert_eq!(b.status, Status::Positive);
        b.update_status();
        assert_eq!(b.status, Status::Negative);
    }

    #[test]
    fn test_lock_only_opens_on_first() {
        let mut b = Budget::default();
        b.update_lock(1);
        assert!(!b.is_locked);
        for day in 2..=31 {
            b.update_lock(day);
            assert!(b.is_locked, "day {day} should be locked");
        }
    }

    #[test]
    fn test_update_settings_reads_amount_and_mode() {
        let mut prefs = MemoryPrefs::default();
        prefs.doubles.insert(KEY_BUDGET.to_string(), 750.0);
        prefs.strings.insert(KEY_BUDGET_MODE.to_string(), "Hard".to_string());
        let mut b = Budget::default();
        b.update_settings(&prefs);
        assert_eq!(b.budget_amount, 750.0);
        assert_eq!(b.budget_mode, Mode::Hard);
    }

    #[test]
    fn test_update_settings_keeps_mode_when_missing() {
        let mut prefs = MemoryPrefs::default();
        prefs.doubles.insert(KEY_BUDGET.to_string(), 300.0);
        let mut b = budget(0.0, 0.0, Mode::Easy);
        b.update_settings(&prefs);
        assert_eq!(b.budget_amount, 300.0);
        assert_eq!(b.budget_mode, Mode::Easy);

        prefs.strings.insert(KEY_BUDGET_MODE.to_string(), "Extreme".to_string());
        b.update_settings(&prefs);
        assert_eq!(b.budget_mode, Mode::Easy);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Easy".parse::<Mode>(), Ok(Mode::Easy));
        assert_eq!("medium".parse::<Mode>(), Ok(Mode::Medium));
        assert_eq!(" HARD ".parse::<Mode>(), Ok(Mode::Hard));
        assert!("nightmare".parse::<Mode>().is_err());
    }

    #[test]
    fn test_spent_fraction() {
        assert_eq!(budget(50.0, 200.0, Mode::Medium).spent_fraction(), Some(0.25));
        assert_eq!(budget(50.0, 0.0, Mode::Medium).spent_fraction(), None);
    }

    fn mode_strategy() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::Easy), Just(Mode::Medium), Just(Mode::Hard)]
    }

    proptest! {
        #[test]
        fn prop_ratio_bands(mode in mode_strategy(), amount in 1.0f64..100_000.0, t in 0.0f64..1.0) {
            let (pos, neu) = mode.cutoffs();

            let spend = t * pos * amount;
            if spend / amount < pos {
                prop_assert_eq!(compute_status(spend, amount, mode), Status::Positive);
            }

            let spend = (pos + t * (neu - pos)) * amount;
            let ratio = spend / amount;
            if ratio >= pos && ratio < neu {
                prop_assert_eq!(compute_status(spend, amount, mode), Status::Neutral);
            }

            let spend = (neu + t * 3.0) * amount;
            if spend / amount >= neu {
                prop_assert_eq!(compute_status(spend, amount, mode), Status::Negative);
            }
        }

        #[test]
        fn prop_stricter_mode_never_less_severe(spend in 0.0f64..20_000.0, amount in 1.0f64..20_000.0) {
            let easy = severity(compute_status(spend, amount, Mode::Easy));
            let medium = severity(compute_status(spend, amount, Mode::Medium));
            let hard = severity(compute_status(spend, amount, Mode::Hard));
            prop_assert!(easy <= medium);
            prop_assert!(medium <= hard);
        }

        #[test]
        fn prop_update_status_idempotent(mode in mode_strategy(), spend in 0.0f64..10_000.0, amount in 0.0f64..10_000.0) {
            let mut b = budget(spend, amount, mode);
            b.update_status();
            let first = b.status;
            b.update_status();
            prop_assert_eq!(first, b.status);
        }
    }
}
