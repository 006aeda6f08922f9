use chrono::{Datelike, Local};

use crate::budget::{Budget, Mode};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::{self, load_settings, save_settings};

pub fn show() -> Result<()> {
    let settings = load_settings();
    let mut budget = Budget::default();
    budget.update_settings(&settings);
    if settings.has_onboarded {
        budget.update_lock_today();
    }

    let amount = if settings.has_onboarded {
        money(budget.budget_amount)
    } else {
        "(not set)".to_string()
    };

    println!("Monthly budget: {amount}");
    println!("Mode:           {}", budget.budget_mode);
    println!();
    for mode in Mode::ALL {
        let marker = if mode == budget.budget_mode { "*" } else { " " };
        println!(
            "  {marker} {:<7} slow down at {:>3.0}%, broke at {:>3.0}%",
            mode.as_str(),
            mode.positive_cutoff() * 100.0,
            mode.neutral_cutoff() * 100.0
        );
    }
    println!();
    if budget.is_locked {
        println!("Budget limit is locked. It unlocks for changes on the first day of each month.");
    } else {
        println!("Budget limit can be changed today.");
    }
    Ok(())
}

pub fn set(amount: f64) -> Result<()> {
    let mut settings = load_settings();
    settings::set_budget_amount(&mut settings, amount, Local::now().day())?;
    save_settings(&settings)?;
    println!("Monthly budget set to {}", money(settings.budget));
    Ok(())
}

pub fn mode(tag: &str) -> Result<()> {
    let mut settings = load_settings();
    let mode = settings::set_budget_mode(&mut settings, tag)?;
    save_settings(&settings)?;
    println!("Budget mode set to {mode}");
    Ok(())
}
