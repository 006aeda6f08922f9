use colored::Colorize;

use crate::charts::{self, TimeRange};
use crate::cli::{now, open_db};
use crate::dashboard::{Dashboard, Tone};
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::settings::{db_path, load_settings};

pub fn run() -> Result<()> {
    if !db_path().exists() {
        println!("Database not found. Run `kartstopper init` to set up.");
        return Ok(());
    }

    let settings = load_settings();
    let conn = open_db()?;
    let mut dash = Dashboard::default();
    dash.refresh(&conn, &settings, now())?;

    let headline = match dash.tone {
        Tone::Plain => dash.title.bold(),
        Tone::Caution => dash.title.yellow().bold(),
        Tone::Alarm => dash.title.red().bold(),
    };
    println!("{headline}");
    println!();

    if !dash.has_onboarded {
        println!("Create a budget to start tracking: `kartstopper budget set <amount>`");
        println!("Carts:      {}", dash.total_carts);
        return Ok(());
    }

    let budget = &dash.budget;
    println!("Spent:      {}", money(budget.total_monthly_spend));
    println!("Budget:     {}", money(budget.budget_amount));
    if let Some(fraction) = budget.spent_fraction() {
        println!("Used:       {}", percent(fraction));
    }
    println!("Status:     {}", budget.status);
    println!("Mode:       {}", budget.budget_mode);
    println!("Locked:     {}", if budget.is_locked { "yes" } else { "no" });
    println!("Carts:      {}", dash.total_carts);

    let window = charts::last_n_days_range(&conn, TimeRange::Month)?;
    let top = charts::top5_expenditure(&conn, window.as_ref())?;
    if !top.is_empty() {
        println!();
        println!("Top purchases, last 30 days");
        for d in &top {
            println!("  {:<24} {:>12}", d.name, money(d.expense));
        }
    }
    Ok(())
}
