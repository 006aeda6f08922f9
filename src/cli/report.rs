use comfy_table::{Cell, Table};

use crate::charts::{self, SortParameter, TimeRange};
use crate::cli::open_db;
use crate::error::Result;
use crate::fmt::{display_date, money, percent};
use crate::models::DateRange;

fn window_label(window: Option<&DateRange>) -> String {
    match window {
        Some(r) => format!(
            "{} to {}",
            r.start.format("%b %d, %Y"),
            r.end.format("%b %d, %Y")
        ),
        None => "all time".to_string(),
    }
}

pub fn spending(range: TimeRange, sort: SortParameter) -> Result<()> {
    let conn = open_db()?;
    let window = charts::last_n_days_range(&conn, range)?;
    let data = charts::expenditure_data(&conn, window.as_ref(), sort)?;

    if data.is_empty() {
        println!("No completed items in this period.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Item", "Cart", "Date", "Expense"]);
    for d in &data {
        table.add_row(vec![
            Cell::new(&d.name),
            Cell::new(&d.cart_name),
            Cell::new(display_date(&d.date)),
            Cell::new(money(d.expense)),
        ]);
    }
    let total: f64 = data.iter().map(|d| d.expense).sum();
    table.add_row(vec![Cell::new("Total"), Cell::new(""), Cell::new(""), Cell::new(money(total))]);
    println!("Spending, {}\n{table}", window_label(window.as_ref()));
    Ok(())
}

pub fn carts(range: TimeRange, sort: SortParameter) -> Result<()> {
    let conn = open_db()?;
    let window = charts::last_n_days_range(&conn, range)?;
    let data = charts::sort_cart_expenses(charts::cart_expense_data(&conn, window.as_ref())?, sort);

    if data.is_empty() {
        println!("No carts yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Cart", "Items", "Expense", "Share"]);
    for d in &data {
        table.add_row(vec![
            Cell::new(&d.name),
            Cell::new(d.item_count),
            Cell::new(money(d.expense)),
            Cell::new(percent(charts::percentage(&data, d.expense))),
        ]);
    }
    println!("Spending by cart, {}\n{table}", window_label(window.as_ref()));
    if let Some(max) = charts::max_expense(&data) {
        println!("Highest cart: {}", money(max));
    }
    Ok(())
}

pub fn top_carts() -> Result<()> {
    let conn = open_db()?;
    let data = charts::top_carts(&conn)?;
    if data.is_empty() {
        println!("No carts yet.");
        return Ok(());
    }

    let max = charts::max_count(&data).unwrap_or(0).max(1);
    let mut table = Table::new();
    table.set_header(vec!["Cart", "Items", ""]);
    for d in &data {
        let width = (d.item_count * 20 / max) as usize;
        table.add_row(vec![
            Cell::new(&d.name),
            Cell::new(d.item_count),
            Cell::new("█".repeat(width)),
        ]);
    }
    println!("Top Carts\n{table}");
    Ok(())
}
