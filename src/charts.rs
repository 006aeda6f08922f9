use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

use crate::error::Result;
use crate::models::DateRange;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortParameter {
    /// Decreasing expense.
    Expense,
    /// Latest first.
    Time,
}

/// Window of `range` days ending at the most recent item. `None` when there
/// are no items yet.
pub fn last_n_days_range(conn: &Connection, range: TimeRange) -> Result<Option<DateRange>> {
    Ok(store::item_date_range(conn)?
        .map(|r| DateRange::new(r.end - Duration::days(range.days()), r.end)))
}

// ---------------------------------------------------------------------------
// Item expenditure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ExpenditureData {
    pub name: String,
    pub cart_name: String,
    pub date: NaiveDateTime,
    pub expense: f64,
}

pub fn expenditure_data(
    conn: &Connection,
    range: Option<&DateRange>,
    sort_by: SortParameter,
) -> Result<Vec<ExpenditureData>> {
    let mut data: Vec<ExpenditureData> = store::expenditure(conn, range)?
        .into_iter()
        .map(|p| ExpenditureData {
            name: p.item.display_name().to_string(),
            expense: p.item.expense(),
            date: p.item.created_at,
            cart_name: p.cart_name,
        })
        .collect();
    match sort_by {
        SortParameter::Expense => data.sort_by(|a, b| b.expense.total_cmp(&a.expense)),
        SortParameter::Time => data.sort_by(|a, b| b.date.cmp(&a.date)),
    }
    Ok(data)
}

/// The five most expensive purchases in the window.
pub fn top5_expenditure(conn: &Connection, range: Option<&DateRange>) -> Result<Vec<ExpenditureData>> {
    let mut data = expenditure_data(conn, range, SortParameter::Expense)?;
    data.truncate(5);
    Ok(data)
}

// ---------------------------------------------------------------------------
// Carts by item count
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CartCountData {
    pub name: String,
    pub item_count: i64,
}

pub fn top_carts(conn: &Connection) -> Result<Vec<CartCountData>> {
    let mut data = Vec::new();
    for cart in store::list_carts(conn, None)? {
        data.push(CartCountData {
            name: cart.display_name().to_string(),
            item_count: store::total_items(conn, cart.id)?,
        });
    }
    data.sort_by(|a, b| b.item_count.cmp(&a.item_count));
    data.truncate(5);
    Ok(data)
}

pub fn max_count(data: &[CartCountData]) -> Option<i64> {
    data.iter().map(|d| d.item_count).max()
}

// ---------------------------------------------------------------------------
// Spending per cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CartExpenseData {
    pub name: String,
    pub date: NaiveDateTime,
    pub expense: f64,
    pub item_count: i64,
}

pub fn cart_expense_data(conn: &Connection, range: Option<&DateRange>) -> Result<Vec<CartExpenseData>> {
    let mut data = Vec::new();
    for cart in store::list_carts(conn, None)? {
        data.push(CartExpenseData {
            expense: store::cart_expenses(conn, cart.id, range)?,
            item_count: store::total_items(conn, cart.id)?,
            date: cart.created_at,
            name: cart.name,
        });
    }
    Ok(data)
}

pub fn sort_cart_expenses(mut data: Vec<CartExpenseData>, by: SortParameter) -> Vec<CartExpenseData> {
    match by {
        SortParameter::Expense => data.sort_by(|a, b| b.expense.total_cmp(&a.expense)),
        SortParameter::Time => data.sort_by(|a, b| b.date.cmp(&a.date)),
    }
    data
}

pub fn max_expense(data: &[CartExpenseData]) -> Option<f64> {
    data.iter().map(|d| d.expense).reduce(f64::max)
}

/// Share of the total spend represented by `expense`, 0 when nothing was spent.
pub fn percentage(data: &[CartExpenseData], expense: f64) -> f64 {
    let total: f64 = data.iter().map(|d| d.expense).sum();
    if total == 0.0 {
        0.0
    } else {
        expense / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::store::tests::at;
    use crate::store::{add_cart, add_item, toggle_complete};

    fn seed(conn: &Connection) {
        let groceries = add_cart(conn, "Groceries", None, at(1, 1)).unwrap();
        let hardware = add_cart(conn, "Hardware", None, at(2, 1)).unwrap();
        add_cart(conn, "Empty", None, at(3, 1)).unwrap();
        let rows = [
            (groceries.id, "Milk", 2.0, 2, at(3, 1), true),
            (groceries.id, "Cheese", 8.0, 1, at(3, 5), true),
            (groceries.id, "Bread", 3.0, 1, at(3, 6), false),
            (hardware.id, "Drill", 120.0, 1, at(1, 15), true),
            (hardware.id, "Screws", 0.1, 50, at(3, 10), true),
        ];
        for (cart_id, name, price, qty, when, done) in rows {
            let item = add_item(conn, cart_id, name, price, qty, None, when).unwrap();
            if done {
                toggle_complete(conn, item.id).unwrap();
            }
        }
    }

    #[test]
    fn test_last_n_days_range_ends_at_latest_item() {
        let (_dir, conn) = test_db();
        assert!(last_n_days_range(&conn, TimeRange::Week).unwrap().is_none());
        seed(&conn);
        let r = last_n_days_range(&conn, TimeRange::Week).unwrap().unwrap();
        assert_eq!(r.end, at(3, 10));
        assert_eq!(r.start, at(3, 3));
    }

    #[test]
    fn test_expenditure_sorting() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let by_expense = expenditure_data(&conn, None, SortParameter::Expense).unwrap();
        let names: Vec<&str> = by_expense.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Drill", "Cheese", "Screws", "Milk"]);

        let by_time = expenditure_data(&conn, None, SortParameter::Time).unwrap();
        assert_eq!(by_time[0].name, "Screws");
        assert_eq!(by_time[0].cart_name, "Hardware");
    }

    #[test]
    fn test_expenditure_in_window() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let window = last_n_days_range(&conn, TimeRange::Month).unwrap();
        let data = top5_expenditure(&conn, window.as_ref()).unwrap();
        assert!(data.iter().all(|d| d.name != "Drill"));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_top_carts_by_item_count() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let data = top_carts(&conn).unwrap();
        assert_eq!(data[0].name, "Groceries");
        assert_eq!(data[0].item_count, 3);
        assert_eq!(data[2].item_count, 0);
        assert_eq!(max_count(&data), Some(3));
    }

    #[test]
    fn test_cart_expenses_and_percentage() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let data = sort_cart_expenses(cart_expense_data(&conn, None).unwrap(), SortParameter::Expense);
        assert_eq!(data[0].name, "Hardware");
        assert!((data[0].expense - 125.0).abs() < 1e-9);
        assert_eq!(data[1].expense, 12.0);
        assert_eq!(max_expense(&data), Some(data[0].expense));
        let share = percentage(&data, data[1].expense);
        assert!((share - 12.0 / 137.0).abs() < 1e-9);

        let by_time = sort_cart_expenses(data, SortParameter::Time);
        assert_eq!(by_time[0].name, "Empty");
    }

    #[test]
    fn test_percentage_of_nothing_is_zero() {
        assert_eq!(percentage(&[], 10.0), 0.0);
        assert_eq!(max_expense(&[]), None);
    }
}
