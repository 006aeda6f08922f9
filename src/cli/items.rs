use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{now, open_db};
use crate::error::Result;
use crate::fmt::{display_date, money};
use crate::store;

pub fn add(cart: &str, name: &str, price: f64, quantity: i64, notes: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let cart = store::find_cart(&conn, cart)?;
    let item = store::add_item(&conn, cart.id, name, price, quantity, notes, now())?;
    println!(
        "Added {} x{} ({}) to {}",
        item.display_name(),
        item.quantity,
        money(item.price),
        cart.display_name()
    );
    Ok(())
}

pub fn list(cart: &str, query: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let cart = store::find_cart(&conn, cart)?;
    let items = store::list_items(&conn, cart.id, query)?;
    if items.is_empty() {
        println!("{} has no items.", cart.display_name());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "", "Item", "Price", "Qty", "Total", "Added", "Notes"]);
    for item in &items {
        let mark = if item.is_complete {
            "✔".green().to_string()
        } else {
            "○".to_string()
        };
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(mark),
            Cell::new(item.display_name()),
            Cell::new(money(item.price)),
            Cell::new(item.quantity),
            Cell::new(money(item.expense())),
            Cell::new(display_date(&item.created_at)),
            Cell::new(item.display_notes()),
        ]);
    }
    let done = items.iter().filter(|i| i.is_complete).count();
    println!("{} ({done}/{} complete)\n{table}", cart.display_name(), items.len());
    Ok(())
}

pub fn edit(id: i64, name: Option<&str>, notes: Option<&str>, price: Option<f64>) -> Result<()> {
    let conn = open_db()?;
    let item = store::update_item(&conn, id, name, notes, price)?;
    println!("Updated item {}: {} at {}", item.id, item.display_name(), money(item.price));
    Ok(())
}

pub fn toggle(id: i64) -> Result<()> {
    let conn = open_db()?;
    let done = store::toggle_complete(&conn, id)?;
    let item = store::get_item(&conn, id)?;
    if done {
        println!("Completed: {} ({})", item.display_name(), money(item.expense()));
    } else {
        println!("Pending: {}", item.display_name());
    }
    Ok(())
}

pub fn quantity(id: i64, quantity: i64) -> Result<()> {
    let conn = open_db()?;
    let item = store::set_quantity(&conn, id, quantity)?;
    println!("{} quantity: {}", item.display_name(), item.quantity);
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = open_db()?;
    let item = store::get_item(&conn, id)?;
    store::delete_item(&conn, id)?;
    println!("Deleted item: {}", item.display_name());
    Ok(())
}
