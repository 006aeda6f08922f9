use comfy_table::{Cell, Table};

use crate::cli::{now, open_db};
use crate::error::Result;
use crate::fmt::{display_date, money};
use crate::store;

pub fn add(name: &str, notes: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let cart = store::add_cart(&conn, name, notes, now())?;
    println!("Added cart: {}", cart.display_name());
    Ok(())
}

pub fn list(query: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let carts = store::list_carts(&conn, query)?;
    if carts.is_empty() {
        println!("No carts yet. Add one with `kartstopper cart add <name>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Items", "Spent", "Created", "Notes"]);
    for (i, cart) in carts.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(cart.display_name()),
            Cell::new(store::total_items(&conn, cart.id)?),
            Cell::new(money(store::cart_expenses(&conn, cart.id, None)?)),
            Cell::new(display_date(&cart.created_at)),
            Cell::new(cart.display_notes()),
        ]);
    }
    println!("Carts\n{table}");
    Ok(())
}

pub fn edit(cart: &str, name: Option<&str>, notes: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let existing = store::find_cart(&conn, cart)?;
    let updated = store::update_cart(&conn, existing.id, name, notes)?;
    println!("Updated cart: {}", updated.display_name());
    Ok(())
}

pub fn delete(cart: &str) -> Result<()> {
    let conn = open_db()?;
    let existing = store::find_cart(&conn, cart)?;
    let items = store::total_items(&conn, existing.id)?;
    store::delete_cart(&conn, existing.id)?;
    println!("Deleted cart: {} ({items} items)", existing.display_name());
    Ok(())
}

pub fn move_to(cart: &str, to: usize) -> Result<()> {
    let conn = open_db()?;
    let existing = store::find_cart(&conn, cart)?;
    store::move_cart(&conn, existing.id, to)?;
    println!("Moved cart: {}", existing.display_name());
    Ok(())
}
