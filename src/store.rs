use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{KartError, Result};
use crate::models::{Cart, DateRange, Item, TIMESTAMP_FORMAT};

const CART_COLUMNS: &str = "id, name, notes, position, created_at";
const ITEM_COLUMNS: &str =
    "i.id, i.cart_id, i.name, i.notes, i.price, i.quantity, i.is_complete, i.position, i.created_at";

/// A completed item together with the cart it belongs to.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub item: Item,
    pub cart_name: String,
}

fn fmt_ts(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn cart_from_row(row: &Row) -> rusqlite::Result<Cart> {
    let created: String = row.get(4)?;
    Ok(Cart {
        id: row.get(0)?,
        name: row.get(1)?,
        notes: row.get(2)?,
        position: row.get(3)?,
        created_at: parse_ts(4, &created)?,
    })
}

fn item_from_row(row: &Row) -> rusqlite::Result<Item> {
    let created: String = row.get(8)?;
    Ok(Item {
        id: row.get(0)?,
        cart_id: row.get(1)?,
        name: row.get(2)?,
        notes: row.get(3)?,
        price: row.get(4)?,
        quantity: row.get(5)?,
        is_complete: row.get(6)?,
        position: row.get(7)?,
        created_at: parse_ts(8, &created)?,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

fn cart_name_taken(conn: &Connection, name: &str, except_id: Option<i64>) -> Result<bool> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM carts WHERE name = ?1 AND id IS NOT ?2)",
        rusqlite::params![name, except_id],
        |r| r.get(0),
    )?;
    Ok(taken)
}

pub fn add_cart(conn: &Connection, name: &str, notes: Option<&str>, at: NaiveDateTime) -> Result<Cart> {
    if cart_name_taken(conn, name, None)? {
        return Err(KartError::DuplicateCart(name.to_string()));
    }
    let position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM carts",
        [],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT INTO carts (name, notes, position, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![name, non_empty(notes), position, fmt_ts(&at)],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("added cart {id} '{name}'");
    get_cart(conn, id)
}

pub fn get_cart(conn: &Connection, id: i64) -> Result<Cart> {
    conn.query_row(
        &format!("SELECT {CART_COLUMNS} FROM carts WHERE id = ?1"),
        [id],
        cart_from_row,
    )
    .optional()?
    .ok_or_else(|| KartError::UnknownCart(id.to_string()))
}

pub fn find_cart(conn: &Connection, name: &str) -> Result<Cart> {
    conn.query_row(
        &format!("SELECT {CART_COLUMNS} FROM carts WHERE name = ?1"),
        [name],
        cart_from_row,
    )
    .optional()?
    .ok_or_else(|| KartError::UnknownCart(name.to_string()))
}

/// Carts in display order, optionally filtered by a case-insensitive name search.
pub fn list_carts(conn: &Connection, query: Option<&str>) -> Result<Vec<Cart>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CART_COLUMNS} FROM carts \
         WHERE ?1 IS NULL OR instr(lower(name), lower(?1)) > 0 \
         ORDER BY position, id"
    ))?;
    let rows = stmt
        .query_map([non_empty(query)], cart_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Blank values leave the existing field untouched.
pub fn update_cart(conn: &Connection, id: i64, name: Option<&str>, notes: Option<&str>) -> Result<Cart> {
    let cart = get_cart(conn, id)?;
    let new_name = non_empty(name).unwrap_or(&cart.name);
    if new_name != cart.name && cart_name_taken(conn, new_name, Some(id))? {
        return Err(KartError::DuplicateCart(new_name.to_string()));
    }
    let new_notes = non_empty(notes).or(cart.notes.as_deref());
    conn.execute(
        "UPDATE carts SET name = ?1, notes = ?2 WHERE id = ?3",
        rusqlite::params![new_name, new_notes, id],
    )?;
    get_cart(conn, id)
}

/// Remove a cart and every item in it.
pub fn delete_cart(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM carts WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(KartError::UnknownCart(id.to_string()));
    }
    log::debug!("deleted cart {id}");
    Ok(())
}

/// Move a cart to `to_index` in the display order and renumber every position.
pub fn move_cart(conn: &Connection, id: i64, to_index: usize) -> Result<()> {
    let mut ids: Vec<i64> = list_carts(conn, None)?.into_iter().map(|c| c.id).collect();
    let from = ids
        .iter()
        .position(|&c| c == id)
        .ok_or_else(|| KartError::UnknownCart(id.to_string()))?;
    let moved = ids.remove(from);
    ids.insert(to_index.min(ids.len()), moved);

    let tx = conn.unchecked_transaction()?;
    for (pos, cart_id) in ids.iter().enumerate() {
        tx.execute(
            "UPDATE carts SET position = ?1 WHERE id = ?2",
            rusqlite::params![pos as i64, cart_id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

pub fn total_carts(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT count(*) FROM carts", [], |r| r.get(0))?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

pub fn add_item(
    conn: &Connection,
    cart_id: i64,
    name: &str,
    price: f64,
    quantity: i64,
    notes: Option<&str>,
    at: NaiveDateTime,
) -> Result<Item> {
    if !price.is_finite() || price < 0.0 {
        return Err(KartError::InvalidAmount(price.to_string()));
    }
    get_cart(conn, cart_id)?;
    let position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM items WHERE cart_id = ?1",
        [cart_id],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT INTO items (cart_id, name, notes, price, quantity, position, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![cart_id, name, non_empty(notes), price, quantity.max(1), position, fmt_ts(&at)],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("added item {id} '{name}' to cart {cart_id}");
    get_item(conn, id)
}

pub fn get_item(conn: &Connection, id: i64) -> Result<Item> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = ?1"),
        [id],
        item_from_row,
    )
    .optional()?
    .ok_or(KartError::UnknownItem(id))
}

pub fn list_items(conn: &Connection, cart_id: i64, query: Option<&str>) -> Result<Vec<Item>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items i \
         WHERE i.cart_id = ?1 AND (?2 IS NULL OR instr(lower(i.name), lower(?2)) > 0) \
         ORDER BY i.position, i.id"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![cart_id, non_empty(query)], item_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Blank name/notes and a zero price leave the existing values in place.
pub fn update_item(
    conn: &Connection,
    id: i64,
    name: Option<&str>,
    notes: Option<&str>,
    price: Option<f64>,
) -> Result<Item> {
    let item = get_item(conn, id)?;
    let new_price = match price {
        Some(p) if !p.is_finite() || p < 0.0 => return Err(KartError::InvalidAmount(p.to_string())),
        Some(p) if p != 0.0 => p,
        _ => item.price,
    };
    conn.execute(
        "UPDATE items SET name = ?1, notes = ?2, price = ?3 WHERE id = ?4",
        rusqlite::params![
            non_empty(name).unwrap_or(&item.name),
            non_empty(notes).or(item.notes.as_deref()),
            new_price,
            id
        ],
    )?;
    get_item(conn, id)
}

/// Flip the completion flag and return the new state.
pub fn toggle_complete(conn: &Connection, id: i64) -> Result<bool> {
    let item = get_item(conn, id)?;
    let done = !item.is_complete;
    conn.execute(
        "UPDATE items SET is_complete = ?1 WHERE id = ?2",
        rusqlite::params![done, id],
    )?;
    Ok(done)
}

/// Quantities never drop below one.
pub fn set_quantity(conn: &Connection, id: i64, quantity: i64) -> Result<Item> {
    get_item(conn, id)?;
    conn.execute(
        "UPDATE items SET quantity = ?1 WHERE id = ?2",
        rusqlite::params![quantity.max(1), id],
    )?;
    get_item(conn, id)
}

pub fn delete_item(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(KartError::UnknownItem(id));
    }
    Ok(())
}

pub fn total_items(conn: &Connection, cart_id: i64) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM items WHERE cart_id = ?1",
        [cart_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// Spending aggregates
// ---------------------------------------------------------------------------

/// Completed items inside `range`, or every completed item when no range is given.
pub fn expenditure(conn: &Connection, range: Option<&DateRange>) -> Result<Vec<Purchase>> {
    let (start, end) = match range {
        Some(r) => (Some(fmt_ts(&r.start)), Some(fmt_ts(&r.end))),
        None => (None, None),
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS}, c.name FROM items i JOIN carts c ON i.cart_id = c.id \
         WHERE i.is_complete = 1 \
           AND (?1 IS NULL OR i.created_at >= ?1) \
           AND (?2 IS NULL OR i.created_at <= ?2) \
         ORDER BY i.created_at"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![start, end], |row| {
            Ok(Purchase {
                item: item_from_row(row)?,
                cart_name: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Sum of price × quantity over a cart's completed items.
pub fn cart_expenses(conn: &Connection, cart_id: i64, range: Option<&DateRange>) -> Result<f64> {
    let (start, end) = match range {
        Some(r) => (Some(fmt_ts(&r.start)), Some(fmt_ts(&r.end))),
        None => (None, None),
    };
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(price * quantity), 0) FROM items \
         WHERE cart_id = ?1 AND is_complete = 1 \
           AND (?2 IS NULL OR created_at >= ?2) \
           AND (?3 IS NULL OR created_at <= ?3)",
        rusqlite::params![cart_id, start, end],
        |r| r.get(0),
    )?;
    Ok(total)
}

pub fn start_of_month(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
}

/// Spend on completed items from the first of `now`'s month up to `now`.
pub fn total_monthly_spend(conn: &Connection, now: NaiveDateTime) -> Result<f64> {
    let range = DateRange::new(start_of_month(now), now);
    let total = expenditure(conn, Some(&range))?
        .iter()
        .map(|p| p.item.expense())
        .sum();
    Ok(total)
}

/// Earliest and latest item timestamps, if there are any items.
pub fn item_date_range(conn: &Connection) -> Result<Option<DateRange>> {
    let (first, last): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(created_at), MAX(created_at) FROM items",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    match (first, last) {
        (Some(first), Some(last)) => Ok(Some(DateRange::new(parse_ts(0, &first)?, parse_ts(1, &last)?))),
        _ => Ok(None),
    }
}
