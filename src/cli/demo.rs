use chrono::Duration;
use rusqlite::Connection;

use crate::cli::{now, open_db};
use crate::db::init_db;
use crate::error::Result;
use crate::store;

struct DemoItem {
    name: &'static str,
    price: f64,
    quantity: i64,
    days_ago: i64,
    complete: bool,
}

const CARTS: &[(&str, &str, &[DemoItem])] = &[
    (
        "Weekly Groceries",
        "Farmers market first, then the supermarket.",
        &[
            DemoItem { name: "Sourdough", price: 6.50, quantity: 1, days_ago: 0, complete: true },
            DemoItem { name: "Eggs", price: 4.25, quantity: 2, days_ago: 0, complete: true },
            DemoItem { name: "Olive Oil", price: 12.99, quantity: 1, days_ago: 3, complete: false },
        ],
    ),
    (
        "Hardware Run",
        "",
        &[
            DemoItem { name: "Wood Screws", price: 0.15, quantity: 40, days_ago: 12, complete: true },
            DemoItem { name: "Sandpaper", price: 8.40, quantity: 1, days_ago: 12, complete: false },
        ],
    ),
    (
        "Birthday Party",
        "Saturday, 12 guests.",
        &[DemoItem { name: "Balloons", price: 9.99, quantity: 1, days_ago: 40, complete: true }],
    ),
];

fn load(conn: &Connection) -> Result<usize> {
    let today = now();
    let mut count = 0;
    for (name, notes, items) in CARTS {
        let cart = store::add_cart(conn, name, Some(*notes), today)?;
        for demo in *items {
            let at = today - Duration::days(demo.days_ago);
            let item = store::add_item(conn, cart.id, demo.name, demo.price, demo.quantity, None, at)?;
            if demo.complete {
                store::toggle_complete(conn, item.id)?;
            }
            count += 1;
        }
    }
    Ok(count)
}

pub fn run() -> Result<()> {
    let conn = open_db()?;
    init_db(&conn)?;
    let count = load(&conn)?;
    println!("Loaded {} demo carts with {count} items.", CARTS.len());
    println!("Try `kartstopper cart list` or `kartstopper report spending`.");
    Ok(())
}
