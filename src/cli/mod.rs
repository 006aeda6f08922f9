pub mod budget;
pub mod carts;
pub mod demo;
pub mod init;
pub mod items;
pub mod report;
pub mod status;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::charts::{SortParameter, TimeRange};
use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

pub(crate) fn open_db() -> Result<Connection> {
    get_connection(&db_path())
}

pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[derive(Parser)]
#[command(name = "kartstopper", about = "Shopping lists and a monthly budget that keeps you honest.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up KartStopper: choose a data directory and initialize the database.
    Init {
        /// Path for KartStopper data (default: ~/Documents/kartstopper)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage carts.
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Manage the items in a cart.
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// View or change the monthly budget.
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
    /// Show this month's spending against the budget.
    Status,
    /// Spending reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Load sample carts and items to explore KartStopper.
    Demo,
    /// Print a shell completion script.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Create a cart.
    Add {
        name: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List carts in display order.
    List {
        /// Only show carts whose name contains this text
        #[arg(long)]
        query: Option<String>,
    },
    /// Rename a cart or change its notes.
    Edit {
        /// Current cart name
        cart: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a cart and all of its items.
    Delete { cart: String },
    /// Move a cart to a new position (0 = top).
    Move {
        cart: String,
        #[arg(long)]
        to: usize,
    },
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item to a cart.
    Add {
        name: String,
        #[arg(long)]
        cart: String,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        price: f64,
        #[arg(long = "qty", default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List the items in a cart.
    List {
        #[arg(long)]
        cart: String,
        /// Only show items whose name contains this text
        #[arg(long)]
        query: Option<String>,
    },
    /// Edit an item's name, notes or price.
    Edit {
        /// Item ID (shown in `kartstopper item list`)
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Mark an item complete, or back to pending.
    Toggle { id: i64 },
    /// Set an item's quantity (minimum 1).
    Qty {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Delete an item.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show budget settings and whether the amount can be edited today.
    Show,
    /// Set the monthly budget amount (first day of the month only, once set up).
    Set {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Set the budget mode: Easy, Medium or Hard.
    Mode { mode: String },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Completed purchases in a recent window.
    Spending {
        #[arg(long, value_enum, default_value = "month")]
        range: TimeRange,
        #[arg(long, value_enum, default_value = "expense")]
        sort: SortParameter,
    },
    /// Spending per cart in a recent window.
    Carts {
        #[arg(long, value_enum, default_value = "month")]
        range: TimeRange,
        #[arg(long, value_enum, default_value = "expense")]
        sort: SortParameter,
    },
    /// The five carts with the most items.
    TopCarts,
}
