use thiserror::Error;

#[derive(Error, Debug)]
pub enum KartError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown cart: {0}")]
    UnknownCart(String),

    #[error("Unknown item: {0}")]
    UnknownItem(i64),

    #[error("A cart named '{0}' already exists")]
    DuplicateCart(String),

    #[error("Budget is locked. It can only be changed on the first day of the month.")]
    BudgetLocked,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown budget mode: {0} (expected Easy, Medium or Hard)")]
    UnknownMode(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, KartError>;
