use chrono::NaiveDateTime;

/// Storage format for timestamps in the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: i64,
    pub name: String,
    pub notes: Option<String>,
    pub position: i64,
    pub created_at: NaiveDateTime,
}

impl Cart {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled Cart"
        } else {
            &self.name
        }
    }

    pub fn display_notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Item {
    pub id: i64,
    pub cart_id: i64,
    pub name: String,
    pub notes: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub is_complete: bool,
    pub position: i64,
    pub created_at: NaiveDateTime,
}

impl Item {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown item"
        } else {
            &self.name
        }
    }

    pub fn display_notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn expense(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Inclusive timestamp window used by spending queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}
