//! Course Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Course entity
///
/// `created_at` is a UTC millisecond timestamp. Public queries only ever
/// see rows with `is_published = true`; the flag itself still travels so
/// that an instructor can see the draft state of their own courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub instructor_id: String,
    pub instructor_name: String,
    pub is_published: bool,
    pub created_at: i64,
}

/// Create course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreate {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Decimal,
}

/// Update course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub is_published: Option<bool>,
}
