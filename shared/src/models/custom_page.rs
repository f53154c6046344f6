//! Custom Page Model

use serde::{Deserialize, Serialize};

/// Admin-authored static page
///
/// Fetched by slug. Unpublished pages are indistinguishable from missing
/// ones for anonymous callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPage {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub updated_at: i64,
}
