use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, UserId};

/// Product category as listed in the filter dropdowns.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Category reference embedded in product payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: Option<String>,
}
