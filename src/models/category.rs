use serde::Deserialize;

use crate::domain::category::{Category as DomainCategory, CategorySummary as DomainSummary};
use crate::domain::types::{CategoryId, CategoryName, TypeConstraintError, UserId};
use crate::models::parse_timestamp;

#[derive(Debug, Clone, Deserialize)]
/// API model for [`crate::domain::category::Category`].
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            description: category.description.filter(|d| !d.trim().is_empty()),
            created_by: UserId::new(category.created_by)?,
            created_at: parse_timestamp(&category.created_at)?,
            updated_at: parse_timestamp(&category.updated_at)?,
        })
    }
}

impl TryFrom<CategorySummary> for DomainSummary {
    type Error = TypeConstraintError;

    fn try_from(category: CategorySummary) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            description: category.description.filter(|d| !d.trim().is_empty()),
        })
    }
}
