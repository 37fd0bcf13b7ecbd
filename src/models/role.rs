use serde::Deserialize;

use crate::domain::role::{Role as DomainRole, RoleSummary as DomainRoleSummary};
use crate::domain::types::{RoleId, RoleName, TypeConstraintError};

#[derive(Debug, Clone, Deserialize)]
/// API model for [`crate::domain::role::Role`].
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleSummary {
    pub id: String,
    pub name: String,
}

impl TryFrom<Role> for DomainRole {
    type Error = TypeConstraintError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoleId::new(role.id)?,
            name: RoleName::new(role.name)?,
            description: role.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

impl TryFrom<RoleSummary> for DomainRoleSummary {
    type Error = TypeConstraintError;

    fn try_from(role: RoleSummary) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoleId::new(role.id)?,
            name: RoleName::new(role.name)?,
        })
    }
}
